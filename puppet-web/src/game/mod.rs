//! Game module - calibration, limb rig, walls, collision and debris
//!
//! Re-exports only. All logic in submodules.

mod landmarks;
mod calibration;
mod actuator;
mod bounds;
mod mode;
mod wall;
mod collision;
mod debris;
mod events;
mod session;
mod snapshot;

pub use landmarks::{HandFrame, HandInput, HandLandmark, FingerCurls, LANDMARK_COUNT, TRACKED_TIPS};
pub use calibration::{Calibration, CalibrationProfile, CaptureOutcome, CaptureStep, GameState};
pub use actuator::{map_curl_to_angle, Limb, LimbRig, LimbSpec, LIMB_COUNT};
pub use bounds::Aabb;
pub use mode::{HitboxShape, LimbGeometryKind, MaterialKind, ModeProfile, VisualMode};
pub use wall::{is_hole, Archetype, Cell, CellId, DetachedCell, Obstacle, ObstacleId, ObstacleStatus, WallSpawner};
pub use collision::{find_hits, Band, WallOutcome, HIT_PENALTY, PASS_REWARD};
pub use debris::{DebrisField, DebrisFragment};
pub use events::GameEvent;
pub use session::{HandSample, PuppetString, Session};
pub use snapshot::FrameSnapshot;
