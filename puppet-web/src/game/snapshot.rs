//! Serializable per-frame view of a session for the renderer

use serde::Serialize;

use super::actuator::Limb;
use super::mode::{LimbGeometryKind, MaterialKind, VisualMode};
use super::session::Session;
use super::wall::{Archetype, ObstacleId, ObstacleStatus};

#[derive(Debug, Serialize)]
pub struct FrameSnapshot {
    pub state: &'static str,
    pub status: String,
    pub score: i32,
    pub hand_visible: bool,
    pub mode: Option<ModeSnapshot>,
    pub limbs: Vec<LimbSnapshot>,
    pub hand_markers: Option<Vec<[f32; 3]>>,
    pub strings: Option<Vec<StringSnapshot>>,
    pub obstacles: Vec<ObstacleSnapshot>,
    pub debris: Vec<DebrisSnapshot>,
}

#[derive(Debug, Serialize)]
pub struct ModeSnapshot {
    pub mode: VisualMode,
    pub limb_geometry: LimbGeometryKind,
    pub limb_material: MaterialKind,
    pub wall_material: MaterialKind,
}

#[derive(Debug, Serialize)]
pub struct LimbSnapshot {
    pub limb: Limb,
    pub angle: f32,
    pub pivot: [f32; 3],
}

#[derive(Debug, Serialize)]
pub struct StringSnapshot {
    pub limb: Limb,
    pub from: [f32; 3],
    pub to: [f32; 3],
}

#[derive(Debug, Serialize)]
pub struct ObstacleSnapshot {
    pub id: ObstacleId,
    pub archetype: Archetype,
    pub depth: f32,
    pub status: ObstacleStatus,
    /// Centres of the cells still attached
    pub cells: Vec<[f32; 3]>,
}

#[derive(Debug, Serialize)]
pub struct DebrisSnapshot {
    pub position: [f32; 3],
    /// x, y, z, w
    pub orientation: [f32; 4],
}

impl FrameSnapshot {
    pub fn capture(session: &Session) -> Self {
        let rig = session.rig();
        let mode = session.mode().map(|p| ModeSnapshot {
            mode: p.mode,
            limb_geometry: p.limb_geometry,
            limb_material: p.limb_material,
            wall_material: p.wall_material,
        });

        let limbs = Limb::ALL
            .iter()
            .map(|&limb| {
                let pivot = rig.world_transform(limb).translation.vector;
                LimbSnapshot { limb, angle: rig.angle(limb), pivot: [pivot.x, pivot.y, pivot.z] }
            })
            .collect();

        let hand_markers = session
            .hand_markers()
            .map(|markers| markers.iter().map(|p| [p.x, p.y, p.z]).collect());

        let strings = session.strings().map(|strings| {
            strings
                .iter()
                .map(|s| StringSnapshot {
                    limb: s.limb,
                    from: [s.from.x, s.from.y, s.from.z],
                    to: [s.to.x, s.to.y, s.to.z],
                })
                .collect()
        });

        let obstacles = session
            .obstacles()
            .iter()
            .map(|o| ObstacleSnapshot {
                id: o.id,
                archetype: o.archetype,
                depth: o.depth,
                status: o.status,
                cells: o
                    .cells()
                    .iter()
                    .map(|c| {
                        let p = o.cell_position(c);
                        [p.x, p.y, p.z]
                    })
                    .collect(),
            })
            .collect();

        let debris = session
            .debris()
            .fragments()
            .iter()
            .map(|f| {
                let q = f.orientation.quaternion();
                DebrisSnapshot {
                    position: [f.position.x, f.position.y, f.position.z],
                    orientation: [q.i, q.j, q.k, q.w],
                }
            })
            .collect();

        Self {
            state: session.state().name(),
            status: session.status().to_string(),
            score: session.score(),
            hand_visible: session.hand_visible(),
            mode,
            limbs,
            hand_markers,
            strings,
            obstacles,
            debris,
        }
    }
}
