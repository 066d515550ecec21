//! Discrete events handed to the renderer

use serde::Serialize;

use super::calibration::{CaptureStep, GameState};
use super::wall::{CellId, ObstacleId};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    StateChanged { state: GameState },
    CalibrationCaptured { step: CaptureStep },
    HandLost,
    HandFound,
    ScoreChanged { delta: i32, total: i32 },
    /// Struck cells, ascending
    Crash { obstacle: ObstacleId, cells: Vec<CellId> },
    Pass { obstacle: ObstacleId },
    Explosion { obstacle: ObstacleId, fragments: usize },
}
