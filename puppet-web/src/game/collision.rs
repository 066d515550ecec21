//! Wall advance, hit detection and scoring
//!
//! A wall is scored exactly once: either the first frame a limb overlaps a
//! solid cell inside the band around the player, or the frame it leaves the
//! band untouched.

use std::collections::BTreeSet;

use super::bounds::Aabb;
use super::wall::{CellId, Obstacle, ObstacleId, ObstacleStatus};
use crate::config::WallConfig;

/// Score change for touching a wall
pub const HIT_PENALTY: i32 = -1;

/// Score change for a clean dodge
pub const PASS_REWARD: i32 = 5;

/// Scoring transition of one wall
#[derive(Clone, Debug, PartialEq)]
pub enum WallOutcome {
    Crash { obstacle: ObstacleId, cells: BTreeSet<CellId> },
    Pass { obstacle: ObstacleId },
}

impl WallOutcome {
    pub fn score_delta(&self) -> i32 {
        match self {
            WallOutcome::Crash { .. } => HIT_PENALTY,
            WallOutcome::Pass { .. } => PASS_REWARD,
        }
    }
}

/// Depth band in which walls are tested
#[derive(Clone, Copy, Debug)]
pub struct Band {
    pub min: f32,
    pub max: f32,
}

impl Band {
    pub fn around(config: &WallConfig) -> Self {
        Self {
            min: config.player_depth - config.hit_tolerance,
            max: config.player_depth + config.hit_tolerance,
        }
    }

    pub fn contains(&self, z: f32) -> bool {
        z >= self.min && z <= self.max
    }
}

/// Every in-band solid cell overlapping any limb, with the panel at `panel_depth`
pub fn find_hits(obstacle: &Obstacle, panel_depth: f32, limbs: &[Aabb], band: Band) -> BTreeSet<CellId> {
    if limbs.is_empty() {
        return BTreeSet::new();
    }
    obstacle
        .cells()
        .iter()
        .filter(|cell| band.contains(obstacle.cell_depth_at(cell, panel_depth)))
        .filter(|cell| {
            let bounds = obstacle.cell_bounds_at(cell, panel_depth);
            limbs.iter().any(|limb| limb.intersects(&bounds))
        })
        .map(|cell| cell.id)
        .collect()
}

/// Advance every wall by `dt`, score the ones that resolve, drop the ones far behind
pub fn step(
    obstacles: &mut Vec<Obstacle>,
    dt: f32,
    limbs: &[Aabb],
    config: &WallConfig,
    score: &mut i32,
) -> Vec<WallOutcome> {
    let band = Band::around(config);
    let cutoff = config.player_depth + config.cleanup_distance;
    let mut outcomes = Vec::new();

    for obstacle in obstacles.iter_mut() {
        let previous = obstacle.depth;
        obstacle.depth += config.speed * dt;

        if !obstacle.active {
            continue;
        }

        let mut hits = find_hits(obstacle, obstacle.depth, limbs, band);
        // Evaluate at the player too if this step jumped across it
        let crossed = previous < config.player_depth && obstacle.depth >= config.player_depth;
        if hits.is_empty() && crossed {
            hits = find_hits(obstacle, config.player_depth, limbs, band);
        }

        let outcome = if !hits.is_empty() {
            obstacle.status = ObstacleStatus::Crashed;
            log::info!("💥 Wall {} hit ({} cells)", obstacle.id.0, hits.len());
            Some(WallOutcome::Crash { obstacle: obstacle.id, cells: hits })
        } else if nearest_cell_depth(obstacle) > band.max || obstacle.depth > cutoff {
            obstacle.status = ObstacleStatus::Passed;
            log::info!("✨ Wall {} dodged", obstacle.id.0);
            Some(WallOutcome::Pass { obstacle: obstacle.id })
        } else {
            None
        };

        if let Some(outcome) = outcome {
            obstacle.active = false;
            *score += outcome.score_delta();
            outcomes.push(outcome);
        }
    }

    obstacles.retain(|o| o.depth <= cutoff);

    outcomes
}

/// Depth of the trailing cell; a wall has left the band once this passes it
fn nearest_cell_depth(obstacle: &Obstacle) -> f32 {
    obstacle
        .cells()
        .iter()
        .map(|c| obstacle.cell_depth_at(c, obstacle.depth))
        .reduce(f32::min)
        .unwrap_or(obstacle.depth)
}
