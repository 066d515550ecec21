//! Walls - grid panels with pose-shaped holes
//!
//! Cell offsets are measured from the panel centre, which lines up with the
//! puppet torso. A cell is solid unless its centre falls inside one of the
//! archetype's hole rectangles.

use std::collections::BTreeSet;

use nalgebra::{Point3, UnitQuaternion, Vector3};
use rand::Rng;
use serde::Serialize;

use super::bounds::Aabb;
use crate::config::WallConfig;

/// Named hole pattern
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Archetype {
    ArmsUp,
    Splits,
}

impl Archetype {
    pub fn name(&self) -> &'static str {
        match self {
            Archetype::ArmsUp => "ARMS_UP",
            Archetype::Splits => "SPLITS",
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Archetype::ArmsUp
        } else {
            Archetype::Splits
        }
    }
}

/// Axis-aligned hole region: |x| ≤ half_width, y_min ≤ y ≤ y_max
struct HoleRect {
    half_width: f32,
    y_min: f32,
    y_max: f32,
}

impl HoleRect {
    fn contains(&self, x: f32, y: f32) -> bool {
        x.abs() <= self.half_width && y >= self.y_min && y <= self.y_max
    }
}

const TORSO_HOLE: HoleRect = HoleRect { half_width: 0.5, y_min: -1.0, y_max: 2.0 };

const ARMS_UP_HOLES: [HoleRect; 2] = [
    // Raised arms
    HoleRect { half_width: 1.0, y_min: 0.5, y_max: 2.5 },
    // Legs together
    HoleRect { half_width: 0.5, y_min: -2.5, y_max: -1.0 },
];

const SPLITS_HOLES: [HoleRect; 2] = [
    // Legs spread flat
    HoleRect { half_width: 2.0, y_min: -1.0, y_max: -0.5 },
    // Arms at the sides
    HoleRect { half_width: 1.0, y_min: -0.5, y_max: 1.0 },
];

/// True when a cell centred at (x, y) is left open
pub fn is_hole(x: f32, y: f32, archetype: Archetype) -> bool {
    if TORSO_HOLE.contains(x, y) {
        return true;
    }
    let holes: &[HoleRect] = match archetype {
        Archetype::ArmsUp => &ARMS_UP_HOLES,
        Archetype::Splits => &SPLITS_HOLES,
    };
    holes.iter().any(|h| h.contains(x, y))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ObstacleId(pub u32);

/// Grid slot index (row-major), stable for the life of the wall
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CellId(pub u32);

/// A solid block, positioned relative to its wall
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub id: CellId,
    /// Offset from the panel centre
    pub offset: (f32, f32),
    /// Depth relative to the panel
    pub local_depth: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ObstacleStatus {
    Neutral,
    Crashed,
    Passed,
}

/// A cell that has left its wall, with the world transform it had
#[derive(Clone, Copy, Debug)]
pub struct DetachedCell {
    pub obstacle: ObstacleId,
    pub cell: CellId,
    pub position: Point3<f32>,
    pub orientation: UnitQuaternion<f32>,
}

pub struct Obstacle {
    pub id: ObstacleId,
    pub archetype: Archetype,
    /// Panel depth (z)
    pub depth: f32,
    /// Panel centre in x/y
    pub center: (f32, f32),
    pub active: bool,
    pub status: ObstacleStatus,
    cells: Vec<Cell>,
    cell_half: Vector3<f32>,
}

impl Obstacle {
    /// Deterministic for a given archetype and geometry
    pub fn build(id: ObstacleId, archetype: Archetype, config: &WallConfig) -> Self {
        let cols = (config.width / config.pitch).round().max(1.0) as u32;
        let rows = (config.height / config.pitch).round().max(1.0) as u32;
        let left = -(cols as f32) * config.pitch * 0.5;
        let bottom = -(rows as f32) * config.pitch * 0.5;

        let mut cells = Vec::with_capacity((cols * rows) as usize);
        for row in 0..rows {
            for col in 0..cols {
                let x = left + (col as f32 + 0.5) * config.pitch;
                let y = bottom + (row as f32 + 0.5) * config.pitch;
                if is_hole(x, y, archetype) {
                    continue;
                }
                cells.push(Cell {
                    id: CellId(row * cols + col),
                    offset: (x, y),
                    local_depth: 0.0,
                });
            }
        }

        Self {
            id,
            archetype,
            depth: config.spawn_depth,
            center: (0.0, 0.0),
            active: true,
            status: ObstacleStatus::Neutral,
            cells,
            cell_half: Vector3::new(config.pitch * 0.5, config.pitch * 0.5, config.thickness * 0.5),
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.iter().find(|c| c.id == id)
    }

    /// World depth of a cell when the panel sits at `panel_depth`
    pub fn cell_depth_at(&self, cell: &Cell, panel_depth: f32) -> f32 {
        panel_depth + cell.local_depth
    }

    pub fn cell_position_at(&self, cell: &Cell, panel_depth: f32) -> Point3<f32> {
        Point3::new(
            self.center.0 + cell.offset.0,
            self.center.1 + cell.offset.1,
            self.cell_depth_at(cell, panel_depth),
        )
    }

    pub fn cell_position(&self, cell: &Cell) -> Point3<f32> {
        self.cell_position_at(cell, self.depth)
    }

    pub fn cell_bounds_at(&self, cell: &Cell, panel_depth: f32) -> Aabb {
        Aabb::from_center(self.cell_position_at(cell, panel_depth), self.cell_half)
    }

    /// Remaining cells within `radius` of any of `struck` (set semantics)
    pub fn cells_near(&self, struck: &BTreeSet<CellId>, radius: f32) -> BTreeSet<CellId> {
        let centers: Vec<(f32, f32)> = struck
            .iter()
            .filter_map(|id| self.cell(*id))
            .map(|c| c.offset)
            .collect();
        let r2 = radius * radius;
        self.cells
            .iter()
            .filter(|c| {
                centers.iter().any(|&(sx, sy)| {
                    let dx = c.offset.0 - sx;
                    let dy = c.offset.1 - sy;
                    dx * dx + dy * dy <= r2
                })
            })
            .map(|c| c.id)
            .collect()
    }

    /// Move the selected cells out of the wall, snapshotting their world transform
    pub fn detach(&mut self, ids: &BTreeSet<CellId>) -> Vec<DetachedCell> {
        let (detached, kept): (Vec<Cell>, Vec<Cell>) = self.cells.drain(..).partition(|c| ids.contains(&c.id));
        self.cells = kept;

        detached
            .into_iter()
            .map(|cell| DetachedCell {
                obstacle: self.id,
                cell: cell.id,
                position: self.cell_position(&cell),
                // Panels never rotate
                orientation: UnitQuaternion::identity(),
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn reverse_cells(&mut self) {
        self.cells.reverse();
    }
}

/// Wall-clock spawn timer
pub struct WallSpawner {
    next_spawn_at: Option<f64>,
    next_id: u32,
}

impl WallSpawner {
    pub fn new() -> Self {
        Self {
            next_spawn_at: None,
            next_id: 0,
        }
    }

    /// Schedule the first wall one interval after `now`
    pub fn restart(&mut self, now: f64, config: &WallConfig) {
        self.next_spawn_at = Some(now + config.spawn_interval);
    }

    /// At most one wall per call
    pub fn poll<R: Rng>(&mut self, now: f64, config: &WallConfig, rng: &mut R) -> Option<Obstacle> {
        let due = self.next_spawn_at?;
        if now < due {
            return None;
        }
        self.next_spawn_at = Some(now + config.spawn_interval);

        let id = ObstacleId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let archetype = Archetype::random(rng);
        log::info!("🧱 Spawned wall {} ({})", id.0, archetype.name());
        Some(Obstacle::build(id, archetype, config))
    }
}

impl Default for WallSpawner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_hole_predicate_examples() {
        assert!(is_hole(0.0, 0.0, Archetype::ArmsUp));
        assert!(!is_hole(-4.0, 0.0, Archetype::ArmsUp));
        assert!(is_hole(0.0, 0.0, Archetype::Splits));
        assert!(!is_hole(-4.0, 0.0, Archetype::Splits));

        // Raised-arm window only in ARMS_UP
        assert!(is_hole(0.75, 1.75, Archetype::ArmsUp));
        assert!(!is_hole(0.75, 1.75, Archetype::Splits));

        // Spread-leg slot only in SPLITS
        assert!(is_hole(1.75, -0.75, Archetype::Splits));
        assert!(!is_hole(1.75, -0.75, Archetype::ArmsUp));
    }

    #[test]
    fn test_hole_predicate_is_pure() {
        for archetype in [Archetype::ArmsUp, Archetype::Splits] {
            for i in -20..=20 {
                for j in -20..=20 {
                    let (x, y) = (i as f32 * 0.23, j as f32 * 0.19);
                    assert_eq!(is_hole(x, y, archetype), is_hole(x, y, archetype));
                }
            }
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let config = WallConfig::default();
        let a = Obstacle::build(ObstacleId(0), Archetype::Splits, &config);
        let b = Obstacle::build(ObstacleId(1), Archetype::Splits, &config);
        assert_eq!(a.cells(), b.cells());

        // 18 × 14 grid minus holes
        assert!(a.cells().len() < 18 * 14);
        assert!(a.cells().iter().all(|c| !is_hole(c.offset.0, c.offset.1, Archetype::Splits)));
        assert_eq!(a.depth, config.spawn_depth);
        assert!(a.active);
    }

    #[test]
    fn test_cells_near_uses_set_union() {
        let config = WallConfig::default();
        let wall = Obstacle::build(ObstacleId(0), Archetype::ArmsUp, &config);
        // Two neighbouring solid cells far from any hole
        let a = wall.cells().iter().find(|c| c.offset == (-3.75, 0.25)).unwrap().id;
        let b = wall.cells().iter().find(|c| c.offset == (-3.25, 0.25)).unwrap().id;

        let only_a = wall.cells_near(&BTreeSet::from([a]), 0.8);
        let only_b = wall.cells_near(&BTreeSet::from([b]), 0.8);
        let both = wall.cells_near(&BTreeSet::from([a, b]), 0.8);

        // 3×3 neighbourhoods
        assert_eq!(only_a.len(), 9);
        assert_eq!(only_b.len(), 9);
        let union: BTreeSet<CellId> = only_a.union(&only_b).copied().collect();
        assert_eq!(both, union);
        assert_eq!(both.len(), 12);
    }

    #[test]
    fn test_detach_moves_cells_out() {
        let config = WallConfig::default();
        let mut wall = Obstacle::build(ObstacleId(3), Archetype::ArmsUp, &config);
        wall.depth = -2.0;
        let before = wall.cells().len();
        let target = wall.cells()[0];
        let picked = BTreeSet::from([target.id, CellId(u32::MAX)]);

        let detached = wall.detach(&picked);
        assert_eq!(detached.len(), 1);
        assert_eq!(wall.cells().len(), before - 1);
        assert!(wall.cell(target.id).is_none());

        let d = detached[0];
        assert_eq!(d.obstacle, ObstacleId(3));
        assert_eq!(d.position, Point3::new(target.offset.0, target.offset.1, -2.0));
    }

    #[test]
    fn test_spawner_waits_for_interval() {
        let config = WallConfig::default();
        let mut rng = SmallRng::seed_from_u64(7);
        let mut spawner = WallSpawner::new();

        // Not started
        assert!(spawner.poll(100.0, &config, &mut rng).is_none());

        spawner.restart(10.0, &config);
        assert!(spawner.poll(13.9, &config, &mut rng).is_none());
        let first = spawner.poll(14.0, &config, &mut rng).unwrap();
        assert!(spawner.poll(14.5, &config, &mut rng).is_none());
        let second = spawner.poll(18.0, &config, &mut rng).unwrap();
        assert_ne!(first.id, second.id);
    }
}
