//! Debris - cells blown out of a wall on impact
//!
//! Fragments are owned by the field alone; once detached they no longer
//! follow their wall and are dropped when they fall through the floor.

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};
use rand::Rng;

use super::wall::{CellId, DetachedCell, ObstacleId};
use crate::config::DebrisConfig;

/// A free-flying cell
#[derive(Clone, Debug)]
pub struct DebrisFragment {
    pub obstacle: ObstacleId,
    pub cell: CellId,
    pub position: Point3<f32>,
    pub velocity: Vector3<f32>,
    pub orientation: UnitQuaternion<f32>,
    pub axis: Unit<Vector3<f32>>,
    /// rad/s around `axis`
    pub angular_speed: f32,
    /// Rendered with the damaged look
    pub damaged: bool,
}

impl DebrisFragment {
    /// Launch a detached cell; `wall_velocity` is carried forward partially
    pub fn launch<R: Rng>(cell: DetachedCell, wall_velocity: Vector3<f32>, config: &DebrisConfig, rng: &mut R) -> Self {
        let spread = config.spread.max(0.0);
        let lateral = Vector3::new(
            sample(rng, -spread, spread),
            sample(rng, 0.0, spread),
            0.0,
        );
        let forward = wall_velocity * sample(rng, config.forward_bias.0, config.forward_bias.1);

        let raw_axis = Vector3::new(
            sample(rng, -1.0, 1.0),
            sample(rng, -1.0, 1.0),
            sample(rng, -1.0, 1.0),
        );
        let axis = Unit::try_new(raw_axis, 1e-6).unwrap_or_else(Vector3::y_axis);

        Self {
            obstacle: cell.obstacle,
            cell: cell.cell,
            position: cell.position,
            velocity: lateral + forward,
            orientation: cell.orientation,
            axis,
            angular_speed: sample(rng, config.spin.0, config.spin.1),
            damaged: true,
        }
    }

    fn integrate(&mut self, dt: f32, gravity: f32) {
        self.velocity.y -= gravity * dt;
        self.position += self.velocity * dt;
        let spin = UnitQuaternion::from_axis_angle(&self.axis, self.angular_speed * dt);
        self.orientation = spin * self.orientation;
    }
}

/// Uniform in [lo, hi], tolerating an empty range
fn sample<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.gen_range(lo..=hi)
    } else {
        lo
    }
}

pub struct DebrisField {
    fragments: Vec<DebrisFragment>,
}

impl DebrisField {
    pub fn new() -> Self {
        Self { fragments: Vec::new() }
    }

    pub fn fragments(&self) -> &[DebrisFragment] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Take ownership of cells detached from a wall
    pub fn spawn<R: Rng>(
        &mut self,
        cells: Vec<DetachedCell>,
        wall_velocity: Vector3<f32>,
        config: &DebrisConfig,
        rng: &mut R,
    ) -> usize {
        let count = cells.len();
        self.fragments.extend(
            cells
                .into_iter()
                .map(|cell| DebrisFragment::launch(cell, wall_velocity, config, rng)),
        );
        count
    }

    /// Ballistic step, then drop everything below the floor
    pub fn update(&mut self, dt: f32, config: &DebrisConfig) {
        for fragment in self.fragments.iter_mut() {
            fragment.integrate(dt, config.gravity);
        }
        let floor = config.floor;
        self.fragments.retain(|f| f.position.y >= floor);
    }
}

impl Default for DebrisField {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn detached(id: u32, position: Point3<f32>) -> DetachedCell {
        DetachedCell {
            obstacle: ObstacleId(0),
            cell: CellId(id),
            position,
            orientation: UnitQuaternion::identity(),
        }
    }

    #[test]
    fn test_launch_keeps_snapshot_and_forward_momentum() {
        let config = DebrisConfig::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let start = Point3::new(1.0, 2.0, -0.5);
        let fragment = DebrisFragment::launch(detached(4, start), Vector3::new(0.0, 0.0, 8.0), &config, &mut rng);

        assert_eq!(fragment.position, start);
        assert_eq!(fragment.cell, CellId(4));
        assert!(fragment.damaged);
        assert!(fragment.velocity.x.abs() <= config.spread);
        assert!(fragment.velocity.y >= 0.0 && fragment.velocity.y <= config.spread);
        assert!(fragment.velocity.z >= 8.0 * config.forward_bias.0 - 1e-5);
        assert!(fragment.velocity.z <= 8.0 * config.forward_bias.1 + 1e-5);
        assert!((fragment.axis.norm() - 1.0).abs() < 1e-5);
        assert!(fragment.angular_speed >= config.spin.0 && fragment.angular_speed <= config.spin.1);
    }

    #[test]
    fn test_gravity_pulls_fragments_down() {
        let config = DebrisConfig { spread: 0.0, forward_bias: (0.0, 0.0), ..DebrisConfig::default() };
        let mut rng = SmallRng::seed_from_u64(2);
        let mut field = DebrisField::new();
        field.spawn(vec![detached(0, Point3::new(0.0, 0.0, 0.0))], Vector3::zeros(), &config, &mut rng);

        field.update(0.1, &config);
        let f = &field.fragments()[0];
        assert!((f.velocity.y + config.gravity * 0.1).abs() < 1e-5);
        assert!(f.position.y < 0.0);
        // Orientation has turned away from identity
        assert!(f.orientation.angle() > 0.0);
    }

    #[test]
    fn test_fragments_below_floor_are_removed() {
        let config = DebrisConfig::default();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut field = DebrisField::new();
        let cells = (0..50).map(|i| detached(i, Point3::new(i as f32 * 0.1, 1.0, 0.0))).collect();
        assert_eq!(field.spawn(cells, Vector3::new(0.0, 0.0, 8.0), &config, &mut rng), 50);

        // 10 s of free fall clears every fragment
        for _ in 0..600 {
            field.update(1.0 / 60.0, &config);
        }
        assert!(field.is_empty());
    }
}
