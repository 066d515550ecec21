//! Tunable game constants
//!
//! Every field has a default, so the page may pass a partial JSON object
//! (or nothing at all) to `init_session`.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub wall: WallConfig,
    pub debris: DebrisConfig,
    pub hand: HandConfig,
    /// Upper bound on a single tick's dt (seconds)
    pub max_frame_dt: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            wall: WallConfig::default(),
            debris: DebrisConfig::default(),
            hand: HandConfig::default(),
            max_frame_dt: 0.1,
        }
    }
}

/// Wall grid geometry, motion and scoring band
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WallConfig {
    /// Panel width (x), centred on the puppet
    pub width: f32,
    /// Panel height (y), centred on the puppet torso
    pub height: f32,
    /// Cell edge length
    pub pitch: f32,
    /// Cell depth (z extent)
    pub thickness: f32,
    /// Depth at which new walls appear
    pub spawn_depth: f32,
    /// Approach speed (units/s, +z)
    pub speed: f32,
    /// Seconds between spawns
    pub spawn_interval: f64,
    /// Depth of the puppet
    pub player_depth: f32,
    /// Half-width of the collision band around `player_depth`
    pub hit_tolerance: f32,
    /// Walls further than this past the player are removed
    pub cleanup_distance: f32,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            width: 9.0,
            height: 7.0,
            pitch: 0.5,
            thickness: 0.5,
            spawn_depth: -40.0,
            speed: 8.0,
            spawn_interval: 4.0,
            player_depth: 0.0,
            hit_tolerance: 0.5,
            cleanup_distance: 8.0,
        }
    }
}

/// Explosion selection and ballistic fragment motion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebrisConfig {
    /// Cells within this distance of any struck cell are blown out
    pub explosion_radius: f32,
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Fragments below this height are destroyed
    pub floor: f32,
    /// Max lateral speed on x, and max extra upward speed on y
    pub spread: f32,
    /// Fraction range (min, max) of the wall speed kept along +z
    pub forward_bias: (f32, f32),
    /// Angular speed range (rad/s)
    pub spin: (f32, f32),
}

impl Default for DebrisConfig {
    fn default() -> Self {
        Self {
            explosion_radius: 0.8,
            gravity: 9.8,
            floor: -10.0,
            spread: 3.0,
            forward_bias: (0.3, 0.8),
            spin: (2.0, 8.0),
        }
    }
}

/// Placement of the hand marker cloud above the puppet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HandConfig {
    /// World position of normalized image centre (0.5, 0.5, 0)
    pub marker_origin: [f32; 3],
    /// World units per normalized image unit
    pub marker_scale: f32,
}

impl Default for HandConfig {
    fn default() -> Self {
        Self {
            marker_origin: [0.0, 4.5, 0.0],
            marker_scale: 4.0,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON config and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let w = &self.wall;
        let positive = [
            ("wall.width", w.width),
            ("wall.height", w.height),
            ("wall.pitch", w.pitch),
            ("wall.thickness", w.thickness),
            ("wall.speed", w.speed),
            ("wall.hit_tolerance", w.hit_tolerance),
            ("wall.cleanup_distance", w.cleanup_distance),
            ("max_frame_dt", self.max_frame_dt),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(GameError::InvalidConfig(format!("{} must be > 0, got {}", name, value)));
            }
        }
        if !(w.spawn_interval.is_finite() && w.spawn_interval > 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "wall.spawn_interval must be > 0, got {}",
                w.spawn_interval
            )));
        }
        if w.spawn_depth >= w.player_depth {
            return Err(GameError::InvalidConfig(
                "wall.spawn_depth must be in front of (less than) wall.player_depth".to_string(),
            ));
        }
        if w.cleanup_distance <= w.hit_tolerance + w.thickness * 0.5 {
            return Err(GameError::InvalidConfig(format!(
                "wall.cleanup_distance must exceed hit_tolerance + thickness / 2, got {}",
                w.cleanup_distance
            )));
        }

        let d = &self.debris;
        let finite = [
            ("debris.explosion_radius", d.explosion_radius),
            ("debris.gravity", d.gravity),
            ("debris.floor", d.floor),
            ("debris.spread", d.spread),
            ("debris.forward_bias", d.forward_bias.0),
            ("debris.forward_bias", d.forward_bias.1),
            ("debris.spin", d.spin.0),
            ("debris.spin", d.spin.1),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(GameError::InvalidConfig(format!("{} must be finite, got {}", name, value)));
            }
        }
        if d.explosion_radius < 0.0 || d.forward_bias.0 > d.forward_bias.1 || d.spin.0 > d.spin.1 {
            return Err(GameError::InvalidConfig("debris ranges are inverted or negative".to_string()));
        }
        Ok(())
    }
}
