//! Visual mode capability table
//!
//! The page offers two skins. The core only cares about which hitbox
//! geometry is attached to the limbs; the other kinds are passed through
//! to the renderer.

use nalgebra::{Point3, Vector3};
use serde::Serialize;

use super::actuator::{Limb, LIMB_COUNT};
use crate::error::GameError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum VisualMode {
    Prototype,
    Full,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LimbGeometryKind {
    Box,
    Capsule,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MaterialKind {
    Flat,
    Wood,
    Brick,
}

/// Box attached to a limb, in limb-local space (limb hangs along −y)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitboxShape {
    pub center: Point3<f32>,
    pub half_extents: Vector3<f32>,
}

impl HitboxShape {
    /// Box hanging from the pivot covering `length`
    pub fn hanging(length: f32, half_width: f32) -> Self {
        Self {
            center: Point3::new(0.0, -length * 0.5, 0.0),
            half_extents: Vector3::new(half_width, length * 0.5, half_width),
        }
    }

    /// 4 limbs × (center xyz, half extents xyz)
    pub fn parse_set(flat: &[f32]) -> Result<[HitboxShape; LIMB_COUNT], GameError> {
        let expected = LIMB_COUNT * 6;
        if flat.len() != expected || flat.iter().any(|v| !v.is_finite()) {
            return Err(GameError::HitboxCount { got: flat.len(), expected });
        }
        let mut shapes = [HitboxShape::hanging(1.0, 0.1); LIMB_COUNT];
        for (shape, v) in shapes.iter_mut().zip(flat.chunks_exact(6)) {
            *shape = HitboxShape {
                center: Point3::new(v[0], v[1], v[2]),
                half_extents: Vector3::new(v[3].abs(), v[4].abs(), v[5].abs()),
            };
        }
        Ok(shapes)
    }
}

/// Everything that differs between modes, resolved once per switch
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeProfile {
    pub mode: VisualMode,
    pub limb_geometry: LimbGeometryKind,
    pub limb_material: MaterialKind,
    pub wall_material: MaterialKind,
    pub hitboxes: [HitboxShape; LIMB_COUNT],
}

impl VisualMode {
    pub fn parse(name: &str) -> Result<Self, GameError> {
        match name.to_ascii_lowercase().as_str() {
            "prototype" => Ok(VisualMode::Prototype),
            "full" => Ok(VisualMode::Full),
            _ => Err(GameError::UnknownMode(name.to_string())),
        }
    }

    pub fn profile(self) -> ModeProfile {
        match self {
            VisualMode::Prototype => ModeProfile {
                mode: self,
                limb_geometry: LimbGeometryKind::Box,
                limb_material: MaterialKind::Flat,
                wall_material: MaterialKind::Flat,
                hitboxes: Limb::ALL.map(|limb| HitboxShape::hanging(limb.length(), 0.15)),
            },
            // Rounded limbs are slimmer; hitboxes follow the mesh
            VisualMode::Full => ModeProfile {
                mode: self,
                limb_geometry: LimbGeometryKind::Capsule,
                limb_material: MaterialKind::Wood,
                wall_material: MaterialKind::Brick,
                hitboxes: Limb::ALL.map(|limb| HitboxShape::hanging(limb.length(), 0.12)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_names() {
        assert_eq!(VisualMode::parse("prototype").unwrap(), VisualMode::Prototype);
        assert_eq!(VisualMode::parse("FULL").unwrap(), VisualMode::Full);
        assert!(matches!(VisualMode::parse("neon"), Err(GameError::UnknownMode(_))));
    }

    #[test]
    fn test_modes_differ_only_in_presentation_and_hitboxes() {
        let proto = VisualMode::Prototype.profile();
        let full = VisualMode::Full.profile();
        assert_ne!(proto.limb_geometry, full.limb_geometry);
        for (a, b) in proto.hitboxes.iter().zip(full.hitboxes.iter()) {
            // Same hanging span, different thickness
            assert_eq!(a.center, b.center);
            assert!(b.half_extents.x < a.half_extents.x);
        }
    }

    #[test]
    fn test_parse_hitbox_set() {
        let mut flat = vec![0.0f32; 24];
        flat[3] = -0.2;
        flat[4] = 0.5;
        let shapes = HitboxShape::parse_set(&flat).unwrap();
        assert_eq!(shapes[0].half_extents, Vector3::new(0.2, 0.5, 0.0));
        assert!(HitboxShape::parse_set(&flat[..20]).is_err());
    }
}
