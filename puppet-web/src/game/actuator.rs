//! Limb actuation - finger curl to joint angle, plus limb transforms
//!
//! Each limb swings in the frontal plane around a fixed pivot on the
//! puppet. Angle 0 hangs straight down. Left limbs use a negative sign so
//! both sides open outward symmetrically.

use std::f32::consts::{FRAC_PI_2, PI};

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use serde::Serialize;

use super::bounds::Aabb;
use super::calibration::CalibrationProfile;
use super::landmarks::FingerCurls;
use super::mode::HitboxShape;

/// Below this calibration range the fallback span is used
pub const DEGENERATE_RANGE: f32 = 1e-4;

/// Span substituted for a degenerate calibration range
pub const FALLBACK_SPAN: f32 = 0.1;

pub const LIMB_COUNT: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Limb {
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
}

/// Fixed per-limb rig data
pub struct LimbSpec {
    /// Pivot in puppet-local space (shoulder or hip)
    pub pivot: [f32; 3],
    pub length: f32,
    /// Magnitude range of the swing (radians)
    pub out_min: f32,
    pub out_max: f32,
    /// +1 opens toward +x, −1 mirrors
    pub sign: f32,
}

const LIMB_SPECS: [LimbSpec; LIMB_COUNT] = [
    LimbSpec { pivot: [-0.55, 0.8, 0.0], length: 1.3, out_min: 0.0, out_max: PI, sign: -1.0 },
    LimbSpec { pivot: [0.55, 0.8, 0.0], length: 1.3, out_min: 0.0, out_max: PI, sign: 1.0 },
    LimbSpec { pivot: [-0.25, -0.8, 0.0], length: 1.5, out_min: 0.0, out_max: FRAC_PI_2, sign: -1.0 },
    LimbSpec { pivot: [0.25, -0.8, 0.0], length: 1.5, out_min: 0.0, out_max: FRAC_PI_2, sign: 1.0 },
];

impl Limb {
    /// Finger order (index, middle, ring, pinky) maps onto this order
    pub const ALL: [Limb; LIMB_COUNT] = [Limb::LeftArm, Limb::RightArm, Limb::LeftLeg, Limb::RightLeg];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn spec(self) -> &'static LimbSpec {
        &LIMB_SPECS[self.index()]
    }

    pub fn length(self) -> f32 {
        self.spec().length
    }
}

/// Map a live curl into `[out_min, out_max]` using the calibration refs
///
/// Pure. A degenerate range saturates instead of dividing by ~0.
pub fn map_curl_to_angle(curl: f32, open_ref: f32, closed_ref: f32, out_min: f32, out_max: f32) -> f32 {
    let mut range = closed_ref - open_ref;
    if range.abs() < DEGENERATE_RANGE {
        range = FALLBACK_SPAN;
    }

    let t = (curl - open_ref) / range;
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    if t <= 0.0 {
        return out_min;
    }
    if t >= 1.0 {
        return out_max;
    }

    let angle = out_min + (out_max - out_min) * t;
    let (lo, hi) = if out_min <= out_max { (out_min, out_max) } else { (out_max, out_min) };
    angle.clamp(lo, hi)
}

/// Per-limb angles and hitboxes, owned by the session
pub struct LimbRig {
    root: Point3<f32>,
    angles: [f32; LIMB_COUNT],
    hitboxes: Option<[HitboxShape; LIMB_COUNT]>,
}

impl LimbRig {
    /// `root` is the puppet torso centre in world space
    pub fn new(root: Point3<f32>) -> Self {
        Self {
            root,
            angles: [0.0; LIMB_COUNT],
            hitboxes: None,
        }
    }

    pub fn angles(&self) -> [f32; LIMB_COUNT] {
        self.angles
    }

    pub fn angle(&self, limb: Limb) -> f32 {
        self.angles[limb.index()]
    }

    /// Signed angles for all four limbs from this frame's curls
    pub fn solve(curls: &FingerCurls, profile: &CalibrationProfile) -> [f32; LIMB_COUNT] {
        Limb::ALL.map(|limb| {
            let i = limb.index();
            let spec = limb.spec();
            let magnitude = map_curl_to_angle(curls[i], profile.open[i], profile.closed[i], spec.out_min, spec.out_max);
            spec.sign * magnitude
        })
    }

    /// Commit a full set of angles at once
    pub fn set_angles(&mut self, angles: [f32; LIMB_COUNT]) {
        self.angles = angles;
    }

    pub fn set_hitboxes(&mut self, hitboxes: [HitboxShape; LIMB_COUNT]) {
        self.hitboxes = Some(hitboxes);
    }

    pub fn has_hitboxes(&self) -> bool {
        self.hitboxes.is_some()
    }

    pub fn world_transform(&self, limb: Limb) -> Isometry3<f32> {
        let [px, py, pz] = limb.spec().pivot;
        let pivot = self.root + Vector3::new(px, py, pz);
        Isometry3::from_parts(
            Translation3::from(pivot.coords),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), self.angle(limb)),
        )
    }

    /// Where the string ties on: the far end of the limb
    pub fn attachment_point(&self, limb: Limb) -> Point3<f32> {
        self.world_transform(limb) * Point3::new(0.0, -limb.length(), 0.0)
    }

    /// World bounds of every limb hitbox, or empty before a mode is chosen
    pub fn hitbox_bounds(&self) -> Vec<Aabb> {
        let Some(hitboxes) = &self.hitboxes else {
            return Vec::new();
        };
        Limb::ALL
            .iter()
            .zip(hitboxes.iter())
            .map(|(&limb, shape)| Aabb::from_oriented_box(&self.world_transform(limb), shape.center, shape.half_extents))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_maps_to_midpoint() {
        let angle = map_curl_to_angle(-0.225, -0.4, -0.05, 0.0, PI);
        assert!((angle - PI / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_clamps_outside_calibration() {
        assert_eq!(map_curl_to_angle(-1.0, -0.4, -0.05, 0.2, 1.2), 0.2);
        assert_eq!(map_curl_to_angle(0.5, -0.4, -0.05, 0.2, 1.2), 1.2);
    }

    #[test]
    fn test_degenerate_range_stays_in_bounds() {
        for curl in [-10.0, -0.3, -0.2999, -0.2, 0.0, 3.0] {
            let angle = map_curl_to_angle(curl, -0.3, -0.3, 0.0, 1.5);
            assert!(angle.is_finite());
            assert!((0.0..=1.5).contains(&angle));
        }
        // Fallback span saturates a short way past the reference
        assert_eq!(map_curl_to_angle(-0.1, -0.3, -0.3, 0.0, 1.5), 1.5);
    }

    #[test]
    fn test_monotonic_and_bounded() {
        let refs = [(-0.4, -0.05), (-0.05, -0.4), (0.2, 0.2), (-1e30, 1e30)];
        for (open, closed) in refs {
            let mut prev: Option<f32> = None;
            let increasing = closed >= open;
            for step in 0..=200 {
                let curl = -1.0 + step as f32 * 0.01;
                let angle = map_curl_to_angle(curl, open, closed, -0.5, 2.0);
                assert!((-0.5..=2.0).contains(&angle), "angle {} out of range", angle);
                if let Some(p) = prev {
                    if increasing {
                        assert!(angle >= p);
                    } else {
                        assert!(angle <= p);
                    }
                }
                prev = Some(angle);
            }
        }
    }

    #[test]
    fn test_extreme_finite_inputs_stay_bounded() {
        let angle = map_curl_to_angle(f32::MAX, -f32::MAX, f32::MAX, 0.0, 1.0);
        assert!((0.0..=1.0).contains(&angle));
        let angle = map_curl_to_angle(0.0, 0.0, 0.0, 1.0, -1.0);
        assert!((-1.0..=1.0).contains(&angle));
    }

    #[test]
    fn test_left_and_right_mirror() {
        let profile = CalibrationProfile { open: [-0.4; 4], closed: [-0.05; 4] };
        let angles = LimbRig::solve(&[-0.05; 4], &profile);
        assert!((angles[Limb::LeftArm.index()] + PI).abs() < 1e-5);
        assert!((angles[Limb::RightArm.index()] - PI).abs() < 1e-5);
        assert!((angles[Limb::LeftLeg.index()] + FRAC_PI_2).abs() < 1e-5);
        assert!((angles[Limb::RightLeg.index()] - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_attachment_point_follows_rotation() {
        let mut rig = LimbRig::new(Point3::origin());
        let hanging = rig.attachment_point(Limb::RightArm);
        assert!((hanging.x - 0.55).abs() < 1e-5);
        assert!((hanging.y - (0.8 - 1.3)).abs() < 1e-5);

        rig.set_angles([-PI, PI, 0.0, FRAC_PI_2]);
        let raised = rig.attachment_point(Limb::RightArm);
        assert!((raised.x - 0.55).abs() < 1e-4);
        assert!((raised.y - (0.8 + 1.3)).abs() < 1e-4);

        let split = rig.attachment_point(Limb::RightLeg);
        assert!((split.x - (0.25 + 1.5)).abs() < 1e-4);
        assert!((split.y + 0.8).abs() < 1e-4);

        // Mirrored arm lands on the other side
        let left = rig.attachment_point(Limb::LeftArm);
        assert!((left.x + 0.55).abs() < 1e-4);
    }

    #[test]
    fn test_no_hitboxes_before_mode() {
        let rig = LimbRig::new(Point3::origin());
        assert!(!rig.has_hitboxes());
        assert!(rig.hitbox_bounds().is_empty());
    }
}
