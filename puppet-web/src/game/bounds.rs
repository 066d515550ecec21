//! Axis-aligned bounding boxes for limb/cell overlap tests

use nalgebra::{Isometry3, Point3, Vector3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn from_center(center: Point3<f32>, half_extents: Vector3<f32>) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// World bounds of a local box after applying `transform`
    ///
    /// Uses the absolute rotation matrix trick: extent_i = Σ |R_ij| · h_j.
    pub fn from_oriented_box(
        transform: &Isometry3<f32>,
        local_center: Point3<f32>,
        half_extents: Vector3<f32>,
    ) -> Self {
        let center = transform * local_center;
        let abs = transform.rotation.to_rotation_matrix().matrix().abs();
        Self::from_center(center, abs * half_extents)
    }

    /// Strict overlap: touching faces do not count
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
            && self.min.z < other.max.z
            && other.min.z < self.max.z
    }

    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }
}
