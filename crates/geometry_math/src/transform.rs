//! Per-instance transform.
//!
//! [`InstanceTransform`] places one instance: a position, an Euler rotation
//! and a per-axis scale. Rotation is kept as XYZ Euler angles in radians
//! because that is what the instances component exposes as an attribute.

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position, rotation and scale of a single instance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct InstanceTransform {
    /// Position relative to the owning geometry.
    pub position: Vec3,
    /// XYZ Euler angles in radians.
    pub rotation: Vec3,
    /// Per-axis scale factor.
    pub scale: Vec3,
}

impl InstanceTransform {
    /// The identity transform: origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Create a transform at `position` with no rotation and unit scale.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    #[must_use]
    pub fn from_position_rotation(position: Vec3, rotation: Vec3) -> Self {
        Self {
            position,
            rotation,
            ..Self::IDENTITY
        }
    }

    /// The rotation as a quaternion.
    #[must_use]
    pub fn quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    /// Compute the 4×4 matrix for this transform.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }

    /// Apply the transform to a point.
    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.quat() * (point * self.scale)
    }

    #[must_use]
    pub fn translated(mut self, offset: Vec3) -> Self {
        self.position += offset;
        self
    }

    /// Add `angles` to the Euler rotation.
    #[must_use]
    pub fn rotated(mut self, angles: Vec3) -> Self {
        self.rotation += angles;
        self
    }

    /// Apply a uniform scale factor.
    #[must_use]
    pub fn scaled(mut self, factor: f32) -> Self {
        self.scale *= factor;
        self
    }
}

impl Default for InstanceTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn test_identity_transform() {
        let t = InstanceTransform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Vec3::ZERO);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.to_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_from_position() {
        let t = InstanceTransform::from_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn test_builder_chain() {
        let t = InstanceTransform::IDENTITY
            .translated(Vec3::X)
            .rotated(Vec3::new(0.0, 0.0, 0.5))
            .scaled(2.0);
        assert_eq!(t.position, Vec3::X);
        assert_eq!(t.rotation.z, 0.5);
        assert_eq!(t.scale, Vec3::splat(2.0));
    }

    #[test]
    fn test_transform_point_rotates_and_scales() {
        let t = InstanceTransform::new(
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, FRAC_PI_2),
            Vec3::splat(2.0),
        );
        let p = t.transform_point(Vec3::X);
        assert!((p - Vec3::new(0.0, 2.0, 1.0)).length() < 1e-5);
        let m = t.to_matrix().transform_point3(Vec3::X);
        assert!((m - p).length() < 1e-5);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let t = InstanceTransform::from_position(Vec3::new(1.0, 2.0, 3.0)).scaled(0.5);
        let bytes = rmp_serde::to_vec(&t).unwrap();
        let restored: InstanceTransform = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(t, restored);
    }
}
