//! # geometry_math
//!
//! Spatial types for geometry sets. Re-exports [`glam`] for linear algebra
//! and defines the per-instance transform and axis-aligned bounds.

pub mod bounds;
pub mod transform;

// Re-export glam types for convenience.
pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

pub use bounds::Bounds;
pub use transform::InstanceTransform;
