//! Axis-aligned bounding boxes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An axis-aligned box. `min` is component-wise less than or equal to `max`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    /// A zero-sized box at `point`.
    #[must_use]
    pub fn from_point(point: Vec3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// The smallest box containing every point, or `None` if there are none.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::from_point(first), |mut bounds, point| {
            bounds.extend(point);
            bounds
        }))
    }

    /// Grow to contain `point`.
    pub fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Grow to contain a sphere of `radius` around `center`.
    pub fn extend_radius(&mut self, center: Vec3, radius: f32) {
        let radius = Vec3::splat(radius.abs());
        self.min = self.min.min(center - radius);
        self.max = self.max.max(center + radius);
    }

    /// The smallest box containing both boxes.
    #[must_use]
    pub fn merge(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let bounds = Bounds::from_points([
            Vec3::new(1.0, -2.0, 0.0),
            Vec3::new(-1.0, 3.0, 0.5),
        ])
        .unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 3.0, 0.5));
        assert_eq!(bounds.center(), Vec3::new(0.0, 0.5, 0.25));
    }

    #[test]
    fn test_from_no_points() {
        assert!(Bounds::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_extend_radius() {
        let mut bounds = Bounds::from_point(Vec3::ZERO);
        bounds.extend_radius(Vec3::X, 0.5);
        assert_eq!(bounds.min, Vec3::new(0.0, -0.5, -0.5));
        assert_eq!(bounds.max, Vec3::new(1.5, 0.5, 0.5));
    }

    #[test]
    fn test_merge_and_contains() {
        let a = Bounds::from_point(Vec3::ZERO);
        let b = Bounds::from_point(Vec3::ONE);
        let merged = a.merge(&b);
        assert_eq!(merged.size(), Vec3::ONE);
        assert!(merged.contains(Vec3::splat(0.5)));
        assert!(!merged.contains(Vec3::splat(1.5)));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let bounds = Bounds::from_points([Vec3::ZERO, Vec3::ONE]).unwrap();
        let bytes = rmp_serde::to_vec(&bounds).unwrap();
        let restored: Bounds = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(bounds, restored);
    }
}
