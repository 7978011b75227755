//! Attribute domains and value types.
//!
//! An attribute is a column of values with one entry per element of its
//! [`AttributeDomain`]. Every column stores values of exactly one
//! [`AttributeType`] out of a small, closed set.

use serde::{Deserialize, Serialize};

use crate::value::{AttributeElement, AttributeValue};

/// The element granularity an attribute is defined over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttributeDomain {
    /// One value per vertex / point.
    Point,
    /// One value per mesh edge.
    Edge,
    /// One value per face corner (a vertex as used by one face).
    Corner,
    /// One value per mesh face.
    Face,
    /// One value per instance.
    Instance,
}

impl AttributeDomain {
    /// Every domain, in declaration order.
    pub const ALL: [AttributeDomain; 5] = [
        AttributeDomain::Point,
        AttributeDomain::Edge,
        AttributeDomain::Corner,
        AttributeDomain::Face,
        AttributeDomain::Instance,
    ];

    /// A lowercase, human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            AttributeDomain::Point => "point",
            AttributeDomain::Edge => "edge",
            AttributeDomain::Corner => "corner",
            AttributeDomain::Face => "face",
            AttributeDomain::Instance => "instance",
        }
    }
}

impl std::fmt::Display for AttributeDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Runtime tag for the type of value stored in an attribute column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttributeType {
    /// `f32`
    Float,
    /// [`glam::Vec2`]
    Float2,
    /// [`glam::Vec3`]
    Float3,
    /// RGBA color stored as [`glam::Vec4`].
    Color,
    /// `i32`
    Int32,
    /// `bool`
    Boolean,
}

impl AttributeType {
    /// Every value type, in declaration order.
    pub const ALL: [AttributeType; 6] = [
        AttributeType::Float,
        AttributeType::Float2,
        AttributeType::Float3,
        AttributeType::Color,
        AttributeType::Int32,
        AttributeType::Boolean,
    ];

    /// The type tag of a statically known element type.
    #[must_use]
    pub fn of<T: AttributeElement>() -> Self {
        T::TYPE
    }

    /// The value new elements of this type are initialised with.
    #[must_use]
    pub fn default_value(self) -> AttributeValue {
        match self {
            AttributeType::Float => AttributeValue::Float(0.0),
            AttributeType::Float2 => AttributeValue::Float2(glam::Vec2::ZERO),
            AttributeType::Float3 => AttributeValue::Float3(glam::Vec3::ZERO),
            AttributeType::Color => AttributeValue::Color(glam::Vec4::ZERO),
            AttributeType::Int32 => AttributeValue::Int32(0),
            AttributeType::Boolean => AttributeValue::Boolean(false),
        }
    }

    /// Size of one element in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        use std::mem::size_of;
        match self {
            AttributeType::Float => size_of::<f32>(),
            AttributeType::Float2 => size_of::<glam::Vec2>(),
            AttributeType::Float3 => size_of::<glam::Vec3>(),
            AttributeType::Color => size_of::<glam::Vec4>(),
            AttributeType::Int32 => size_of::<i32>(),
            AttributeType::Boolean => size_of::<bool>(),
        }
    }

    /// A lowercase, human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            AttributeType::Float => "float",
            AttributeType::Float2 => "float2",
            AttributeType::Float3 => "float3",
            AttributeType::Color => "color",
            AttributeType::Int32 => "int32",
            AttributeType::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Domain and type of an existing attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeInfo {
    pub domain: AttributeDomain,
    pub data_type: AttributeType,
}

impl AttributeInfo {
    #[must_use]
    pub const fn new(domain: AttributeDomain, data_type: AttributeType) -> Self {
        Self { domain, data_type }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values_match_their_type() {
        for ty in AttributeType::ALL {
            assert_eq!(ty.default_value().data_type(), ty);
        }
    }

    #[test]
    fn test_type_of_element() {
        assert_eq!(AttributeType::of::<f32>(), AttributeType::Float);
        assert_eq!(AttributeType::of::<glam::Vec3>(), AttributeType::Float3);
        assert_eq!(AttributeType::of::<bool>(), AttributeType::Boolean);
    }

    #[test]
    fn test_sizes() {
        assert_eq!(AttributeType::Float3.size(), 12);
        assert_eq!(AttributeType::Color.size(), 16);
        assert_eq!(AttributeType::Boolean.size(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(AttributeDomain::Corner.to_string(), "corner");
        assert_eq!(AttributeType::Int32.to_string(), "int32");
    }

    #[test]
    fn test_info_serialization_roundtrip() {
        let info = AttributeInfo::new(AttributeDomain::Face, AttributeType::Color);
        let bytes = rmp_serde::to_vec(&info).unwrap();
        let restored: AttributeInfo = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(info, restored);
    }
}
