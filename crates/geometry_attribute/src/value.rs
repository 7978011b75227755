//! Tagged attribute values, implicit type conversion, and the
//! [`AttributeElement`] trait that connects Rust types to [`AttributeType`]
//! tags.

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::data::{AttributeData, AttributeSlice, AttributeSliceMut};
use crate::domain::AttributeType;

/// Rec. 709 luma weights used when a color is reduced to a single channel.
const LUMINANCE_WEIGHTS: Vec3 = Vec3::new(0.2126, 0.7152, 0.0722);

/// A single attribute value of any supported type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Float(f32),
    Float2(Vec2),
    Float3(Vec3),
    Color(Vec4),
    Int32(i32),
    Boolean(bool),
}

impl AttributeValue {
    /// The type tag of this value.
    #[must_use]
    pub const fn data_type(&self) -> AttributeType {
        match self {
            AttributeValue::Float(_) => AttributeType::Float,
            AttributeValue::Float2(_) => AttributeType::Float2,
            AttributeValue::Float3(_) => AttributeType::Float3,
            AttributeValue::Color(_) => AttributeType::Color,
            AttributeValue::Int32(_) => AttributeType::Int32,
            AttributeValue::Boolean(_) => AttributeType::Boolean,
        }
    }

    /// Extract the value as `T` if it already has `T`'s type.
    #[must_use]
    pub fn get<T: AttributeElement>(self) -> Option<T> {
        T::from_value(self)
    }

    /// Convert the value to another type.
    ///
    /// Every pair of types has a conversion, so this never fails. Vectors
    /// reduce to scalars by their length, colors by their luminance, and
    /// scalars widen by splatting.
    #[must_use]
    pub fn convert(self, to: AttributeType) -> AttributeValue {
        if self.data_type() == to {
            return self;
        }
        match to {
            AttributeType::Float => AttributeValue::Float(self.as_float()),
            AttributeType::Float2 => AttributeValue::Float2(self.as_float2()),
            AttributeType::Float3 => AttributeValue::Float3(self.as_float3()),
            AttributeType::Color => AttributeValue::Color(self.as_color()),
            AttributeType::Int32 => AttributeValue::Int32(self.as_int()),
            AttributeType::Boolean => AttributeValue::Boolean(self.as_bool()),
        }
    }

    fn as_float(self) -> f32 {
        match self {
            AttributeValue::Float(v) => v,
            AttributeValue::Float2(v) => v.length(),
            AttributeValue::Float3(v) => v.length(),
            AttributeValue::Color(c) => luminance(c),
            AttributeValue::Int32(v) => v as f32,
            AttributeValue::Boolean(v) => bool_to_float(v),
        }
    }

    fn as_float2(self) -> Vec2 {
        match self {
            AttributeValue::Float2(v) => v,
            AttributeValue::Float3(v) => v.truncate(),
            AttributeValue::Color(c) => c.truncate().truncate(),
            scalar => Vec2::splat(scalar.as_float()),
        }
    }

    fn as_float3(self) -> Vec3 {
        match self {
            AttributeValue::Float2(v) => v.extend(0.0),
            AttributeValue::Float3(v) => v,
            AttributeValue::Color(c) => c.truncate(),
            scalar => Vec3::splat(scalar.as_float()),
        }
    }

    fn as_color(self) -> Vec4 {
        match self {
            AttributeValue::Float2(v) => Vec4::new(v.x, v.y, 0.0, 1.0),
            AttributeValue::Float3(v) => v.extend(1.0),
            AttributeValue::Color(c) => c,
            scalar => Vec3::splat(scalar.as_float()).extend(1.0),
        }
    }

    fn as_int(self) -> i32 {
        match self {
            AttributeValue::Int32(v) => v,
            AttributeValue::Boolean(v) => i32::from(v),
            other => other.as_float() as i32,
        }
    }

    fn as_bool(self) -> bool {
        match self {
            AttributeValue::Float(v) => v > 0.0,
            AttributeValue::Float2(v) => v != Vec2::ZERO,
            AttributeValue::Float3(v) => v != Vec3::ZERO,
            AttributeValue::Color(c) => luminance(c) > 0.0,
            AttributeValue::Int32(v) => v > 0,
            AttributeValue::Boolean(v) => v,
        }
    }
}

fn luminance(color: Vec4) -> f32 {
    color.truncate().dot(LUMINANCE_WEIGHTS)
}

fn bool_to_float(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}

/// Trait for Rust types that can be stored in an attribute column.
///
/// The set of implementors is closed and mirrors [`AttributeType`]: `f32`,
/// [`Vec2`], [`Vec3`], [`Vec4`] (colors), `i32` and `bool`. The trait lets
/// callers resolve a runtime-tagged column to a typed slice at the call site.
pub trait AttributeElement: Copy + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    /// The runtime tag of this type.
    const TYPE: AttributeType;

    /// Extract a value of this type. Returns `None` on a type mismatch; no
    /// conversion is performed.
    fn from_value(value: AttributeValue) -> Option<Self>;

    /// Wrap the value in its tag.
    fn into_value(self) -> AttributeValue;

    /// View a tagged slice as `&[Self]` if the tags match.
    fn slice(slice: AttributeSlice<'_>) -> Option<&[Self]>;

    /// View a tagged mutable slice as `&mut [Self]` if the tags match.
    fn slice_mut(slice: AttributeSliceMut<'_>) -> Option<&mut [Self]>;

    /// Take the values out of an owned column if the tags match.
    fn from_data(data: AttributeData) -> Result<Vec<Self>, AttributeData>;

    /// Wrap owned values in a column.
    fn into_data(values: Vec<Self>) -> AttributeData;
}

macro_rules! impl_attribute_element {
    ($($Target:ty => $variant:ident),+ $(,)?) => {
        $(
            impl AttributeElement for $Target {
                const TYPE: AttributeType = AttributeType::$variant;

                #[inline]
                fn from_value(value: AttributeValue) -> Option<Self> {
                    match value {
                        AttributeValue::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                #[inline]
                fn into_value(self) -> AttributeValue {
                    AttributeValue::$variant(self)
                }

                #[inline]
                fn slice(slice: AttributeSlice<'_>) -> Option<&[Self]> {
                    match slice {
                        AttributeSlice::$variant(values) => Some(values),
                        _ => None,
                    }
                }

                #[inline]
                fn slice_mut(slice: AttributeSliceMut<'_>) -> Option<&mut [Self]> {
                    match slice {
                        AttributeSliceMut::$variant(values) => Some(values),
                        _ => None,
                    }
                }

                fn from_data(data: AttributeData) -> Result<Vec<Self>, AttributeData> {
                    match data {
                        AttributeData::$variant(values) => Ok(values),
                        other => Err(other),
                    }
                }

                fn into_data(values: Vec<Self>) -> AttributeData {
                    AttributeData::$variant(values)
                }
            }

            impl From<$Target> for AttributeValue {
                fn from(value: $Target) -> Self {
                    AttributeValue::$variant(value)
                }
            }
        )+
    };
}

impl_attribute_element!(
    f32 => Float,
    Vec2 => Float2,
    Vec3 => Float3,
    Vec4 => Color,
    i32 => Int32,
    bool => Boolean,
);
