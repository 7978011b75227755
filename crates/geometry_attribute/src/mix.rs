//! Weighted averaging of attribute values, used when interpolating an
//! attribute from one domain to another.

use glam::{DVec4, Vec2, Vec3, Vec4};

use crate::data::AttributeData;
use crate::domain::AttributeType;
use crate::value::AttributeValue;

/// Accumulates weighted values per output element and produces averages.
///
/// Floating point types average component-wise. `Int32` averages round to
/// the nearest integer. `Boolean` mixes to `true` if any contributing value
/// with a positive weight was `true`. Elements that received no contribution
/// get the type's default value.
#[derive(Debug, Clone)]
pub struct AttributeMixer {
    data_type: AttributeType,
    sums: Vec<DVec4>,
    weights: Vec<f64>,
}

impl AttributeMixer {
    /// Create a mixer producing `len` values of `data_type`.
    #[must_use]
    pub fn new(data_type: AttributeType, len: usize) -> Self {
        Self {
            data_type,
            sums: vec![DVec4::ZERO; len],
            weights: vec![0.0; len],
        }
    }

    #[must_use]
    pub fn data_type(&self) -> AttributeType {
        self.data_type
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sums.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sums.is_empty()
    }

    /// Add `value` with `weight` to the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn mix_in(&mut self, index: usize, value: AttributeValue, weight: f32) {
        let lanes = match value.convert(self.data_type) {
            AttributeValue::Float(v) => DVec4::new(f64::from(v), 0.0, 0.0, 0.0),
            AttributeValue::Float2(v) => v.as_dvec2().extend(0.0).extend(0.0),
            AttributeValue::Float3(v) => v.as_dvec3().extend(0.0),
            AttributeValue::Color(v) => v.as_dvec4(),
            AttributeValue::Int32(v) => DVec4::new(f64::from(v), 0.0, 0.0, 0.0),
            AttributeValue::Boolean(v) => DVec4::new(if v { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0),
        };
        let weight = f64::from(weight);
        self.sums[index] += lanes * weight;
        self.weights[index] += weight;
    }

    /// Finish mixing and return the averaged column.
    #[must_use]
    pub fn finish(self) -> AttributeData {
        let data_type = self.data_type;
        let values = self
            .sums
            .into_iter()
            .zip(self.weights)
            .map(|(sum, weight)| {
                if weight <= 0.0 {
                    return data_type.default_value();
                }
                let average = sum / weight;
                match data_type {
                    AttributeType::Float => AttributeValue::Float(average.x as f32),
                    AttributeType::Float2 => AttributeValue::Float2(Vec2::new(
                        average.x as f32,
                        average.y as f32,
                    )),
                    AttributeType::Float3 => AttributeValue::Float3(Vec3::new(
                        average.x as f32,
                        average.y as f32,
                        average.z as f32,
                    )),
                    AttributeType::Color => AttributeValue::Color(Vec4::new(
                        average.x as f32,
                        average.y as f32,
                        average.z as f32,
                        average.w as f32,
                    )),
                    AttributeType::Int32 => AttributeValue::Int32(average.x.round() as i32),
                    AttributeType::Boolean => AttributeValue::Boolean(sum.x > 0.0),
                }
            });
        AttributeData::collect_converted(data_type, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float3_average() {
        let mut mixer = AttributeMixer::new(AttributeType::Float3, 1);
        mixer.mix_in(0, Vec3::new(0.0, 0.0, 0.0).into(), 1.0);
        mixer.mix_in(0, Vec3::new(2.0, 4.0, 6.0).into(), 1.0);
        assert_eq!(
            mixer.finish(),
            AttributeData::Float3(vec![Vec3::new(1.0, 2.0, 3.0)])
        );
    }

    #[test]
    fn test_weighted_average() {
        let mut mixer = AttributeMixer::new(AttributeType::Float, 1);
        mixer.mix_in(0, AttributeValue::Float(0.0), 3.0);
        mixer.mix_in(0, AttributeValue::Float(4.0), 1.0);
        assert_eq!(mixer.finish(), AttributeData::Float(vec![1.0]));
    }

    #[test]
    fn test_int_rounds_to_nearest() {
        let mut mixer = AttributeMixer::new(AttributeType::Int32, 1);
        mixer.mix_in(0, AttributeValue::Int32(1), 1.0);
        mixer.mix_in(0, AttributeValue::Int32(2), 1.0);
        mixer.mix_in(0, AttributeValue::Int32(2), 1.0);
        assert_eq!(mixer.finish(), AttributeData::Int32(vec![2]));
    }

    #[test]
    fn test_boolean_is_any() {
        let mut mixer = AttributeMixer::new(AttributeType::Boolean, 2);
        mixer.mix_in(0, AttributeValue::Boolean(false), 1.0);
        mixer.mix_in(0, AttributeValue::Boolean(true), 1.0);
        mixer.mix_in(1, AttributeValue::Boolean(false), 1.0);
        assert_eq!(mixer.finish(), AttributeData::Boolean(vec![true, false]));
    }

    #[test]
    fn test_untouched_elements_get_default() {
        let mut mixer = AttributeMixer::new(AttributeType::Float, 2);
        mixer.mix_in(1, AttributeValue::Float(5.0), 1.0);
        assert_eq!(mixer.finish(), AttributeData::Float(vec![0.0, 5.0]));
    }
}
