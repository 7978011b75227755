//! Column storage for attribute values.
//!
//! [`AttributeData`] owns one column of a single [`AttributeType`].
//! [`AttributeSlice`] and [`AttributeSliceMut`] are the borrowed forms, which
//! also let components expose their own structural arrays (e.g. instance
//! positions) through the attribute API without copying.

use glam::{Vec2, Vec3, Vec4};

use crate::domain::AttributeType;
use crate::value::{AttributeElement, AttributeValue};

/// Expands `$body` once per variant of a column-like enum, binding the inner
/// value to `$inner`.
macro_rules! for_each_variant {
    ($Enum:ident, $value:expr, $inner:ident => $body:expr) => {
        match $value {
            $Enum::Float($inner) => $body,
            $Enum::Float2($inner) => $body,
            $Enum::Float3($inner) => $body,
            $Enum::Color($inner) => $body,
            $Enum::Int32($inner) => $body,
            $Enum::Boolean($inner) => $body,
        }
    };
}

/// Like [`for_each_variant`], but rebuilds the same variant of `$Out` from the
/// body's result.
macro_rules! map_variant {
    ($Enum:ident => $Out:ident, $value:expr, $inner:ident => $body:expr) => {
        match $value {
            $Enum::Float($inner) => $Out::Float($body),
            $Enum::Float2($inner) => $Out::Float2($body),
            $Enum::Float3($inner) => $Out::Float3($body),
            $Enum::Color($inner) => $Out::Color($body),
            $Enum::Int32($inner) => $Out::Int32($body),
            $Enum::Boolean($inner) => $Out::Boolean($body),
        }
    };
}

/// An owned attribute column.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeData {
    Float(Vec<f32>),
    Float2(Vec<Vec2>),
    Float3(Vec<Vec3>),
    Color(Vec<Vec4>),
    Int32(Vec<i32>),
    Boolean(Vec<bool>),
}

impl AttributeData {
    /// Create a column of `len` default values.
    #[must_use]
    pub fn new(data_type: AttributeType, len: usize) -> Self {
        Self::filled(data_type.default_value(), len)
    }

    /// Create a column holding `len` copies of `value`.
    #[must_use]
    pub fn filled(value: AttributeValue, len: usize) -> Self {
        match value {
            AttributeValue::Float(v) => AttributeData::Float(vec![v; len]),
            AttributeValue::Float2(v) => AttributeData::Float2(vec![v; len]),
            AttributeValue::Float3(v) => AttributeData::Float3(vec![v; len]),
            AttributeValue::Color(v) => AttributeData::Color(vec![v; len]),
            AttributeValue::Int32(v) => AttributeData::Int32(vec![v; len]),
            AttributeValue::Boolean(v) => AttributeData::Boolean(vec![v; len]),
        }
    }

    /// Wrap a typed vector.
    #[must_use]
    pub fn from_values<T: AttributeElement>(values: Vec<T>) -> Self {
        T::into_data(values)
    }

    /// Build a column of `data_type` from arbitrary values, converting each.
    #[must_use]
    pub fn collect_converted(
        data_type: AttributeType,
        values: impl IntoIterator<Item = AttributeValue>,
    ) -> Self {
        let values = values.into_iter();
        let mut data = Self::new(data_type, 0);
        data.reserve(values.size_hint().0);
        for value in values {
            data.push(value);
        }
        data
    }

    #[must_use]
    pub fn data_type(&self) -> AttributeType {
        self.as_slice().data_type()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        for_each_variant!(AttributeData, self, values => values.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the value at `index`, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<AttributeValue> {
        self.as_slice().get(index)
    }

    /// Store `value` at `index`, converting it to the column's type.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set(&mut self, index: usize, value: AttributeValue) {
        self.as_slice_mut().set(index, value);
    }

    /// Append `value`, converting it to the column's type.
    pub fn push(&mut self, value: AttributeValue) {
        let value = value.convert(self.data_type());
        match (self, value) {
            (AttributeData::Float(values), AttributeValue::Float(v)) => values.push(v),
            (AttributeData::Float2(values), AttributeValue::Float2(v)) => values.push(v),
            (AttributeData::Float3(values), AttributeValue::Float3(v)) => values.push(v),
            (AttributeData::Color(values), AttributeValue::Color(v)) => values.push(v),
            (AttributeData::Int32(values), AttributeValue::Int32(v)) => values.push(v),
            (AttributeData::Boolean(values), AttributeValue::Boolean(v)) => values.push(v),
            _ => unreachable!("value was converted to the column type"),
        }
    }

    pub fn reserve(&mut self, additional: usize) {
        for_each_variant!(AttributeData, self, values => values.reserve(additional));
    }

    /// Grow or shrink the column to `len`, filling new elements with the
    /// type's default value.
    pub fn resize(&mut self, len: usize) {
        match self {
            AttributeData::Float(values) => values.resize(len, 0.0),
            AttributeData::Float2(values) => values.resize(len, Vec2::ZERO),
            AttributeData::Float3(values) => values.resize(len, Vec3::ZERO),
            AttributeData::Color(values) => values.resize(len, Vec4::ZERO),
            AttributeData::Int32(values) => values.resize(len, 0),
            AttributeData::Boolean(values) => values.resize(len, false),
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> AttributeSlice<'_> {
        map_variant!(AttributeData => AttributeSlice, self, values => values.as_slice())
    }

    #[must_use]
    pub fn as_slice_mut(&mut self) -> AttributeSliceMut<'_> {
        map_variant!(AttributeData => AttributeSliceMut, self, values => values.as_mut_slice())
    }

    /// Borrow the column as `&[T]` if `T` matches the column type.
    #[must_use]
    pub fn typed<T: AttributeElement>(&self) -> Option<&[T]> {
        T::slice(self.as_slice())
    }

    /// Borrow the column as `&mut [T]` if `T` matches the column type.
    #[must_use]
    pub fn typed_mut<T: AttributeElement>(&mut self) -> Option<&mut [T]> {
        T::slice_mut(self.as_slice_mut())
    }

    /// Copy the column, converting every value to `to`.
    #[must_use]
    pub fn convert(&self, to: AttributeType) -> AttributeData {
        self.as_slice().convert(to)
    }

    /// Iterate over the values as tagged [`AttributeValue`]s.
    pub fn iter(&self) -> impl Iterator<Item = AttributeValue> + '_ {
        let slice = self.as_slice();
        (0..slice.len()).filter_map(move |i| slice.get(i))
    }
}

/// A borrowed, read-only attribute column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeSlice<'a> {
    Float(&'a [f32]),
    Float2(&'a [Vec2]),
    Float3(&'a [Vec3]),
    Color(&'a [Vec4]),
    Int32(&'a [i32]),
    Boolean(&'a [bool]),
}

impl<'a> AttributeSlice<'a> {
    #[must_use]
    pub fn data_type(&self) -> AttributeType {
        match self {
            AttributeSlice::Float(_) => AttributeType::Float,
            AttributeSlice::Float2(_) => AttributeType::Float2,
            AttributeSlice::Float3(_) => AttributeType::Float3,
            AttributeSlice::Color(_) => AttributeType::Color,
            AttributeSlice::Int32(_) => AttributeType::Int32,
            AttributeSlice::Boolean(_) => AttributeType::Boolean,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        for_each_variant!(AttributeSlice, self, values => values.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<AttributeValue> {
        for_each_variant!(AttributeSlice, self, values => values.get(index).map(|v| (*v).into()))
    }

    /// Borrow as `&[T]` if `T` matches.
    #[must_use]
    pub fn typed<T: AttributeElement>(self) -> Option<&'a [T]> {
        T::slice(self)
    }

    /// Copy into an owned column.
    #[must_use]
    pub fn to_data(&self) -> AttributeData {
        map_variant!(AttributeSlice => AttributeData, self, values => values.to_vec())
    }

    /// Copy into an owned column, converting every value to `to`.
    #[must_use]
    pub fn convert(&self, to: AttributeType) -> AttributeData {
        if self.data_type() == to {
            return self.to_data();
        }
        AttributeData::collect_converted(to, (0..self.len()).filter_map(|i| self.get(i)))
    }
}

/// A borrowed, mutable attribute column. The length is fixed.
#[derive(Debug, PartialEq)]
pub enum AttributeSliceMut<'a> {
    Float(&'a mut [f32]),
    Float2(&'a mut [Vec2]),
    Float3(&'a mut [Vec3]),
    Color(&'a mut [Vec4]),
    Int32(&'a mut [i32]),
    Boolean(&'a mut [bool]),
}

impl<'a> AttributeSliceMut<'a> {
    #[must_use]
    pub fn data_type(&self) -> AttributeType {
        self.as_slice().data_type()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        for_each_variant!(AttributeSliceMut, self, values => values.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> AttributeSlice<'_> {
        map_variant!(AttributeSliceMut => AttributeSlice, self, values => &**values)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<AttributeValue> {
        self.as_slice().get(index)
    }

    /// Store `value` at `index`, converting it to the slice's type.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set(&mut self, index: usize, value: AttributeValue) {
        let value = value.convert(self.data_type());
        match (self, value) {
            (AttributeSliceMut::Float(values), AttributeValue::Float(v)) => values[index] = v,
            (AttributeSliceMut::Float2(values), AttributeValue::Float2(v)) => values[index] = v,
            (AttributeSliceMut::Float3(values), AttributeValue::Float3(v)) => values[index] = v,
            (AttributeSliceMut::Color(values), AttributeValue::Color(v)) => values[index] = v,
            (AttributeSliceMut::Int32(values), AttributeValue::Int32(v)) => values[index] = v,
            (AttributeSliceMut::Boolean(values), AttributeValue::Boolean(v)) => values[index] = v,
            _ => unreachable!("value was converted to the slice type"),
        }
    }

    /// Overwrite every element with `value`, converted to the slice's type.
    pub fn fill(&mut self, value: AttributeValue) {
        for index in 0..self.len() {
            self.set(index, value);
        }
    }

    /// Reborrow for a shorter lifetime.
    #[must_use]
    pub fn reborrow(&mut self) -> AttributeSliceMut<'_> {
        map_variant!(AttributeSliceMut => AttributeSliceMut, self, values => &mut **values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills_defaults() {
        let data = AttributeData::new(AttributeType::Float3, 3);
        assert_eq!(data.len(), 3);
        assert_eq!(data.data_type(), AttributeType::Float3);
        assert_eq!(data.get(2), Some(AttributeValue::Float3(Vec3::ZERO)));
        assert_eq!(data.get(3), None);
    }

    #[test]
    fn test_set_converts_value() {
        let mut data = AttributeData::new(AttributeType::Int32, 2);
        data.set(1, AttributeValue::Float(7.8));
        assert_eq!(data.typed::<i32>(), Some(&[0, 7][..]));
    }

    #[test]
    fn test_typed_access_checks_type() {
        let mut data = AttributeData::from_values(vec![1.0_f32, 2.0]);
        assert!(data.typed::<i32>().is_none());
        data.typed_mut::<f32>().unwrap()[0] = 5.0;
        assert_eq!(data.typed::<f32>(), Some(&[5.0, 2.0][..]));
    }

    #[test]
    fn test_convert_column() {
        let data = AttributeData::from_values(vec![true, false, true]);
        let converted = data.convert(AttributeType::Float);
        assert_eq!(converted, AttributeData::Float(vec![1.0, 0.0, 1.0]));
    }

    #[test]
    fn test_resize_pads_with_defaults() {
        let mut data = AttributeData::from_values(vec![3_i32]);
        data.resize(3);
        assert_eq!(data, AttributeData::Int32(vec![3, 0, 0]));
        data.resize(1);
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_slice_mut_fill() {
        let mut positions = vec![Vec3::ZERO; 4];
        let mut slice = AttributeSliceMut::Float3(&mut positions);
        slice.fill(AttributeValue::Float(1.0));
        assert!(positions.iter().all(|p| *p == Vec3::ONE));
    }

    #[test]
    fn test_push_and_iter() {
        let mut data = AttributeData::new(AttributeType::Float, 0);
        data.push(AttributeValue::Int32(2));
        data.push(AttributeValue::Boolean(true));
        let values: Vec<_> = data.iter().collect();
        assert_eq!(
            values,
            vec![AttributeValue::Float(2.0), AttributeValue::Float(1.0)]
        );
    }
}
