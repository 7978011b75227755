//! Read and write views handed out by geometry components.
//!
//! A [`ReadAttribute`] either borrows a column from the component, owns a
//! column computed on demand (converted, interpolated or derived data), or
//! repeats a single constant value. Callers see the same interface in all
//! three cases.
//!
//! A [`WriteAttribute`] borrows a column mutably. Columns that are not
//! stored densely (e.g. mesh vertex groups) are exposed through the
//! [`VirtualColumnMut`] trait.

use crate::data::{AttributeData, AttributeSlice, AttributeSliceMut};
use crate::domain::{AttributeDomain, AttributeInfo, AttributeType};
use crate::value::{AttributeElement, AttributeValue};

#[derive(Debug, Clone)]
enum ReadSource<'a> {
    Borrowed(AttributeSlice<'a>),
    Owned(AttributeData),
    Constant { value: AttributeValue, len: usize },
}

/// A read-only view of an attribute on one domain.
#[derive(Debug, Clone)]
pub struct ReadAttribute<'a> {
    domain: AttributeDomain,
    source: ReadSource<'a>,
}

impl<'a> ReadAttribute<'a> {
    /// A view borrowing a column.
    #[must_use]
    pub fn from_slice(domain: AttributeDomain, slice: AttributeSlice<'a>) -> Self {
        Self {
            domain,
            source: ReadSource::Borrowed(slice),
        }
    }

    /// A view owning a computed column.
    #[must_use]
    pub fn from_data(domain: AttributeDomain, data: AttributeData) -> Self {
        Self {
            domain,
            source: ReadSource::Owned(data),
        }
    }

    /// A view that yields `value` for each of `len` elements.
    #[must_use]
    pub fn constant(domain: AttributeDomain, value: AttributeValue, len: usize) -> Self {
        Self {
            domain,
            source: ReadSource::Constant { value, len },
        }
    }

    #[must_use]
    pub fn domain(&self) -> AttributeDomain {
        self.domain
    }

    #[must_use]
    pub fn data_type(&self) -> AttributeType {
        match &self.source {
            ReadSource::Borrowed(slice) => slice.data_type(),
            ReadSource::Owned(data) => data.data_type(),
            ReadSource::Constant { value, .. } => value.data_type(),
        }
    }

    #[must_use]
    pub fn info(&self) -> AttributeInfo {
        AttributeInfo::new(self.domain, self.data_type())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match &self.source {
            ReadSource::Borrowed(slice) => slice.len(),
            ReadSource::Owned(data) => data.len(),
            ReadSource::Constant { len, .. } => *len,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if every element is the same value by construction.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        matches!(self.source, ReadSource::Constant { .. })
    }

    /// The value of the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> AttributeValue {
        let len = self.len();
        let value = match &self.source {
            ReadSource::Borrowed(slice) => slice.get(index),
            ReadSource::Owned(data) => data.get(index),
            ReadSource::Constant { value, len } => (index < *len).then_some(*value),
        };
        match value {
            Some(value) => value,
            None => panic!("attribute index {index} out of bounds for length {len}"),
        }
    }

    /// Iterate over every element.
    pub fn iter(&self) -> impl Iterator<Item = AttributeValue> + '_ {
        (0..self.len()).map(|i| self.get(i))
    }

    /// Borrow the underlying column. Returns `None` for constant views.
    #[must_use]
    pub fn as_slice(&self) -> Option<AttributeSlice<'_>> {
        match &self.source {
            ReadSource::Borrowed(slice) => Some(*slice),
            ReadSource::Owned(data) => Some(data.as_slice()),
            ReadSource::Constant { .. } => None,
        }
    }

    /// Copy the values into an owned column.
    #[must_use]
    pub fn to_data(&self) -> AttributeData {
        match &self.source {
            ReadSource::Borrowed(slice) => slice.to_data(),
            ReadSource::Owned(data) => data.clone(),
            ReadSource::Constant { value, len } => AttributeData::filled(*value, *len),
        }
    }

    /// Take the values as an owned column, copying only if borrowed.
    #[must_use]
    pub fn into_data(self) -> AttributeData {
        match self.source {
            ReadSource::Owned(data) => data,
            ReadSource::Borrowed(slice) => slice.to_data(),
            ReadSource::Constant { value, len } => AttributeData::filled(value, len),
        }
    }

    /// Convert to another value type. Constant views stay constant.
    #[must_use]
    pub fn convert(self, to: AttributeType) -> ReadAttribute<'a> {
        if self.data_type() == to {
            return self;
        }
        let source = match self.source {
            ReadSource::Borrowed(slice) => ReadSource::Owned(slice.convert(to)),
            ReadSource::Owned(data) => ReadSource::Owned(data.convert(to)),
            ReadSource::Constant { value, len } => ReadSource::Constant {
                value: value.convert(to),
                len,
            },
        };
        Self {
            domain: self.domain,
            source,
        }
    }

    /// The same values reinterpreted as living on `len` elements of another
    /// domain. Only meaningful for constant views, which is the only case
    /// components use it for.
    #[must_use]
    pub fn with_constant_domain(self, domain: AttributeDomain, len: usize) -> Option<Self> {
        match self.source {
            ReadSource::Constant { value, .. } => Some(Self::constant(domain, value, len)),
            _ => None,
        }
    }

    /// Resolve to a typed view. Returns `None` if `T` does not match the
    /// attribute's type.
    #[must_use]
    pub fn typed<T: AttributeElement>(self) -> Option<TypedReadAttribute<'a, T>> {
        let domain = self.domain;
        let source = match self.source {
            ReadSource::Borrowed(slice) => TypedSource::Borrowed(T::slice(slice)?),
            ReadSource::Owned(data) => TypedSource::Owned(T::from_data(data).ok()?),
            ReadSource::Constant { value, len } => {
                TypedSource::Constant(T::from_value(value)?, len)
            }
        };
        Some(TypedReadAttribute {
            domain,
            source,
        })
    }
}

#[derive(Debug, Clone)]
enum TypedSource<'a, T> {
    Borrowed(&'a [T]),
    Owned(Vec<T>),
    Constant(T, usize),
}

/// A read-only view resolved to a concrete element type.
#[derive(Debug, Clone)]
pub struct TypedReadAttribute<'a, T> {
    domain: AttributeDomain,
    source: TypedSource<'a, T>,
}

impl<'a, T: AttributeElement> TypedReadAttribute<'a, T> {
    /// A view that yields `value` for each of `len` elements.
    #[must_use]
    pub fn constant(domain: AttributeDomain, value: T, len: usize) -> Self {
        Self {
            domain,
            source: TypedSource::Constant(value, len),
        }
    }

    #[must_use]
    pub fn domain(&self) -> AttributeDomain {
        self.domain
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match &self.source {
            TypedSource::Borrowed(values) => values.len(),
            TypedSource::Owned(values) => values.len(),
            TypedSource::Constant(_, len) => *len,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The value of the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> T {
        match &self.source {
            TypedSource::Borrowed(values) => values[index],
            TypedSource::Owned(values) => values[index],
            TypedSource::Constant(value, len) => {
                assert!(
                    index < *len,
                    "attribute index {index} out of bounds for length {len}"
                );
                *value
            }
        }
    }

    /// Borrow the values. Returns `None` for constant views.
    #[must_use]
    pub fn as_slice(&self) -> Option<&[T]> {
        match &self.source {
            TypedSource::Borrowed(values) => Some(values),
            TypedSource::Owned(values) => Some(values),
            TypedSource::Constant(..) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len()).map(|i| self.get(i))
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

/// A mutable column that is not stored as a contiguous slice.
pub trait VirtualColumnMut: Send {
    fn len(&self) -> usize;
    fn data_type(&self) -> AttributeType;
    fn get(&self, index: usize) -> AttributeValue;
    /// Store `value` at `index`. The value has already been converted to
    /// [`VirtualColumnMut::data_type`].
    fn set(&mut self, index: usize, value: AttributeValue);
}

enum WriteTarget<'a> {
    Slice(AttributeSliceMut<'a>),
    Virtual(Box<dyn VirtualColumnMut + 'a>),
}

/// A mutable view of an attribute on one domain.
///
/// The element count is fixed; values are converted to the attribute's type
/// when written.
pub struct WriteAttribute<'a> {
    domain: AttributeDomain,
    target: WriteTarget<'a>,
}

impl std::fmt::Debug for WriteAttribute<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteAttribute")
            .field("domain", &self.domain)
            .field("data_type", &self.data_type())
            .field("len", &self.len())
            .finish()
    }
}

impl<'a> WriteAttribute<'a> {
    #[must_use]
    pub fn from_slice(domain: AttributeDomain, slice: AttributeSliceMut<'a>) -> Self {
        Self {
            domain,
            target: WriteTarget::Slice(slice),
        }
    }

    #[must_use]
    pub fn from_virtual(domain: AttributeDomain, column: impl VirtualColumnMut + 'a) -> Self {
        Self {
            domain,
            target: WriteTarget::Virtual(Box::new(column)),
        }
    }

    #[must_use]
    pub fn domain(&self) -> AttributeDomain {
        self.domain
    }

    #[must_use]
    pub fn data_type(&self) -> AttributeType {
        match &self.target {
            WriteTarget::Slice(slice) => slice.data_type(),
            WriteTarget::Virtual(column) => column.data_type(),
        }
    }

    #[must_use]
    pub fn info(&self) -> AttributeInfo {
        AttributeInfo::new(self.domain, self.data_type())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match &self.target {
            WriteTarget::Slice(slice) => slice.len(),
            WriteTarget::Virtual(column) => column.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The value of the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> AttributeValue {
        match &self.target {
            WriteTarget::Slice(slice) => match slice.get(index) {
                Some(value) => value,
                None => panic!(
                    "attribute index {index} out of bounds for length {}",
                    slice.len()
                ),
            },
            WriteTarget::Virtual(column) => column.get(index),
        }
    }

    /// Store `value` at `index`, converting it to the attribute's type.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set(&mut self, index: usize, value: AttributeValue) {
        match &mut self.target {
            WriteTarget::Slice(slice) => slice.set(index, value),
            WriteTarget::Virtual(column) => {
                let value = value.convert(column.data_type());
                column.set(index, value);
            }
        }
    }

    /// Overwrite every element with `value`.
    pub fn fill(&mut self, value: AttributeValue) {
        for index in 0..self.len() {
            self.set(index, value);
        }
    }

    /// Borrow the values as `&mut [T]`. Returns `None` if `T` does not match
    /// or the column is not stored contiguously.
    #[must_use]
    pub fn as_slice_mut<T: AttributeElement>(&mut self) -> Option<&mut [T]> {
        match &mut self.target {
            WriteTarget::Slice(slice) => T::slice_mut(slice.reborrow()),
            WriteTarget::Virtual(_) => None,
        }
    }
}
