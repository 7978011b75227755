//! Name-keyed storage for custom attributes.
//!
//! Meshes and point clouds keep their user-created attributes in an
//! [`AttributeStorage`]. Each entry is a full column whose length is kept in
//! sync with the element count of its domain by the owning geometry.

use std::collections::HashMap;

use crate::data::AttributeData;
use crate::domain::{AttributeDomain, AttributeInfo, AttributeType};
use crate::error::AttributeError;

/// A custom attribute column together with the domain it lives on.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAttribute {
    /// The domain this column has one value per element of.
    pub domain: AttributeDomain,
    /// The values. Length is always the size of `domain` on the owner.
    pub data: AttributeData,
}

impl StoredAttribute {
    #[must_use]
    pub fn info(&self) -> AttributeInfo {
        AttributeInfo::new(self.domain, self.data.data_type())
    }
}

/// Custom attributes of one geometry, keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeStorage {
    attributes: HashMap<String, StoredAttribute>,
}

impl AttributeStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            attributes: HashMap::new(),
        }
    }

    /// Add a default-initialised column of `len` elements.
    ///
    /// # Errors
    ///
    /// Returns [`AttributeError::AlreadyExists`] if the name is taken.
    pub fn create(
        &mut self,
        name: &str,
        domain: AttributeDomain,
        data_type: AttributeType,
        len: usize,
    ) -> Result<(), AttributeError> {
        if self.attributes.contains_key(name) {
            return Err(AttributeError::AlreadyExists(name.to_string()));
        }
        self.attributes.insert(
            name.to_string(),
            StoredAttribute {
                domain,
                data: AttributeData::new(data_type, len),
            },
        );
        Ok(())
    }

    /// Insert a column, replacing any existing column with the same name.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        domain: AttributeDomain,
        data: AttributeData,
    ) -> Option<StoredAttribute> {
        self.attributes
            .insert(name.into(), StoredAttribute { domain, data })
    }

    /// Remove a column, returning it if it existed.
    pub fn remove(&mut self, name: &str) -> Option<StoredAttribute> {
        self.attributes.remove(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&StoredAttribute> {
        self.attributes.get(name)
    }

    #[must_use]
    pub fn get_mut(&mut self, name: &str) -> Option<&mut StoredAttribute> {
        self.attributes.get_mut(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Names of all stored columns, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Iterate over the columns that live on `domain`.
    pub fn iter_domain(
        &self,
        domain: AttributeDomain,
    ) -> impl Iterator<Item = (&str, &StoredAttribute)> {
        self.attributes
            .iter()
            .filter(move |(_, attribute)| attribute.domain == domain)
            .map(|(name, attribute)| (name.as_str(), attribute))
    }

    /// Resize every column on `domain` to `len` elements.
    pub fn resize_domain(&mut self, domain: AttributeDomain, len: usize) {
        for attribute in self.attributes.values_mut() {
            if attribute.domain == domain {
                attribute.data.resize(len);
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
