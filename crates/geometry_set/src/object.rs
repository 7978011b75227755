//! Scene references that instances can point at.

use std::sync::Arc;

/// A named scene object. Meshes created from an object copy its vertex
/// group names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    name: String,
    vertex_groups: Vec<String>,
}

impl Object {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertex_groups: Vec::new(),
        }
    }

    /// Set the object's vertex groups. The position in the list is the
    /// group index.
    #[must_use]
    pub fn with_vertex_groups<S: Into<String>>(
        mut self,
        groups: impl IntoIterator<Item = S>,
    ) -> Self {
        self.vertex_groups = groups.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn vertex_groups(&self) -> &[String] {
        &self.vertex_groups
    }
}

/// A named group of objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    name: String,
    objects: Vec<Arc<Object>>,
}

impl Collection {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_object(mut self, object: Arc<Object>) -> Self {
        self.objects.push(object);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn objects(&self) -> &[Arc<Object>] {
        &self.objects
    }
}

/// What a single instance refers to.
///
/// Equality is by reference: two entries are equal if they point at the same
/// object or collection.
#[derive(Debug, Clone, Default)]
pub enum InstancedData {
    #[default]
    None,
    Object(Arc<Object>),
    Collection(Arc<Collection>),
}

impl InstancedData {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, InstancedData::None)
    }

    /// Name of the referenced object or collection.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            InstancedData::None => None,
            InstancedData::Object(object) => Some(object.name()),
            InstancedData::Collection(collection) => Some(collection.name()),
        }
    }
}

impl PartialEq for InstancedData {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (InstancedData::None, InstancedData::None) => true,
            (InstancedData::Object(a), InstancedData::Object(b)) => Arc::ptr_eq(a, b),
            (InstancedData::Collection(a), InstancedData::Collection(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Arc<Object>> for InstancedData {
    fn from(object: Arc<Object>) -> Self {
        InstancedData::Object(object)
    }
}

impl From<Arc<Collection>> for InstancedData {
    fn from(collection: Arc<Collection>) -> Self {
        InstancedData::Collection(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_by_reference() {
        let a = Arc::new(Object::new("tree"));
        let b = Arc::new(Object::new("tree"));
        assert_eq!(InstancedData::from(a.clone()), InstancedData::from(a));
        let twin = Arc::new(Object::new("tree"));
        assert_ne!(InstancedData::from(b.clone()), InstancedData::Object(twin));
        assert_ne!(InstancedData::from(b), InstancedData::None);
    }

    #[test]
    fn test_names() {
        let object = Arc::new(Object::new("rock").with_vertex_groups(["top", "bottom"]));
        let collection = Arc::new(Collection::new("props").with_object(object.clone()));
        assert_eq!(object.vertex_groups(), ["top".to_string(), "bottom".to_string()]);
        assert_eq!(InstancedData::from(collection).name(), Some("props"));
        assert!(InstancedData::default().is_none());
    }
}
