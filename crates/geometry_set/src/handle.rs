//! Shared, reference-counted component handles.

use std::ops::Deref;
use std::sync::Arc;

use tracing::debug;

use crate::component::{GeometryComponent, GeometryComponentKind};

/// A shared reference to a [`GeometryComponent`].
///
/// Cloning a handle adds a user, dropping it removes one. A component with
/// exactly one user is mutable; with more it is read-only until
/// [`ComponentHandle::make_mut`] copies it.
#[derive(Debug, Clone)]
pub struct ComponentHandle(Arc<GeometryComponent>);

impl ComponentHandle {
    #[must_use]
    pub fn new(component: GeometryComponent) -> Self {
        Self(Arc::new(component))
    }

    /// A handle to a new, empty component of `kind`.
    #[must_use]
    pub fn create(kind: GeometryComponentKind) -> Self {
        Self::new(GeometryComponent::create(kind))
    }

    #[must_use]
    pub fn kind(&self) -> GeometryComponentKind {
        self.0.kind()
    }

    /// Number of handles sharing the component.
    #[must_use]
    pub fn users(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    #[must_use]
    pub fn is_mutable(&self) -> bool {
        self.users() == 1
    }

    /// Returns `true` if both handles share the same component.
    #[must_use]
    pub fn ptr_eq(&self, other: &ComponentHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared component, used for identity hashing.
    #[must_use]
    pub fn as_ptr(&self) -> *const GeometryComponent {
        Arc::as_ptr(&self.0)
    }

    #[must_use]
    pub fn get(&self) -> &GeometryComponent {
        &self.0
    }

    /// Mutable access if this is the only handle.
    #[must_use]
    pub fn get_mut(&mut self) -> Option<&mut GeometryComponent> {
        Arc::get_mut(&mut self.0)
    }

    /// Mutable access, copying the component first if it is shared.
    pub fn make_mut(&mut self) -> &mut GeometryComponent {
        if !self.is_mutable() {
            debug!(
                kind = %self.kind(),
                users = self.users(),
                "copying shared component before write"
            );
        }
        Arc::make_mut(&mut self.0)
    }
}

impl Deref for ComponentHandle {
    type Target = GeometryComponent;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<GeometryComponent> for ComponentHandle {
    fn from(component: GeometryComponent) -> Self {
        Self::new(component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_users_follow_clones() {
        let handle = ComponentHandle::create(GeometryComponentKind::Mesh);
        assert_eq!(handle.users(), 1);
        assert!(handle.is_mutable());
        let other = handle.clone();
        assert_eq!(handle.users(), 2);
        assert!(!handle.is_mutable());
        assert!(handle.ptr_eq(&other));
        drop(other);
        assert!(handle.is_mutable());
    }

    #[test]
    fn test_make_mut_copies_when_shared() {
        let mut handle = ComponentHandle::create(GeometryComponentKind::PointCloud);
        let other = handle.clone();
        assert!(handle.get_mut().is_none());
        handle.make_mut();
        assert!(!handle.ptr_eq(&other));
        assert!(handle.is_mutable());
        assert!(other.is_mutable());
    }

    #[test]
    fn test_make_mut_keeps_exclusive_component() {
        let mut handle = ComponentHandle::create(GeometryComponentKind::Instances);
        let before = handle.as_ptr();
        handle.make_mut();
        assert_eq!(before, handle.as_ptr());
        assert_eq!(handle.kind(), GeometryComponentKind::Instances);
    }
}
