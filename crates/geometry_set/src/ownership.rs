//! Ownership tags for component payloads.
//!
//! A mesh or point cloud component holds its payload behind an [`Arc`]
//! together with a [`GeometryOwnership`] tag saying whether the component may
//! change the payload directly.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Who owns the payload of a component and whether it may be changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GeometryOwnership {
    /// The component owns the payload.
    #[default]
    Owned,
    /// Supplied by someone else. May be changed in place.
    Editable,
    /// Supplied by someone else. Never changed; the first write access
    /// switches to a private copy.
    ReadOnly,
}

/// A shared payload plus its ownership tag.
///
/// Cloning a payload produces a deep, [`GeometryOwnership::Owned`] copy, so
/// a cloned component never shares data with an external supplier.
#[derive(Debug)]
pub struct Payload<T> {
    data: Arc<T>,
    ownership: GeometryOwnership,
}

impl<T: Clone> Payload<T> {
    #[must_use]
    pub fn new(data: impl Into<Arc<T>>, ownership: GeometryOwnership) -> Self {
        Self {
            data: data.into(),
            ownership,
        }
    }

    /// Wrap a payload the component owns outright.
    #[must_use]
    pub fn owned(data: T) -> Self {
        Self::new(Arc::new(data), GeometryOwnership::Owned)
    }

    #[must_use]
    pub fn ownership(&self) -> GeometryOwnership {
        self.ownership
    }

    #[must_use]
    pub fn get(&self) -> &T {
        &self.data
    }

    /// Mutable access to the payload.
    ///
    /// A read-only payload is copied first and becomes owned. An owned or
    /// editable payload is changed in place unless another holder still
    /// references it, in which case it is copied.
    pub fn get_mut(&mut self) -> &mut T {
        if self.ownership == GeometryOwnership::ReadOnly {
            debug!(
                payload = std::any::type_name::<T>(),
                "copying read-only payload before write"
            );
            self.data = Arc::new(T::clone(&self.data));
            self.ownership = GeometryOwnership::Owned;
        } else if Arc::strong_count(&self.data) > 1 {
            debug!(
                payload = std::any::type_name::<T>(),
                users = Arc::strong_count(&self.data),
                "copying shared payload before write"
            );
        }
        Arc::make_mut(&mut self.data)
    }

    /// The shared payload.
    #[must_use]
    pub fn shared(&self) -> &Arc<T> {
        &self.data
    }

    /// Give up the payload.
    #[must_use]
    pub fn into_shared(self) -> Arc<T> {
        self.data
    }
}

impl<T: Clone> Clone for Payload<T> {
    fn clone(&self) -> Self {
        Self::owned(T::clone(&self.data))
    }
}
