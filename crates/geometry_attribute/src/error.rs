//! Attribute error types.

use crate::domain::{AttributeDomain, AttributeType};

/// Reasons an attribute mutation can fail.
///
/// All of these are permanent for the given inputs; retrying without
/// changing the request will fail the same way.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeError {
    /// The component has no elements of this domain at all.
    #[error("attribute domain {0} is not supported by this component")]
    UnsupportedDomain(AttributeDomain),

    /// The domain exists but cannot store custom attributes of this type.
    #[error("attribute type {data_type} is not supported on domain {domain}")]
    UnsupportedType {
        domain: AttributeDomain,
        data_type: AttributeType,
    },

    /// Builtin attributes cannot be created or removed.
    #[error("'{0}' is a builtin attribute")]
    Builtin(String),

    /// An attribute with this name is already present.
    #[error("attribute '{0}' already exists")]
    AlreadyExists(String),

    /// No attribute with this name is present.
    #[error("attribute '{0}' not found")]
    NotFound(String),

    /// The component does not hold any geometry to attach the attribute to.
    #[error("component has no geometry")]
    MissingGeometry,
}
