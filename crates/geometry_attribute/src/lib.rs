//! # geometry_attribute
//!
//! Attribute primitives shared by all geometry components: which elements an
//! attribute lives on, what type its values have, and how values are stored,
//! converted, mixed and accessed.
//!
//! This crate provides:
//!
//! - [`AttributeDomain`] and [`AttributeType`] tags, plus [`AttributeInfo`].
//! - [`AttributeValue`] with the total implicit conversion table.
//! - [`AttributeElement`], linking Rust value types to their tags.
//! - [`AttributeData`] columns and their borrowed [`AttributeSlice`] forms.
//! - [`AttributeStorage`] for named custom attributes.
//! - [`AttributeMixer`] for weighted domain interpolation.
//! - [`ReadAttribute`] / [`WriteAttribute`] views handed out by components.
//! - [`AttributeError`].

pub mod access;
pub mod data;
pub mod domain;
pub mod error;
pub mod mix;
pub mod storage;
pub mod value;

pub use access::{ReadAttribute, TypedReadAttribute, VirtualColumnMut, WriteAttribute};
pub use data::{AttributeData, AttributeSlice, AttributeSliceMut};
pub use domain::{AttributeDomain, AttributeInfo, AttributeType};
pub use error::AttributeError;
pub use mix::AttributeMixer;
pub use storage::{AttributeStorage, StoredAttribute};
pub use value::{AttributeElement, AttributeValue};
