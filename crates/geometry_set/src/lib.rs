//! # geometry_set
//!
//! A reference-counted, copy-on-write container for scene geometry. A
//! [`GeometrySet`] holds at most one component per kind; sets share their
//! components until one of them asks for write access.
//!
//! This crate provides:
//!
//! - [`GeometrySet`] and the shared [`ComponentHandle`].
//! - [`GeometryComponent`], a closed enum over [`MeshComponent`],
//!   [`PointCloudComponent`] and [`InstancesComponent`], with the attribute
//!   API built on [`AttributeProvider`].
//! - [`Mesh`], built through [`MeshBuilder`], and [`PointCloud`].
//! - [`GeometryOwnership`] tags for payloads supplied by other owners.
//! - [`primitives`] for procedural test geometry.

pub mod component;
pub mod handle;
pub mod instances;
mod interpolate;
pub mod mesh;
pub mod mesh_component;
pub mod object;
pub mod ownership;
pub mod pointcloud;
pub mod primitives;
pub mod set;

pub use component::{AttributeProvider, GeometryComponent, GeometryComponentKind, TypedComponent};
pub use handle::ComponentHandle;
pub use instances::{DEFAULT_INSTANCE_ID, InstancesComponent};
pub use mesh::{DeformVert, DeformWeight, Face, Mesh, MeshBuildError, MeshBuilder};
pub use mesh_component::MeshComponent;
pub use object::{Collection, InstancedData, Object};
pub use ownership::{GeometryOwnership, Payload};
pub use pointcloud::{PointCloud, PointCloudComponent};
pub use set::GeometrySet;
