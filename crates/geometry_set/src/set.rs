//! The geometry set container.

use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use geometry_math::Bounds;
use tracing::trace;

use crate::component::{GeometryComponent, GeometryComponentKind, TypedComponent};
use crate::handle::ComponentHandle;
use crate::instances::InstancesComponent;
use crate::mesh::Mesh;
use crate::mesh_component::MeshComponent;
use crate::ownership::GeometryOwnership;
use crate::pointcloud::{PointCloud, PointCloudComponent};

/// At most one component per kind, shared between sets until written.
///
/// Cloning a set is cheap: it clones the component handles, not the
/// components. Equality and hashing are by identity: two sets are equal when
/// they hold the same component bodies, regardless of content.
#[derive(Debug, Clone, Default)]
pub struct GeometrySet {
    components: BTreeMap<GeometryComponentKind, ComponentHandle>,
}

impl GeometrySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding only `mesh`.
    #[must_use]
    pub fn create_with_mesh(mesh: impl Into<Arc<Mesh>>, ownership: GeometryOwnership) -> Self {
        let mut set = Self::new();
        set.add(GeometryComponent::Mesh(MeshComponent::with_mesh(mesh, ownership)));
        set
    }

    /// A set holding only `pointcloud`.
    #[must_use]
    pub fn create_with_pointcloud(
        pointcloud: impl Into<Arc<PointCloud>>,
        ownership: GeometryOwnership,
    ) -> Self {
        let mut set = Self::new();
        set.add(GeometryComponent::PointCloud(
            PointCloudComponent::with_pointcloud(pointcloud, ownership),
        ));
        set
    }

    /// Mutable access to the component of `kind`.
    ///
    /// An empty component is created if there is none. A component shared
    /// with other sets is copied first, so the returned reference is never
    /// visible through another set.
    pub fn get_component_for_write(
        &mut self,
        kind: GeometryComponentKind,
    ) -> &mut GeometryComponent {
        self.components
            .entry(kind)
            .or_insert_with(|| ComponentHandle::create(kind))
            .make_mut()
    }

    #[must_use]
    pub fn get_component_for_read(
        &self,
        kind: GeometryComponentKind,
    ) -> Option<&GeometryComponent> {
        self.components.get(&kind).map(ComponentHandle::get)
    }

    /// The shared handle of the component of `kind`, for adding it to
    /// another set.
    #[must_use]
    pub fn component_handle(&self, kind: GeometryComponentKind) -> Option<&ComponentHandle> {
        self.components.get(&kind)
    }

    /// Typed form of [`Self::get_component_for_read`].
    #[must_use]
    pub fn component_for_read<C: TypedComponent>(&self) -> Option<&C> {
        self.get_component_for_read(C::KIND)
            .and_then(C::from_component)
    }

    /// Typed form of [`Self::get_component_for_write`].
    pub fn component_for_write<C: TypedComponent>(&mut self) -> &mut C {
        match C::from_component_mut(self.get_component_for_write(C::KIND)) {
            Some(component) => component,
            None => unreachable!("component stored under the wrong kind"),
        }
    }

    #[must_use]
    pub fn has(&self, kind: GeometryComponentKind) -> bool {
        self.components.contains_key(&kind)
    }

    /// Remove the component of `kind`, giving up this set's share of it.
    pub fn remove(&mut self, kind: GeometryComponentKind) -> Option<ComponentHandle> {
        self.components.remove(&kind)
    }

    /// Insert a component, replacing and releasing any component of the same
    /// kind.
    pub fn add(&mut self, component: impl Into<ComponentHandle>) {
        let handle = component.into();
        let kind = handle.kind();
        trace!(%kind, users = handle.users(), "adding component");
        self.components.insert(kind, handle);
    }

    /// Kinds of the components present, in kind order.
    pub fn component_kinds(&self) -> impl Iterator<Item = GeometryComponentKind> + '_ {
        self.components.keys().copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Bounds of every mesh vertex and point cloud point, ignoring
    /// instances. `None` if there are no such points.
    #[must_use]
    pub fn compute_boundbox_without_instances(&self) -> Option<Bounds> {
        let mesh_bounds = self.get_mesh_for_read().and_then(Mesh::bounds);
        let point_bounds = self.get_pointcloud_for_read().and_then(PointCloud::bounds);
        match (mesh_bounds, point_bounds) {
            (Some(a), Some(b)) => Some(a.merge(&b)),
            (a, b) => a.or(b),
        }
    }

    /// A hash of which component bodies the set holds. Equal sets hash
    /// equally; content is not inspected.
    #[must_use]
    pub fn identity_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    #[must_use]
    pub fn has_mesh(&self) -> bool {
        self.component_for_read::<MeshComponent>()
            .is_some_and(MeshComponent::has_mesh)
    }

    #[must_use]
    pub fn has_pointcloud(&self) -> bool {
        self.component_for_read::<PointCloudComponent>()
            .is_some_and(PointCloudComponent::has_pointcloud)
    }

    #[must_use]
    pub fn has_instances(&self) -> bool {
        self.component_for_read::<InstancesComponent>()
            .is_some_and(|instances| !instances.is_empty())
    }

    #[must_use]
    pub fn get_mesh_for_read(&self) -> Option<&Mesh> {
        self.component_for_read::<MeshComponent>()?.get_for_read()
    }

    #[must_use]
    pub fn get_pointcloud_for_read(&self) -> Option<&PointCloud> {
        self.component_for_read::<PointCloudComponent>()?
            .get_for_read()
    }

    /// Mutable access to the mesh, creating an empty owned mesh if the set
    /// has none.
    pub fn get_mesh_for_write(&mut self) -> &mut Mesh {
        self.component_for_write::<MeshComponent>()
            .get_or_create_for_write()
    }

    /// Mutable access to the point cloud, creating an empty owned one if the
    /// set has none.
    pub fn get_pointcloud_for_write(&mut self) -> &mut PointCloud {
        self.component_for_write::<PointCloudComponent>()
            .get_or_create_for_write()
    }

    pub fn replace_mesh(&mut self, mesh: impl Into<Arc<Mesh>>, ownership: GeometryOwnership) {
        self.component_for_write::<MeshComponent>()
            .replace(mesh, ownership);
    }

    pub fn replace_pointcloud(
        &mut self,
        pointcloud: impl Into<Arc<PointCloud>>,
        ownership: GeometryOwnership,
    ) {
        self.component_for_write::<PointCloudComponent>()
            .replace(pointcloud, ownership);
    }
}

impl PartialEq for GeometrySet {
    fn eq(&self, other: &Self) -> bool {
        self.components.len() == other.components.len()
            && self
                .components
                .iter()
                .zip(&other.components)
                .all(|((kind_a, a), (kind_b, b))| kind_a == kind_b && a.ptr_eq(b))
    }
}

impl Eq for GeometrySet {}

impl Hash for GeometrySet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for (kind, handle) in &self.components {
            kind.hash(state);
            std::ptr::hash(handle.as_ptr(), state);
        }
    }
}

impl fmt::Display for GeometrySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GeometrySet[")?;
        for (i, kind) in self.component_kinds().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{kind}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use geometry_math::Vec3;

    use super::*;
    use crate::primitives;

    #[test]
    fn test_empty_set() {
        let set = GeometrySet::new();
        assert!(set.is_empty());
        assert!(!set.has_mesh());
        assert!(set.get_component_for_read(GeometryComponentKind::Mesh).is_none());
        assert!(set.compute_boundbox_without_instances().is_none());
        assert_eq!(set.to_string(), "GeometrySet[]");
    }

    #[test]
    fn test_write_creates_component() {
        let mut set = GeometrySet::new();
        let component = set.get_component_for_write(GeometryComponentKind::Instances);
        assert_eq!(component.kind(), GeometryComponentKind::Instances);
        assert!(set.has(GeometryComponentKind::Instances));
        assert!(!set.has_instances());
    }

    #[test]
    fn test_display_lists_kinds_in_order() {
        let mut set = GeometrySet::create_with_mesh(Mesh::new(), GeometryOwnership::Owned);
        set.get_component_for_write(GeometryComponentKind::Instances);
        assert_eq!(set.to_string(), "GeometrySet[Mesh, Instances]");
    }

    #[test]
    fn test_clones_are_equal_until_written() {
        let set = GeometrySet::create_with_mesh(primitives::cube(1.0), GeometryOwnership::Owned);
        let mut copy = set.clone();
        assert_eq!(set, copy);
        assert_eq!(set.identity_hash(), copy.identity_hash());
        copy.get_mesh_for_write();
        assert_ne!(set, copy);
    }

    #[test]
    fn test_identity_not_content() {
        let a = GeometrySet::create_with_mesh(Mesh::new(), GeometryOwnership::Owned);
        let b = GeometrySet::create_with_mesh(Mesh::new(), GeometryOwnership::Owned);
        assert_ne!(a, b);
        assert_eq!(GeometrySet::new(), GeometrySet::new());
    }

    #[test]
    fn test_add_replaces_same_kind() {
        let mut set =
            GeometrySet::create_with_mesh(primitives::cube(1.0), GeometryOwnership::Owned);
        set.add(GeometryComponent::create(GeometryComponentKind::Mesh));
        assert!(set.has(GeometryComponentKind::Mesh));
        assert!(!set.has_mesh());
    }

    #[test]
    fn test_remove() {
        let mut set =
            GeometrySet::create_with_pointcloud(PointCloud::new(), GeometryOwnership::Owned);
        assert!(set.remove(GeometryComponentKind::PointCloud).is_some());
        assert!(set.remove(GeometryComponentKind::PointCloud).is_none());
        assert!(set.is_empty());
    }

    #[test]
    fn test_boundbox_merges_mesh_and_points() {
        let mut set =
            GeometrySet::create_with_mesh(primitives::cube(2.0), GeometryOwnership::Owned);
        set.replace_pointcloud(
            PointCloud::from_positions([Vec3::new(3.0, 0.0, 0.0)], 0.5),
            GeometryOwnership::Owned,
        );
        let bounds = set.compute_boundbox_without_instances().unwrap();
        assert_eq!(bounds.min, Vec3::splat(-1.0));
        assert_eq!(bounds.max, Vec3::new(3.5, 1.0, 1.0));
    }

    #[test]
    fn test_typed_access() {
        let mut set = GeometrySet::new();
        set.component_for_write::<InstancesComponent>()
            .add_instance(crate::object::InstancedData::None, Default::default());
        assert_eq!(
            set.component_for_read::<InstancesComponent>()
                .map(InstancesComponent::instances_amount),
            Some(1)
        );
        assert!(set.component_for_read::<MeshComponent>().is_none());
    }
}
