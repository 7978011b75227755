//! The mesh component.

use std::collections::HashMap;
use std::sync::Arc;

use geometry_attribute::{
    AttributeData, AttributeDomain, AttributeError, AttributeInfo, AttributeSlice,
    AttributeSliceMut, AttributeType, AttributeValue, ReadAttribute, VirtualColumnMut,
    WriteAttribute,
};
use tracing::debug;

use crate::component::AttributeProvider;
use crate::interpolate::adapt_mesh_domain;
use crate::mesh::{
    BUILTIN_ATTRIBUTES as BUILTINS, CREASE, DeformVert, Mesh, MeshBuilder, NORMAL, POSITION,
    SHADE_SMOOTH,
};
use crate::object::Object;
use crate::ownership::{GeometryOwnership, Payload};

const MESH_DOMAINS: [AttributeDomain; 4] = [
    AttributeDomain::Point,
    AttributeDomain::Edge,
    AttributeDomain::Corner,
    AttributeDomain::Face,
];

/// A component holding at most one mesh.
///
/// Besides the mesh's own attributes, vertex groups are exposed as Point
/// domain `Float` attributes named after the group. The name to index
/// mapping lives on the component, the weights live on the mesh.
#[derive(Debug, Clone, Default)]
pub struct MeshComponent {
    mesh: Option<Payload<Mesh>>,
    vertex_group_names: HashMap<String, u32>,
}

impl MeshComponent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_mesh(mesh: impl Into<Arc<Mesh>>, ownership: GeometryOwnership) -> Self {
        let mut component = Self::new();
        component.replace(mesh, ownership);
        component
    }

    /// Finish `builder` into an owned mesh, keeping its vertex group names.
    #[must_use]
    pub fn from_builder(builder: MeshBuilder) -> Self {
        let (mesh, groups) = builder.finish_with_vertex_groups();
        let mut component = Self::with_mesh(mesh, GeometryOwnership::Owned);
        component.set_vertex_group_names(groups);
        component
    }

    /// Drop the mesh and the vertex group names.
    pub fn clear(&mut self) {
        self.mesh = None;
        self.vertex_group_names.clear();
    }

    #[must_use]
    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    /// Replace the mesh. Vertex group names are kept.
    pub fn replace(&mut self, mesh: impl Into<Arc<Mesh>>, ownership: GeometryOwnership) {
        self.mesh = Some(Payload::new(mesh, ownership));
    }

    /// Take the mesh out, leaving the component empty of geometry.
    #[must_use]
    pub fn release(&mut self) -> Option<Arc<Mesh>> {
        self.mesh.take().map(Payload::into_shared)
    }

    #[must_use]
    pub fn get_for_read(&self) -> Option<&Mesh> {
        self.mesh.as_ref().map(Payload::get)
    }

    /// Mutable access to the mesh, copying a read-only mesh first.
    pub fn get_for_write(&mut self) -> Option<&mut Mesh> {
        self.mesh.as_mut().map(Payload::get_mut)
    }

    /// Mutable access to the mesh, creating an empty owned one if needed.
    pub fn get_or_create_for_write(&mut self) -> &mut Mesh {
        self.mesh
            .get_or_insert_with(|| Payload::owned(Mesh::new()))
            .get_mut()
    }

    /// Ownership of the current mesh. `Owned` when there is none.
    #[must_use]
    pub fn ownership(&self) -> GeometryOwnership {
        self.mesh
            .as_ref()
            .map_or(GeometryOwnership::Owned, Payload::ownership)
    }

    /// Replace the vertex group names with the object's groups.
    ///
    /// Groups named like a builtin or an existing custom attribute are
    /// skipped; the remaining groups keep their index in the object.
    pub fn copy_vertex_group_names_from_object(&mut self, object: &Object) {
        self.set_vertex_group_names(object.vertex_groups().iter().cloned());
    }

    #[must_use]
    pub fn vertex_group_names(&self) -> &HashMap<String, u32> {
        &self.vertex_group_names
    }

    fn vertex_group_weights(&self, mesh: &Mesh, group: u32) -> Vec<f32> {
        let dverts = mesh.deform_verts();
        if dverts.is_empty() {
            return vec![0.0; mesh.vertex_count()];
        }
        dverts.iter().map(|dvert| dvert.weight(group)).collect()
    }

    fn set_vertex_group_names(&mut self, names: impl IntoIterator<Item = String>) {
        let mut indexed = HashMap::new();
        for (index, name) in names.into_iter().enumerate() {
            let taken = BUILTINS.contains(&name.as_str())
                || self
                    .get_for_read()
                    .is_some_and(|mesh| mesh.attributes().contains(&name));
            if taken {
                debug!(name = %name, "skipping vertex group that shadows an attribute");
                continue;
            }
            indexed.insert(name, index as u32);
        }
        self.vertex_group_names = indexed;
    }
}

/// One vertex group viewed as a dense column of weights.
struct VertexGroupColumn<'a> {
    dverts: &'a mut [DeformVert],
    group: u32,
}

impl VirtualColumnMut for VertexGroupColumn<'_> {
    fn len(&self) -> usize {
        self.dverts.len()
    }

    fn data_type(&self) -> AttributeType {
        AttributeType::Float
    }

    fn get(&self, index: usize) -> AttributeValue {
        AttributeValue::Float(self.dverts[index].weight(self.group))
    }

    fn set(&mut self, index: usize, value: AttributeValue) {
        let AttributeValue::Float(weight) = value.convert(AttributeType::Float) else {
            unreachable!("conversion to float yields a float");
        };
        self.dverts[index].set_weight(self.group, weight);
    }
}

impl AttributeProvider for MeshComponent {
    fn domain_supported(&self, domain: AttributeDomain) -> bool {
        MESH_DOMAINS.contains(&domain)
    }

    fn domain_with_type_supported(
        &self,
        domain: AttributeDomain,
        _data_type: AttributeType,
    ) -> bool {
        self.domain_supported(domain)
    }

    fn domain_size(&self, domain: AttributeDomain) -> usize {
        self.get_for_read().map_or(0, |mesh| mesh.domain_size(domain))
    }

    fn is_builtin(&self, name: &str) -> bool {
        BUILTINS.contains(&name)
    }

    fn attribute_info(&self, name: &str) -> Option<AttributeInfo> {
        let mesh = self.get_for_read()?;
        let info = match name {
            POSITION => AttributeInfo::new(AttributeDomain::Point, AttributeType::Float3),
            NORMAL => AttributeInfo::new(AttributeDomain::Face, AttributeType::Float3),
            SHADE_SMOOTH => AttributeInfo::new(AttributeDomain::Face, AttributeType::Boolean),
            CREASE => AttributeInfo::new(AttributeDomain::Edge, AttributeType::Float),
            _ if self.vertex_group_names.contains_key(name) => {
                AttributeInfo::new(AttributeDomain::Point, AttributeType::Float)
            }
            _ => mesh.attributes().get(name)?.info(),
        };
        Some(info)
    }

    fn read(&self, name: &str) -> Option<ReadAttribute<'_>> {
        let mesh = self.get_for_read()?;
        let attribute = match name {
            POSITION => ReadAttribute::from_slice(
                AttributeDomain::Point,
                AttributeSlice::Float3(mesh.positions()),
            ),
            NORMAL => ReadAttribute::from_data(
                AttributeDomain::Face,
                AttributeData::Float3(mesh.face_normals()),
            ),
            SHADE_SMOOTH => ReadAttribute::from_slice(
                AttributeDomain::Face,
                AttributeSlice::Boolean(mesh.shade_smooth()),
            ),
            CREASE => ReadAttribute::from_slice(
                AttributeDomain::Edge,
                AttributeSlice::Float(mesh.creases()),
            ),
            _ => match self.vertex_group_names.get(name) {
                Some(&group) => ReadAttribute::from_data(
                    AttributeDomain::Point,
                    AttributeData::Float(self.vertex_group_weights(mesh, group)),
                ),
                None => {
                    let stored = mesh.attributes().get(name)?;
                    ReadAttribute::from_slice(stored.domain, stored.data.as_slice())
                }
            },
        };
        Some(attribute)
    }

    fn write(&mut self, name: &str) -> Option<WriteAttribute<'_>> {
        if name == NORMAL || self.attribute_info(name).is_none() {
            return None;
        }
        let group = self.vertex_group_names.get(name).copied();
        let mesh = self.get_for_write()?;
        let attribute = match name {
            POSITION => WriteAttribute::from_slice(
                AttributeDomain::Point,
                AttributeSliceMut::Float3(mesh.positions_mut()),
            ),
            SHADE_SMOOTH => WriteAttribute::from_slice(
                AttributeDomain::Face,
                AttributeSliceMut::Boolean(mesh.shade_smooth_mut()),
            ),
            CREASE => WriteAttribute::from_slice(
                AttributeDomain::Edge,
                AttributeSliceMut::Float(mesh.creases_mut()),
            ),
            _ => match group {
                Some(group) => WriteAttribute::from_virtual(
                    AttributeDomain::Point,
                    VertexGroupColumn {
                        dverts: mesh.deform_verts_mut(),
                        group,
                    },
                ),
                None => {
                    let stored = mesh.attributes_mut().get_mut(name)?;
                    WriteAttribute::from_slice(stored.domain, stored.data.as_slice_mut())
                }
            },
        };
        Some(attribute)
    }

    fn create(
        &mut self,
        name: &str,
        domain: AttributeDomain,
        data_type: AttributeType,
    ) -> Result<(), AttributeError> {
        if self.is_builtin(name) {
            return Err(AttributeError::Builtin(name.to_string()));
        }
        if !self.domain_supported(domain) {
            return Err(AttributeError::UnsupportedDomain(domain));
        }
        if self.vertex_group_names.contains_key(name) {
            return Err(AttributeError::AlreadyExists(name.to_string()));
        }
        let mesh = self.get_for_write().ok_or(AttributeError::MissingGeometry)?;
        let len = mesh.domain_size(domain);
        mesh.attributes_mut().create(name, domain, data_type, len)
    }

    fn delete(&mut self, name: &str) -> Result<(), AttributeError> {
        if self.is_builtin(name) {
            return Err(AttributeError::Builtin(name.to_string()));
        }
        if let Some(group) = self.vertex_group_names.remove(name) {
            for index in self.vertex_group_names.values_mut() {
                if *index > group {
                    *index -= 1;
                }
            }
            if let Some(mesh) = self.get_for_write() {
                mesh.remove_vertex_group(group);
            }
            return Ok(());
        }
        let exists = self
            .get_for_read()
            .is_some_and(|mesh| mesh.attributes().contains(name));
        if !exists {
            return Err(AttributeError::NotFound(name.to_string()));
        }
        if let Some(mesh) = self.get_for_write() {
            mesh.attributes_mut().remove(name);
        }
        Ok(())
    }

    fn names(&self) -> Vec<String> {
        let Some(mesh) = self.get_for_read() else {
            return Vec::new();
        };
        BUILTINS
            .iter()
            .map(|name| name.to_string())
            .chain(self.vertex_group_names.keys().cloned())
            .chain(mesh.attributes().names().map(str::to_string))
            .collect()
    }

    fn adapt_domain<'a>(
        &self,
        attribute: ReadAttribute<'a>,
        domain: AttributeDomain,
    ) -> Option<ReadAttribute<'a>> {
        let from = attribute.domain();
        if from == domain {
            return Some(attribute);
        }
        let mesh = self.get_for_read()?;
        let values = attribute.as_slice()?;
        let data = adapt_mesh_domain(mesh, values, from, domain)?;
        Some(ReadAttribute::from_data(domain, data))
    }

    fn is_empty(&self) -> bool {
        self.get_for_read().is_none_or(Mesh::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use geometry_math::Vec3;

    use super::*;
    use crate::primitives;

    fn grouped_component() -> MeshComponent {
        let mut builder = primitives::grid_builder(1.0, 1.0, 2, 2);
        let a = builder.vertex_group("a");
        let b = builder.vertex_group("b");
        let c = builder.vertex_group("c");
        builder.assign_to_group(0, a, 0.1).unwrap();
        builder.assign_to_group(1, b, 0.2).unwrap();
        builder.assign_to_group(2, c, 0.3).unwrap();
        MeshComponent::from_builder(builder)
    }

    #[test]
    fn test_empty_component() {
        let component = MeshComponent::new();
        assert!(!component.has_mesh());
        assert!(component.is_empty());
        assert!(component.names().is_empty());
        assert_eq!(component.domain_size(AttributeDomain::Point), 0);
        assert_eq!(component.ownership(), GeometryOwnership::Owned);
    }

    #[test]
    fn test_create_without_mesh_fails() {
        let mut component = MeshComponent::new();
        assert_eq!(
            component.create("x", AttributeDomain::Point, AttributeType::Float),
            Err(AttributeError::MissingGeometry)
        );
    }

    #[test]
    fn test_builtin_infos() {
        let component = MeshComponent::with_mesh(primitives::cube(1.0), GeometryOwnership::Owned);
        assert_eq!(
            component.attribute_info("crease"),
            Some(AttributeInfo::new(AttributeDomain::Edge, AttributeType::Float))
        );
        assert_eq!(component.read("normal").unwrap().len(), 6);
        assert_eq!(component.read("crease").unwrap().len(), 12);
    }

    #[test]
    fn test_normal_is_read_only() {
        let mut component =
            MeshComponent::with_mesh(primitives::cube(1.0), GeometryOwnership::Owned);
        assert!(component.write("normal").is_none());
        assert!(component.write("shade_smooth").is_some());
    }

    #[test]
    fn test_read_only_mesh_is_copied_on_write() {
        let shared = Arc::new(primitives::grid(1.0, 1.0, 2, 2));
        let mut component = MeshComponent::with_mesh(shared.clone(), GeometryOwnership::ReadOnly);
        component
            .write("position")
            .unwrap()
            .fill(AttributeValue::Float3(Vec3::ONE));
        assert_eq!(shared.positions()[0], Vec3::new(-0.5, -0.5, 0.0));
        assert_eq!(component.get_for_read().unwrap().positions()[0], Vec3::ONE);
        assert_eq!(component.ownership(), GeometryOwnership::Owned);
    }

    #[test]
    fn test_missing_write_does_not_copy() {
        let shared = Arc::new(primitives::grid(1.0, 1.0, 2, 2));
        let mut component = MeshComponent::with_mesh(shared, GeometryOwnership::ReadOnly);
        assert!(component.write("nothing").is_none());
        assert_eq!(component.ownership(), GeometryOwnership::ReadOnly);
    }

    #[test]
    fn test_vertex_group_read_and_write() {
        let mut component = grouped_component();
        let read = component.read("b").unwrap();
        assert_eq!(read.domain(), AttributeDomain::Point);
        assert_eq!(read.to_data(), AttributeData::Float(vec![0.0, 0.2, 0.0, 0.0]));
        component.write("b").unwrap().set(3, AttributeValue::Float(0.9));
        let mesh = component.get_for_read().unwrap();
        assert_eq!(mesh.deform_verts()[3].weight(1), 0.9);
    }

    #[test]
    fn test_vertex_group_without_weights_reads_zero() {
        let mut component =
            MeshComponent::with_mesh(primitives::grid(1.0, 1.0, 2, 2), GeometryOwnership::Owned);
        component.copy_vertex_group_names_from_object(&Object::new("o").with_vertex_groups(["g"]));
        assert_eq!(component.read("g").unwrap().to_data(), AttributeData::Float(vec![0.0; 4]));
        assert!(component.names().contains(&"g".to_string()));
    }

    #[test]
    fn test_delete_vertex_group_reindexes() {
        let mut component = grouped_component();
        component.delete("a").unwrap();
        assert!(!component.vertex_group_names().contains_key("a"));
        assert_eq!(component.vertex_group_names()["b"], 0);
        assert_eq!(component.vertex_group_names()["c"], 1);
        assert_eq!(
            component.read("c").unwrap().to_data(),
            AttributeData::Float(vec![0.0, 0.0, 0.3, 0.0])
        );
        assert_eq!(
            component.read("b").unwrap().to_data(),
            AttributeData::Float(vec![0.0, 0.2, 0.0, 0.0])
        );
    }

    #[test]
    fn test_create_conflicts_with_vertex_group() {
        let mut component = grouped_component();
        assert_eq!(
            component.create("a", AttributeDomain::Face, AttributeType::Float),
            Err(AttributeError::AlreadyExists("a".to_string()))
        );
    }

    #[test]
    fn test_vertex_groups_do_not_shadow_attributes() {
        let mut component =
            MeshComponent::with_mesh(primitives::grid(1.0, 1.0, 2, 2), GeometryOwnership::Owned);
        component
            .create("mask", AttributeDomain::Face, AttributeType::Int32)
            .unwrap();
        component.write("mask").unwrap().fill(AttributeValue::Int32(5));

        let object = Object::new("o").with_vertex_groups(["position", "mask", "g"]);
        component.copy_vertex_group_names_from_object(&object);
        assert_eq!(component.vertex_group_names().len(), 1);
        assert_eq!(component.vertex_group_names()["g"], 2);

        let mask = component.read("mask").unwrap();
        assert_eq!(
            mask.info(),
            AttributeInfo::new(AttributeDomain::Face, AttributeType::Int32)
        );
        assert_eq!(mask.get(0), AttributeValue::Int32(5));
        component.delete("mask").unwrap();
        assert!(component.vertex_group_names().contains_key("g"));
    }

    #[test]
    fn test_vertex_group_write_converts_values() {
        let mut component = grouped_component();
        {
            let mut weights = component.write("a").unwrap();
            weights.set(0, AttributeValue::Int32(1));
            weights.set(1, AttributeValue::Boolean(true));
        }
        let read = component.read("a").unwrap();
        assert_eq!(read.get(0), AttributeValue::Float(1.0));
        assert_eq!(read.get(1), AttributeValue::Float(1.0));
        let mut dverts = vec![DeformVert::default()];
        let mut column = VertexGroupColumn {
            dverts: &mut dverts,
            group: 0,
        };
        column.set(0, AttributeValue::Float3(Vec3::new(3.0, 4.0, 0.0)));
        assert_eq!(column.get(0), AttributeValue::Float(5.0));
    }

    #[test]
    fn test_empty_mesh_payload_is_empty() {
        let mut component = MeshComponent::new();
        component.get_or_create_for_write();
        assert!(component.has_mesh());
        assert!(component.is_empty());
        let component =
            MeshComponent::with_mesh(primitives::grid(1.0, 1.0, 2, 2), GeometryOwnership::Owned);
        assert!(!component.is_empty());
    }

    #[test]
    fn test_release_and_clear() {
        let mut component = grouped_component();
        let mesh = component.release().unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert!(!component.has_mesh());
        assert_eq!(component.vertex_group_names().len(), 3);
        component.clear();
        assert!(component.vertex_group_names().is_empty());
    }

    #[test]
    fn test_adapt_domain_interpolates() {
        let component =
            MeshComponent::with_mesh(primitives::grid(2.0, 2.0, 2, 2), GeometryOwnership::Owned);
        let positions = component.read("position").unwrap();
        let centers = component.adapt_domain(positions, AttributeDomain::Face).unwrap();
        assert_eq!(centers.get(0), AttributeValue::Float3(Vec3::ZERO));
    }
}
