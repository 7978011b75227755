//! The instances component.
//!
//! Instances are stored as parallel arrays, one entry per instance. All
//! arrays always have the same length. The arrays are exposed as builtin
//! attributes on the `Instance` domain; only `position` can be written
//! through the attribute API, and custom attributes are not supported.

use geometry_attribute::{
    AttributeDomain, AttributeError, AttributeInfo, AttributeSlice, AttributeSliceMut,
    AttributeType, ReadAttribute, WriteAttribute,
};
use geometry_math::{InstanceTransform, Mat4, Vec3};
use tracing::trace;

use crate::component::AttributeProvider;
use crate::object::InstancedData;

const POSITION: &str = "position";
const ROTATION: &str = "rotation";
const SCALE: &str = "scale";
const ID: &str = "id";

const BUILTINS: [&str; 4] = [POSITION, ROTATION, SCALE, ID];

/// Id given to instances added without an explicit one.
pub const DEFAULT_INSTANCE_ID: i32 = -1;

/// A list of placed references to objects or collections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstancesComponent {
    positions: Vec<Vec3>,
    rotations: Vec<Vec3>,
    scales: Vec<Vec3>,
    ids: Vec<i32>,
    instanced_data: Vec<InstancedData>,
}

impl InstancesComponent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instance of `data` with id `-1`.
    pub fn add_instance(&mut self, data: impl Into<InstancedData>, transform: InstanceTransform) {
        self.add_instance_with_id(data, transform, DEFAULT_INSTANCE_ID);
    }

    pub fn add_instance_with_id(
        &mut self,
        data: impl Into<InstancedData>,
        transform: InstanceTransform,
        id: i32,
    ) {
        let data = data.into();
        trace!(
            index = self.positions.len(),
            target = data.name().unwrap_or("none"),
            id,
            "adding instance"
        );
        self.positions.push(transform.position);
        self.rotations.push(transform.rotation);
        self.scales.push(transform.scale);
        self.ids.push(id);
        self.instanced_data.push(data);
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.rotations.clear();
        self.scales.clear();
        self.ids.clear();
        self.instanced_data.clear();
    }

    #[must_use]
    pub fn instances_amount(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[must_use]
    pub fn instanced_data(&self) -> &[InstancedData] {
        &self.instanced_data
    }

    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Positions are the one array that can be edited in place.
    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    /// XYZ Euler rotations in radians.
    #[must_use]
    pub fn rotations(&self) -> &[Vec3] {
        &self.rotations
    }

    #[must_use]
    pub fn scales(&self) -> &[Vec3] {
        &self.scales
    }

    #[must_use]
    pub fn ids(&self) -> &[i32] {
        &self.ids
    }

    #[must_use]
    pub fn transform(&self, index: usize) -> Option<InstanceTransform> {
        Some(InstanceTransform::new(
            *self.positions.get(index)?,
            self.rotations[index],
            self.scales[index],
        ))
    }

    pub fn transforms(&self) -> impl Iterator<Item = InstanceTransform> + '_ {
        (0..self.instances_amount())
            .map(|i| InstanceTransform::new(self.positions[i], self.rotations[i], self.scales[i]))
    }

    /// The composed matrix of one instance.
    #[must_use]
    pub fn instance_matrix(&self, index: usize) -> Option<Mat4> {
        self.transform(index).map(|t| t.to_matrix())
    }
}

impl AttributeProvider for InstancesComponent {
    fn domain_supported(&self, domain: AttributeDomain) -> bool {
        domain == AttributeDomain::Instance
    }

    fn domain_with_type_supported(
        &self,
        domain: AttributeDomain,
        data_type: AttributeType,
    ) -> bool {
        domain == AttributeDomain::Instance
            && matches!(data_type, AttributeType::Float3 | AttributeType::Int32)
    }

    fn domain_size(&self, domain: AttributeDomain) -> usize {
        if domain == AttributeDomain::Instance {
            self.instances_amount()
        } else {
            0
        }
    }

    fn is_builtin(&self, name: &str) -> bool {
        BUILTINS.contains(&name)
    }

    fn attribute_info(&self, name: &str) -> Option<AttributeInfo> {
        let data_type = match name {
            POSITION | ROTATION | SCALE => AttributeType::Float3,
            ID => AttributeType::Int32,
            _ => return None,
        };
        Some(AttributeInfo::new(AttributeDomain::Instance, data_type))
    }

    fn read(&self, name: &str) -> Option<ReadAttribute<'_>> {
        let slice = match name {
            POSITION => AttributeSlice::Float3(&self.positions),
            ROTATION => AttributeSlice::Float3(&self.rotations),
            SCALE => AttributeSlice::Float3(&self.scales),
            ID => AttributeSlice::Int32(&self.ids),
            _ => return None,
        };
        Some(ReadAttribute::from_slice(AttributeDomain::Instance, slice))
    }

    fn write(&mut self, name: &str) -> Option<WriteAttribute<'_>> {
        if name != POSITION {
            return None;
        }
        Some(WriteAttribute::from_slice(
            AttributeDomain::Instance,
            AttributeSliceMut::Float3(&mut self.positions),
        ))
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
        Err(AttributeError::UnsupportedType { domain, data_type })
    }

    fn delete(&mut self, name: &str) -> Result<(), AttributeError> {
        if self.is_builtin(name) {
            return Err(AttributeError::Builtin(name.to_string()));
        }
        Err(AttributeError::NotFound(name.to_string()))
    }

    fn names(&self) -> Vec<String> {
        BUILTINS.iter().map(|name| name.to_string()).collect()
    }

    fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use geometry_attribute::AttributeValue;

    use super::*;
    use crate::object::{Collection, Object};

    fn three_instances() -> InstancesComponent {
        let tree = Arc::new(Object::new("tree"));
        let mut instances = InstancesComponent::new();
        for x in 0..3 {
            instances.add_instance(
                tree.clone(),
                InstanceTransform::from_position(Vec3::new(x as f32, 0.0, 0.0)),
            );
        }
        instances
    }

    #[test]
    fn test_add_instance_keeps_arrays_in_sync() {
        let instances = three_instances();
        assert_eq!(instances.instances_amount(), 3);
        assert_eq!(
            instances.positions(),
            &[Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0)]
        );
        assert_eq!(instances.rotations(), &[Vec3::ZERO; 3]);
        assert_eq!(instances.scales(), &[Vec3::ONE; 3]);
        assert_eq!(instances.ids(), &[-1, -1, -1]);
        assert_eq!(instances.instanced_data().len(), 3);
    }

    #[test]
    fn test_targets_are_normalized() {
        let mut instances = InstancesComponent::new();
        let collection = Arc::new(Collection::new("forest"));
        instances.add_instance_with_id(collection.clone(), InstanceTransform::IDENTITY, 7);
        instances.add_instance(InstancedData::None, InstanceTransform::IDENTITY);
        assert_eq!(instances.instanced_data()[0], InstancedData::Collection(collection));
        assert!(instances.instanced_data()[1].is_none());
        assert_eq!(instances.ids(), &[7, -1]);
    }

    #[test]
    fn test_only_position_is_writable() {
        let mut instances = three_instances();
        assert!(instances.write("rotation").is_none());
        instances
            .write("position")
            .unwrap()
            .set(0, AttributeValue::Float3(Vec3::Z));
        assert_eq!(instances.positions()[0], Vec3::Z);
        instances.positions_mut()[1] = Vec3::Y;
        assert_eq!(instances.read("position").unwrap().get(1), AttributeValue::Float3(Vec3::Y));
    }

    #[test]
    fn test_no_custom_attributes() {
        let mut instances = three_instances();
        assert_eq!(
            instances.create("color", AttributeDomain::Instance, AttributeType::Color),
            Err(AttributeError::UnsupportedType {
                domain: AttributeDomain::Instance,
                data_type: AttributeType::Color
            })
        );
        assert_eq!(
            instances.create("color", AttributeDomain::Point, AttributeType::Color),
            Err(AttributeError::UnsupportedDomain(AttributeDomain::Point))
        );
        assert_eq!(
            instances.delete("id"),
            Err(AttributeError::Builtin("id".to_string()))
        );
    }

    #[test]
    fn test_instance_matrix() {
        let instances = three_instances();
        let matrix = instances.instance_matrix(2).unwrap();
        assert_eq!(matrix.transform_point3(Vec3::ZERO), Vec3::new(2.0, 0.0, 0.0));
        assert!(instances.instance_matrix(3).is_none());
        assert_eq!(instances.transforms().count(), 3);
    }

    #[test]
    fn test_clear() {
        let mut instances = three_instances();
        instances.clear();
        assert!(instances.is_empty());
        assert!(instances.instanced_data().is_empty());
    }
}
