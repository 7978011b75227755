//! Point clouds and the point cloud component.

use std::sync::Arc;

use geometry_attribute::{
    AttributeDomain, AttributeError, AttributeInfo, AttributeSlice, AttributeSliceMut,
    AttributeStorage, AttributeType, ReadAttribute, WriteAttribute,
};
use geometry_math::{Bounds, Vec3};

use crate::component::AttributeProvider;
use crate::ownership::{GeometryOwnership, Payload};

const POSITION: &str = "position";
const RADIUS: &str = "radius";

/// Unconnected points with a radius each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    positions: Vec<Vec3>,
    radii: Vec<f32>,
    attributes: AttributeStorage,
}

impl PointCloud {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Points at `positions`, all with the same `radius`.
    #[must_use]
    pub fn from_positions(positions: impl IntoIterator<Item = Vec3>, radius: f32) -> Self {
        let positions: Vec<Vec3> = positions.into_iter().collect();
        let radii = vec![radius; positions.len()];
        Self {
            positions,
            radii,
            attributes: AttributeStorage::new(),
        }
    }

    /// Append a point. Custom attributes get a default value for it.
    pub fn push(&mut self, position: Vec3, radius: f32) {
        self.positions.push(position);
        self.radii.push(radius);
        self.attributes
            .resize_domain(AttributeDomain::Point, self.positions.len());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    #[must_use]
    pub fn radii(&self) -> &[f32] {
        &self.radii
    }

    pub fn radii_mut(&mut self) -> &mut [f32] {
        &mut self.radii
    }

    #[must_use]
    pub fn attributes(&self) -> &AttributeStorage {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeStorage {
        &mut self.attributes
    }

    /// Bounds of every point grown by its radius.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        let first = *self.positions.first()?;
        let mut bounds = Bounds::from_point(first);
        for (&position, &radius) in self.positions.iter().zip(&self.radii) {
            bounds.extend_radius(position, radius);
        }
        Some(bounds)
    }
}

/// A component holding at most one point cloud.
#[derive(Debug, Clone, Default)]
pub struct PointCloudComponent {
    pointcloud: Option<Payload<PointCloud>>,
}

impl PointCloudComponent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_pointcloud(
        pointcloud: impl Into<Arc<PointCloud>>,
        ownership: GeometryOwnership,
    ) -> Self {
        let mut component = Self::new();
        component.replace(pointcloud, ownership);
        component
    }

    pub fn clear(&mut self) {
        self.pointcloud = None;
    }

    #[must_use]
    pub fn has_pointcloud(&self) -> bool {
        self.pointcloud.is_some()
    }

    pub fn replace(
        &mut self,
        pointcloud: impl Into<Arc<PointCloud>>,
        ownership: GeometryOwnership,
    ) {
        self.pointcloud = Some(Payload::new(pointcloud, ownership));
    }

    /// Take the point cloud out, leaving the component empty.
    #[must_use]
    pub fn release(&mut self) -> Option<Arc<PointCloud>> {
        self.pointcloud.take().map(Payload::into_shared)
    }

    #[must_use]
    pub fn get_for_read(&self) -> Option<&PointCloud> {
        self.pointcloud.as_ref().map(Payload::get)
    }

    /// Mutable access, copying a read-only point cloud first.
    pub fn get_for_write(&mut self) -> Option<&mut PointCloud> {
        self.pointcloud.as_mut().map(Payload::get_mut)
    }

    /// Mutable access, creating an empty owned point cloud if needed.
    pub fn get_or_create_for_write(&mut self) -> &mut PointCloud {
        self.pointcloud
            .get_or_insert_with(|| Payload::owned(PointCloud::new()))
            .get_mut()
    }

    #[must_use]
    pub fn ownership(&self) -> GeometryOwnership {
        self.pointcloud
            .as_ref()
            .map_or(GeometryOwnership::Owned, Payload::ownership)
    }
}

impl AttributeProvider for PointCloudComponent {
    fn domain_supported(&self, domain: AttributeDomain) -> bool {
        domain == AttributeDomain::Point
    }

    fn domain_with_type_supported(
        &self,
        domain: AttributeDomain,
        _data_type: AttributeType,
    ) -> bool {
        self.domain_supported(domain)
    }

    fn domain_size(&self, domain: AttributeDomain) -> usize {
        match (domain, self.get_for_read()) {
            (AttributeDomain::Point, Some(pointcloud)) => pointcloud.len(),
            _ => 0,
        }
    }

    fn is_builtin(&self, name: &str) -> bool {
        name == POSITION || name == RADIUS
    }

    fn attribute_info(&self, name: &str) -> Option<AttributeInfo> {
        let pointcloud = self.get_for_read()?;
        match name {
            POSITION => Some(AttributeInfo::new(AttributeDomain::Point, AttributeType::Float3)),
            RADIUS => Some(AttributeInfo::new(AttributeDomain::Point, AttributeType::Float)),
            _ => pointcloud.attributes().get(name).map(|stored| stored.info()),
        }
    }

    fn read(&self, name: &str) -> Option<ReadAttribute<'_>> {
        let pointcloud = self.get_for_read()?;
        let slice = match name {
            POSITION => AttributeSlice::Float3(pointcloud.positions()),
            RADIUS => AttributeSlice::Float(pointcloud.radii()),
            _ => pointcloud.attributes().get(name)?.data.as_slice(),
        };
        Some(ReadAttribute::from_slice(AttributeDomain::Point, slice))
    }

    fn write(&mut self, name: &str) -> Option<WriteAttribute<'_>> {
        self.attribute_info(name)?;
        let pointcloud = self.get_for_write()?;
        let slice = match name {
            POSITION => AttributeSliceMut::Float3(pointcloud.positions_mut()),
            RADIUS => AttributeSliceMut::Float(pointcloud.radii_mut()),
            _ => pointcloud.attributes_mut().get_mut(name)?.data.as_slice_mut(),
        };
        Some(WriteAttribute::from_slice(AttributeDomain::Point, slice))
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
        let pointcloud = self.get_for_write().ok_or(AttributeError::MissingGeometry)?;
        let len = pointcloud.len();
        pointcloud.attributes_mut().create(name, domain, data_type, len)
    }

    fn delete(&mut self, name: &str) -> Result<(), AttributeError> {
        if self.is_builtin(name) {
            return Err(AttributeError::Builtin(name.to_string()));
        }
        let exists = self
            .get_for_read()
            .is_some_and(|pointcloud| pointcloud.attributes().contains(name));
        if !exists {
            return Err(AttributeError::NotFound(name.to_string()));
        }
        if let Some(pointcloud) = self.get_for_write() {
            pointcloud.attributes_mut().remove(name);
        }
        Ok(())
    }

    fn names(&self) -> Vec<String> {
        let Some(pointcloud) = self.get_for_read() else {
            return Vec::new();
        };
        [POSITION, RADIUS]
            .into_iter()
            .chain(pointcloud.attributes().names())
            .map(str::to_string)
            .collect()
    }

    fn is_empty(&self) -> bool {
        self.get_for_read().is_none_or(PointCloud::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use geometry_attribute::{AttributeData, AttributeValue};

    use super::*;

    #[test]
    fn test_push_resizes_custom_attributes() {
        let mut cloud = PointCloud::from_positions([Vec3::ZERO], 0.5);
        cloud
            .attributes_mut()
            .create("id", AttributeDomain::Point, AttributeType::Int32, 1)
            .unwrap();
        cloud.push(Vec3::X, 0.25);
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.radii(), &[0.5, 0.25]);
        assert_eq!(cloud.attributes().get("id").unwrap().data.len(), 2);
    }

    #[test]
    fn test_bounds_include_radius() {
        let cloud = PointCloud::from_positions([Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)], 0.5);
        let bounds = cloud.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(-0.5, -0.5, -0.5));
        assert_eq!(bounds.max, Vec3::new(2.5, 0.5, 0.5));
        assert!(PointCloud::new().bounds().is_none());
    }

    #[test]
    fn test_only_point_domain() {
        let mut component = PointCloudComponent::with_pointcloud(
            PointCloud::from_positions([Vec3::ZERO], 1.0),
            GeometryOwnership::Owned,
        );
        assert_eq!(
            component.create("a", AttributeDomain::Face, AttributeType::Float),
            Err(AttributeError::UnsupportedDomain(AttributeDomain::Face))
        );
        component
            .create("a", AttributeDomain::Point, AttributeType::Color)
            .unwrap();
        assert_eq!(component.read("a").unwrap().len(), 1);
        assert_eq!(component.domain_size(AttributeDomain::Edge), 0);
    }

    #[test]
    fn test_custom_attribute_write() {
        let mut component = PointCloudComponent::with_pointcloud(
            PointCloud::from_positions([Vec3::ZERO, Vec3::ONE], 1.0),
            GeometryOwnership::Editable,
        );
        component
            .create("density", AttributeDomain::Point, AttributeType::Float)
            .unwrap();
        component
            .write("density")
            .unwrap()
            .set(1, AttributeValue::Int32(4));
        assert_eq!(
            component.read("density").unwrap().to_data(),
            AttributeData::Float(vec![0.0, 4.0])
        );
        assert_eq!(component.ownership(), GeometryOwnership::Editable);
    }

    #[test]
    fn test_delete() {
        let mut component = PointCloudComponent::new();
        component.get_or_create_for_write().push(Vec3::ZERO, 1.0);
        assert_eq!(
            component.delete("radius"),
            Err(AttributeError::Builtin("radius".to_string()))
        );
        assert_eq!(
            component.delete("nope"),
            Err(AttributeError::NotFound("nope".to_string()))
        );
        assert!(component.release().is_some());
        assert!(component.is_empty());
    }
}
