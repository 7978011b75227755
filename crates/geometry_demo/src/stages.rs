//! Processing stages run by the demo.
//!
//! Each stage takes the geometry set by value or `&mut` and goes through the
//! public attribute API the way a procedural node would.

use std::sync::Arc;

use anyhow::{Context, Result};
use geometry_attribute::{AttributeDomain, AttributeType, AttributeValue};
use geometry_math::{Bounds, InstanceTransform, Vec3};
use geometry_set::{
    GeometryComponent, GeometryComponentKind, GeometryOwnership, GeometrySet, InstancesComponent,
    MeshComponent, Object, PointCloud, primitives,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::DemoConfig;

/// Vertex group holding how strongly each vertex is displaced.
pub const HEIGHT_GROUP: &str = "height";

/// Custom point attribute written by [`scatter_points`].
pub const DENSITY: &str = "density";

/// A grid mesh with a [`HEIGHT_GROUP`] vertex group that falls off from the
/// centre.
///
/// # Errors
///
/// Fails if the grid could not be weighted.
pub fn build_input(config: &DemoConfig) -> Result<GeometrySet> {
    let mut builder =
        primitives::grid_builder(config.size, config.size, config.resolution, config.resolution);
    let group = builder.vertex_group(HEIGHT_GROUP);
    let half = (config.size * 0.5).max(f32::EPSILON);
    let weights: Vec<f32> = builder
        .positions()
        .iter()
        .map(|position| (1.0 - position.truncate().length() / half).max(0.0))
        .collect();
    for (index, weight) in weights.iter().enumerate() {
        if *weight > 0.0 {
            builder.assign_to_group(index as u32, group, *weight)?;
        }
    }
    let mut set = GeometrySet::new();
    set.add(GeometryComponent::Mesh(MeshComponent::from_builder(builder)));
    info!(
        vertices = weights.len(),
        resolution = config.resolution,
        "built input grid"
    );
    Ok(set)
}

/// Raise vertices along Z by their [`HEIGHT_GROUP`] weight.
///
/// # Errors
///
/// Fails if the set has no mesh.
pub fn displace(set: &mut GeometrySet, amount: f32) -> Result<()> {
    if !set.has_mesh() {
        anyhow::bail!("displace needs a mesh");
    }
    let component = set.get_component_for_write(GeometryComponentKind::Mesh);
    let weights = component
        .attribute_get_typed_for_read(HEIGHT_GROUP, AttributeDomain::Point, 0.0_f32)
        .to_vec();
    let mut positions = component
        .attribute_try_get_for_write("position")
        .context("mesh has no writable position attribute")?;
    for (index, weight) in weights.into_iter().enumerate() {
        let AttributeValue::Float3(position) = positions.get(index) else {
            continue;
        };
        positions.set(index, AttributeValue::Float3(position + Vec3::Z * weight * amount));
    }
    debug!(amount, "displaced mesh");
    Ok(())
}

/// Put one point at the centre of every face and store how upright the face
/// is in the [`DENSITY`] attribute.
///
/// # Errors
///
/// Fails if the set has no mesh.
pub fn scatter_points(set: &mut GeometrySet, radius: f32) -> Result<()> {
    let mesh = set
        .get_component_for_read(GeometryComponentKind::Mesh)
        .context("scatter needs a mesh")?;
    let centers = mesh
        .attribute_try_get_for_read_on("position", AttributeDomain::Face)
        .and_then(|attribute| attribute.typed::<Vec3>())
        .context("face positions unavailable")?
        .to_vec();
    let uprightness = mesh
        .attribute_get_typed_for_read("normal", AttributeDomain::Face, Vec3::Z)
        .iter()
        .map(|normal| normal.z.abs())
        .collect::<Vec<_>>();

    set.replace_pointcloud(
        PointCloud::from_positions(centers, radius),
        GeometryOwnership::Owned,
    );
    let points = set.get_component_for_write(GeometryComponentKind::PointCloud);
    let mut density = points
        .attribute_try_ensure_for_write(DENSITY, AttributeDomain::Point, AttributeType::Float)
        .context("point cloud rejected the density attribute")?;
    for (index, value) in uprightness.into_iter().enumerate() {
        density.set(index, AttributeValue::Float(value));
    }
    info!(points = density.len(), "scattered points");
    Ok(())
}

/// Place an instance of `object` on each of the first `max` points, scaled
/// by the point radius.
pub fn instance_on_points(set: &mut GeometrySet, object: &Arc<Object>, max: usize) {
    let transforms: Vec<InstanceTransform> = set
        .get_pointcloud_for_read()
        .map(|cloud| {
            cloud
                .positions()
                .iter()
                .zip(cloud.radii())
                .take(max)
                .map(|(&position, &radius)| {
                    InstanceTransform::from_position(position).scaled(radius * 2.0)
                })
                .collect()
        })
        .unwrap_or_default();
    let instances = set.component_for_write::<InstancesComponent>();
    for (id, transform) in transforms.into_iter().enumerate() {
        instances.add_instance_with_id(object.clone(), transform, id as i32);
    }
    info!(
        instances = instances.instances_amount(),
        object = object.name(),
        "instanced object on points"
    );
}

/// What the demo prints at the end.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub components: String,
    pub vertices: usize,
    pub faces: usize,
    pub points: usize,
    pub instances: usize,
    pub mesh_attributes: Vec<String>,
    pub point_attributes: Vec<String>,
    pub bounds: Option<Bounds>,
    pub input_unchanged: bool,
}

/// Summarise `set`. `input_unchanged` reports whether the input set kept
/// its original component after the stages wrote to their copy.
#[must_use]
pub fn summarize(set: &GeometrySet, input_unchanged: bool) -> Summary {
    let sorted_names = |kind| {
        let mut names: Vec<String> = set
            .get_component_for_read(kind)
            .map(|component| component.attribute_names().into_iter().collect())
            .unwrap_or_default();
        names.sort();
        names
    };
    Summary {
        components: set.to_string(),
        vertices: set.get_mesh_for_read().map_or(0, |mesh| mesh.vertex_count()),
        faces: set.get_mesh_for_read().map_or(0, |mesh| mesh.face_count()),
        points: set.get_pointcloud_for_read().map_or(0, PointCloud::len),
        instances: set
            .component_for_read::<InstancesComponent>()
            .map_or(0, InstancesComponent::instances_amount),
        mesh_attributes: sorted_names(GeometryComponentKind::Mesh),
        point_attributes: sorted_names(GeometryComponentKind::PointCloud),
        bounds: set.compute_boundbox_without_instances(),
        input_unchanged,
    }
}
