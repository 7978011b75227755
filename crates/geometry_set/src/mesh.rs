//! Polygon mesh storage and its construction-phase builder.
//!
//! A [`Mesh`] stores its elements in flat arrays:
//!
//! - vertex positions (Point domain)
//! - edges as vertex index pairs (Edge domain)
//! - faces as ranges into the corner arrays (Face domain)
//! - per-corner vertex and edge indices (Corner domain)
//!
//! Topology is only created through [`MeshBuilder`]. Once built, outside
//! code changes a mesh through the attribute API or the value mutators here.

use std::collections::HashMap;
use std::ops::Range;

use geometry_attribute::{AttributeData, AttributeDomain, AttributeStorage};
use geometry_math::{Bounds, Vec3};
use tracing::debug;

pub(crate) const POSITION: &str = "position";
pub(crate) const NORMAL: &str = "normal";
pub(crate) const SHADE_SMOOTH: &str = "shade_smooth";
pub(crate) const CREASE: &str = "crease";

/// Attribute names served from the mesh's own arrays.
pub(crate) const BUILTIN_ATTRIBUTES: [&str; 4] = [POSITION, NORMAL, SHADE_SMOOTH, CREASE];

/// A face, stored as a contiguous range of corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub corner_start: usize,
    pub corner_count: usize,
}

impl Face {
    #[must_use]
    pub fn corners(&self) -> Range<usize> {
        self.corner_start..self.corner_start + self.corner_count
    }
}

/// The weight of one vertex in one vertex group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeformWeight {
    pub group: u32,
    pub weight: f32,
}

/// The vertex group weights of one vertex. Groups the vertex is not part of
/// are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeformVert {
    pub weights: Vec<DeformWeight>,
}

impl DeformVert {
    /// The weight in `group`, zero if the vertex is not in the group.
    #[must_use]
    pub fn weight(&self, group: u32) -> f32 {
        self.weights
            .iter()
            .find(|w| w.group == group)
            .map_or(0.0, |w| w.weight)
    }

    /// Set the weight in `group`, adding the vertex to the group if needed.
    pub fn set_weight(&mut self, group: u32, weight: f32) {
        match self.weights.iter_mut().find(|w| w.group == group) {
            Some(entry) => entry.weight = weight,
            None => self.weights.push(DeformWeight { group, weight }),
        }
    }

    /// Drop `group` and shift the indices of later groups down by one.
    pub fn remove_group(&mut self, group: u32) {
        self.weights.retain(|w| w.group != group);
        for entry in &mut self.weights {
            if entry.group > group {
                entry.group -= 1;
            }
        }
    }
}

/// A polygon mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    positions: Vec<Vec3>,
    edges: Vec<[u32; 2]>,
    faces: Vec<Face>,
    corner_verts: Vec<u32>,
    corner_edges: Vec<u32>,
    shade_smooth: Vec<bool>,
    creases: Vec<f32>,
    /// Empty when no vertex has any group weight, otherwise one entry per
    /// vertex.
    deform_verts: Vec<DeformVert>,
    attributes: AttributeStorage,
}

impl Mesh {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[must_use]
    pub fn corner_count(&self) -> usize {
        self.corner_verts.len()
    }

    /// Returns `true` if the mesh has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of elements in `domain`. Zero for domains a mesh does not have.
    #[must_use]
    pub fn domain_size(&self, domain: AttributeDomain) -> usize {
        match domain {
            AttributeDomain::Point => self.vertex_count(),
            AttributeDomain::Edge => self.edge_count(),
            AttributeDomain::Corner => self.corner_count(),
            AttributeDomain::Face => self.face_count(),
            AttributeDomain::Instance => 0,
        }
    }

    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    #[must_use]
    pub fn edges(&self) -> &[[u32; 2]] {
        &self.edges
    }

    #[must_use]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    #[must_use]
    pub fn corner_verts(&self) -> &[u32] {
        &self.corner_verts
    }

    #[must_use]
    pub fn corner_edges(&self) -> &[u32] {
        &self.corner_edges
    }

    /// Vertex indices of the face at `face`, in winding order.
    #[must_use]
    pub fn face_verts(&self, face: usize) -> &[u32] {
        &self.corner_verts[self.faces[face].corners()]
    }

    #[must_use]
    pub fn shade_smooth(&self) -> &[bool] {
        &self.shade_smooth
    }

    pub fn shade_smooth_mut(&mut self) -> &mut [bool] {
        &mut self.shade_smooth
    }

    #[must_use]
    pub fn creases(&self) -> &[f32] {
        &self.creases
    }

    pub fn creases_mut(&mut self) -> &mut [f32] {
        &mut self.creases
    }

    #[must_use]
    pub fn deform_verts(&self) -> &[DeformVert] {
        &self.deform_verts
    }

    /// Mutable deform weights, allocated for every vertex on first use.
    pub fn deform_verts_mut(&mut self) -> &mut [DeformVert] {
        if self.deform_verts.len() != self.positions.len() {
            self.deform_verts
                .resize_with(self.positions.len(), DeformVert::default);
        }
        &mut self.deform_verts
    }

    /// Drop vertex group `group` from every vertex and shift the indices of
    /// later groups down by one.
    pub fn remove_vertex_group(&mut self, group: u32) {
        for vert in &mut self.deform_verts {
            vert.remove_group(group);
        }
    }

    #[must_use]
    pub fn attributes(&self) -> &AttributeStorage {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeStorage {
        &mut self.attributes
    }

    /// The normal of a face, computed with Newell's method so that
    /// non-planar polygons get a stable average. Degenerate faces return
    /// zero.
    #[must_use]
    pub fn face_normal(&self, face: usize) -> Vec3 {
        let verts = self.face_verts(face);
        let mut normal = Vec3::ZERO;
        for (i, &v) in verts.iter().enumerate() {
            let current = self.positions[v as usize];
            let next = self.positions[verts[(i + 1) % verts.len()] as usize];
            normal.x += (current.y - next.y) * (current.z + next.z);
            normal.y += (current.z - next.z) * (current.x + next.x);
            normal.z += (current.x - next.x) * (current.y + next.y);
        }
        normal.normalize_or_zero()
    }

    #[must_use]
    pub fn face_normals(&self) -> Vec<Vec3> {
        (0..self.face_count()).map(|f| self.face_normal(f)).collect()
    }

    /// Average of the face's vertex positions.
    #[must_use]
    pub fn face_center(&self, face: usize) -> Vec3 {
        let verts = self.face_verts(face);
        let sum: Vec3 = verts.iter().map(|&v| self.positions[v as usize]).sum();
        sum / verts.len() as f32
    }

    /// Bounds of all vertex positions, `None` for a mesh without vertices.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.positions.iter().copied())
    }
}

/// Reasons a [`MeshBuilder`] rejects input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshBuildError {
    #[error("vertex index {index} out of range for {count} vertices")]
    VertexOutOfRange { index: u32, count: usize },

    #[error("face needs at least 3 corners, got {0}")]
    TooFewCorners(usize),

    #[error("vertex {0} is used twice by the same face or edge")]
    RepeatedVertex(u32),

    #[error("face index {index} out of range for {count} faces")]
    FaceOutOfRange { index: usize, count: usize },

    #[error("edge index {index} out of range for {count} edges")]
    EdgeOutOfRange { index: usize, count: usize },

    #[error("vertex group index {index} out of range for {count} groups")]
    GroupOutOfRange { index: u32, count: usize },

    #[error("attribute name '{0}' is taken by a builtin or a vertex group")]
    ReservedName(String),

    #[error("attribute '{name}' has {actual} values, expected {expected}")]
    AttributeLength {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// Mutator for a mesh under construction.
///
/// Edges are created implicitly by faces and shared between faces that use
/// the same vertex pair.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    mesh: Mesh,
    edge_lookup: HashMap<(u32, u32), u32>,
    vertex_groups: Vec<String>,
}

impl MeshBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, position: Vec3) -> u32 {
        self.mesh.positions.push(position);
        (self.mesh.positions.len() - 1) as u32
    }

    /// Return the edge between `a` and `b`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Fails if either vertex does not exist or `a == b`.
    pub fn add_edge(&mut self, a: u32, b: u32) -> Result<u32, MeshBuildError> {
        self.check_vertex(a)?;
        self.check_vertex(b)?;
        if a == b {
            return Err(MeshBuildError::RepeatedVertex(a));
        }
        Ok(self.ensure_edge(a, b))
    }

    /// Append a face through `verts` in winding order and return its index.
    ///
    /// # Errors
    ///
    /// Fails if the face has fewer than three corners, references a missing
    /// vertex, or uses a vertex twice.
    pub fn add_face(&mut self, verts: &[u32]) -> Result<usize, MeshBuildError> {
        if verts.len() < 3 {
            return Err(MeshBuildError::TooFewCorners(verts.len()));
        }
        for (i, &v) in verts.iter().enumerate() {
            self.check_vertex(v)?;
            if verts[..i].contains(&v) {
                return Err(MeshBuildError::RepeatedVertex(v));
            }
        }
        Ok(self.add_face_unchecked(verts))
    }

    /// Append a face whose indices are known to be valid.
    pub(crate) fn add_face_unchecked(&mut self, verts: &[u32]) -> usize {
        let corner_start = self.mesh.corner_verts.len();
        for (i, &v) in verts.iter().enumerate() {
            let next = verts[(i + 1) % verts.len()];
            let edge = self.ensure_edge(v, next);
            self.mesh.corner_verts.push(v);
            self.mesh.corner_edges.push(edge);
        }
        self.mesh.faces.push(Face {
            corner_start,
            corner_count: verts.len(),
        });
        self.mesh.shade_smooth.push(false);
        self.mesh.faces.len() - 1
    }

    /// Mark a face as smooth shaded.
    ///
    /// # Errors
    ///
    /// Fails if the face does not exist.
    pub fn set_shade_smooth(&mut self, face: usize, smooth: bool) -> Result<(), MeshBuildError> {
        let count = self.mesh.shade_smooth.len();
        let slot = self
            .mesh
            .shade_smooth
            .get_mut(face)
            .ok_or(MeshBuildError::FaceOutOfRange { index: face, count })?;
        *slot = smooth;
        Ok(())
    }

    /// Set the subdivision crease of an edge.
    ///
    /// # Errors
    ///
    /// Fails if the edge does not exist.
    pub fn set_crease(&mut self, edge: u32, crease: f32) -> Result<(), MeshBuildError> {
        let count = self.mesh.creases.len();
        let slot = self
            .mesh
            .creases
            .get_mut(edge as usize)
            .ok_or(MeshBuildError::EdgeOutOfRange {
                index: edge as usize,
                count,
            })?;
        *slot = crease.clamp(0.0, 1.0);
        Ok(())
    }

    /// Return the index of the named vertex group, creating it if needed.
    pub fn vertex_group(&mut self, name: &str) -> u32 {
        match self.vertex_groups.iter().position(|g| g == name) {
            Some(index) => index as u32,
            None => {
                self.vertex_groups.push(name.to_string());
                (self.vertex_groups.len() - 1) as u32
            }
        }
    }

    /// Give `vertex` a weight in `group`.
    ///
    /// # Errors
    ///
    /// Fails if the vertex or the group does not exist.
    pub fn assign_to_group(
        &mut self,
        vertex: u32,
        group: u32,
        weight: f32,
    ) -> Result<(), MeshBuildError> {
        self.check_vertex(vertex)?;
        if group as usize >= self.vertex_groups.len() {
            return Err(MeshBuildError::GroupOutOfRange {
                index: group,
                count: self.vertex_groups.len(),
            });
        }
        self.mesh.deform_verts_mut()[vertex as usize].set_weight(group, weight);
        Ok(())
    }

    /// Attach a custom attribute column. Its length must match the current
    /// size of `domain`, so add attributes after the topology.
    ///
    /// # Errors
    ///
    /// Fails if the column length does not match, or if the name belongs to
    /// a builtin attribute or a vertex group.
    pub fn add_attribute(
        &mut self,
        name: impl Into<String>,
        domain: AttributeDomain,
        data: AttributeData,
    ) -> Result<(), MeshBuildError> {
        let name = name.into();
        if BUILTIN_ATTRIBUTES.contains(&name.as_str()) || self.vertex_groups.contains(&name) {
            return Err(MeshBuildError::ReservedName(name));
        }
        let expected = self.mesh.domain_size(domain);
        if data.len() != expected {
            return Err(MeshBuildError::AttributeLength {
                name,
                expected,
                actual: data.len(),
            });
        }
        self.mesh.attributes.insert(name, domain, data);
        Ok(())
    }

    /// Positions of the vertices added so far.
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.mesh.positions
    }

    /// Names of the vertex groups created so far, in index order.
    #[must_use]
    pub fn vertex_group_names(&self) -> &[String] {
        &self.vertex_groups
    }

    #[must_use]
    pub fn finish(self) -> Mesh {
        self.finish_with_vertex_groups().0
    }

    /// Finish the mesh and hand back the vertex group names alongside it.
    #[must_use]
    pub fn finish_with_vertex_groups(mut self) -> (Mesh, Vec<String>) {
        if !self.mesh.deform_verts.is_empty() {
            let count = self.mesh.positions.len();
            self.mesh.deform_verts.resize_with(count, DeformVert::default);
        }
        for domain in [
            AttributeDomain::Point,
            AttributeDomain::Edge,
            AttributeDomain::Corner,
            AttributeDomain::Face,
        ] {
            let len = self.mesh.domain_size(domain);
            self.mesh.attributes.resize_domain(domain, len);
        }
        debug!(
            vertices = self.mesh.vertex_count(),
            edges = self.mesh.edge_count(),
            faces = self.mesh.face_count(),
            vertex_groups = self.vertex_groups.len(),
            "mesh built"
        );
        (self.mesh, self.vertex_groups)
    }

    fn check_vertex(&self, index: u32) -> Result<(), MeshBuildError> {
        let count = self.mesh.positions.len();
        if index as usize >= count {
            return Err(MeshBuildError::VertexOutOfRange { index, count });
        }
        Ok(())
    }

    fn ensure_edge(&mut self, a: u32, b: u32) -> u32 {
        let key = (a.min(b), a.max(b));
        if let Some(&edge) = self.edge_lookup.get(&key) {
            return edge;
        }
        let edge = self.mesh.edges.len() as u32;
        self.mesh.edges.push([a, b]);
        self.mesh.creases.push(0.0);
        self.edge_lookup.insert(key, edge);
        edge
    }
}
