//! Moving attribute values between the domains of a mesh.
//!
//! Each conversion walks the mesh topology and feeds every (target, source)
//! element pair into an [`AttributeMixer`] with weight one. A target that
//! receives a single source takes its value unchanged; a target with several
//! sources gets their average.

use geometry_attribute::{AttributeData, AttributeDomain, AttributeMixer, AttributeSlice};
use tracing::trace;

use crate::mesh::Mesh;

/// Interpolate `values`, which live on `from`, onto `to`.
///
/// Returns `None` if either domain does not exist on a mesh or `values` does
/// not have one entry per element of `from`.
pub(crate) fn adapt_mesh_domain(
    mesh: &Mesh,
    values: AttributeSlice<'_>,
    from: AttributeDomain,
    to: AttributeDomain,
) -> Option<AttributeData> {
    use AttributeDomain::{Corner, Edge, Face, Instance, Point};

    if from == Instance || to == Instance || values.len() != mesh.domain_size(from) {
        return None;
    }
    trace!(%from, %to, len = values.len(), "interpolating mesh attribute");
    let data = match (from, to) {
        _ if from == to => values.to_data(),
        (Point, Corner) => mix(mesh, values, to, corner_vert_pairs(mesh)),
        (Corner, Point) => mix(mesh, values, to, corner_vert_pairs(mesh).map(swap)),
        (Point, Face) => mix(mesh, values, to, face_vert_pairs(mesh)),
        (Face, Point) => mix(mesh, values, to, face_vert_pairs(mesh).map(swap)),
        (Point, Edge) => mix(mesh, values, to, edge_vert_pairs(mesh)),
        (Edge, Point) => mix(mesh, values, to, edge_vert_pairs(mesh).map(swap)),
        (Face, Corner) => mix(mesh, values, to, face_corner_pairs(mesh).map(swap)),
        (Corner, Face) => mix(mesh, values, to, face_corner_pairs(mesh)),
        (Edge, Face) => mix(mesh, values, to, face_edge_pairs(mesh)),
        (Face, Edge) => mix(mesh, values, to, face_edge_pairs(mesh).map(swap)),
        (Corner, Edge) | (Edge, Corner) => {
            let points = adapt_mesh_domain(mesh, values, from, Point)?;
            return adapt_mesh_domain(mesh, points.as_slice(), Point, to);
        }
        _ => return None,
    };
    Some(data)
}

fn mix(
    mesh: &Mesh,
    values: AttributeSlice<'_>,
    to: AttributeDomain,
    pairs: impl Iterator<Item = (usize, usize)>,
) -> AttributeData {
    let mut mixer = AttributeMixer::new(values.data_type(), mesh.domain_size(to));
    for (target, source) in pairs {
        if let Some(value) = values.get(source) {
            mixer.mix_in(target, value, 1.0);
        }
    }
    mixer.finish()
}

fn swap((a, b): (usize, usize)) -> (usize, usize) {
    (b, a)
}

/// (corner, vertex) for every corner.
fn corner_vert_pairs(mesh: &Mesh) -> impl Iterator<Item = (usize, usize)> + '_ {
    mesh.corner_verts()
        .iter()
        .enumerate()
        .map(|(corner, &vert)| (corner, vert as usize))
}

/// (face, vertex) for every corner.
fn face_vert_pairs(mesh: &Mesh) -> impl Iterator<Item = (usize, usize)> + '_ {
    face_corner_pairs(mesh).map(|(face, corner)| (face, mesh.corner_verts()[corner] as usize))
}

/// (face, edge) for every corner.
fn face_edge_pairs(mesh: &Mesh) -> impl Iterator<Item = (usize, usize)> + '_ {
    face_corner_pairs(mesh).map(|(face, corner)| (face, mesh.corner_edges()[corner] as usize))
}

/// (face, corner) for every corner.
fn face_corner_pairs(mesh: &Mesh) -> impl Iterator<Item = (usize, usize)> + '_ {
    mesh.faces()
        .iter()
        .enumerate()
        .flat_map(|(face, f)| f.corners().map(move |corner| (face, corner)))
}

/// (edge, vertex) twice per edge.
fn edge_vert_pairs(mesh: &Mesh) -> impl Iterator<Item = (usize, usize)> + '_ {
    mesh.edges()
        .iter()
        .enumerate()
        .flat_map(|(edge, verts)| verts.iter().map(move |&vert| (edge, vert as usize)))
}

#[cfg(test)]
mod tests {
    use geometry_attribute::AttributeDomain::{Corner, Edge, Face, Instance, Point};
    use geometry_math::Vec3;

    use super::*;
    use crate::mesh::MeshBuilder;

    /// Two triangles sharing the edge 1-2.
    fn two_triangles() -> Mesh {
        let mut builder = MeshBuilder::new();
        for p in [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE] {
            builder.add_vertex(p);
        }
        builder.add_face(&[0, 1, 2]).unwrap();
        builder.add_face(&[1, 3, 2]).unwrap();
        builder.finish()
    }

    fn adapt(
        mesh: &Mesh,
        values: AttributeSlice<'_>,
        from: AttributeDomain,
        to: AttributeDomain,
    ) -> AttributeData {
        adapt_mesh_domain(mesh, values, from, to).unwrap()
    }

    fn floats(data: AttributeData) -> Vec<f32> {
        data.typed::<f32>().unwrap().to_vec()
    }

    #[test]
    fn test_point_to_face_averages_vertices() {
        let mesh = two_triangles();
        let values = [0.0_f32, 3.0, 6.0, 9.0];
        let data = adapt(&mesh, AttributeSlice::Float(&values), Point, Face);
        assert_eq!(floats(data), vec![3.0, 6.0]);
    }

    #[test]
    fn test_face_to_point_averages_faces() {
        let mesh = two_triangles();
        let values = [2.0_f32, 4.0];
        let data = adapt(&mesh, AttributeSlice::Float(&values), Face, Point);
        assert_eq!(floats(data), vec![2.0, 3.0, 3.0, 4.0]);
    }

    #[test]
    fn test_point_to_corner_copies() {
        let mesh = two_triangles();
        let values = [1_i32, 2, 3, 4];
        let data = adapt(&mesh, AttributeSlice::Int32(&values), Point, Corner);
        assert_eq!(data, AttributeData::Int32(vec![1, 2, 3, 2, 4, 3]));
    }

    #[test]
    fn test_edge_round_trip_through_points() {
        let mesh = two_triangles();
        let values = [0.0_f32, 2.0, 2.0, 4.0];
        let edges = adapt(&mesh, AttributeSlice::Float(&values), Point, Edge);
        assert_eq!(edges.len(), mesh.edge_count());
        // Edge 0 connects vertices 0 and 1.
        assert_eq!(edges.get(0), Some(1.0_f32.into()));
    }

    #[test]
    fn test_edge_to_face_uses_corner_edges() {
        let mesh = two_triangles();
        let mut values = vec![0.0_f32; mesh.edge_count()];
        // The shared edge.
        let shared = mesh.corner_edges()[1] as usize;
        values[shared] = 3.0;
        let data = adapt(&mesh, AttributeSlice::Float(&values), Edge, Face);
        assert_eq!(floats(data), vec![1.0, 1.0]);
    }

    #[test]
    fn test_corner_to_edge_goes_through_points() {
        let mesh = two_triangles();
        let values = vec![true; mesh.corner_count()];
        let data = adapt(&mesh, AttributeSlice::Boolean(&values), Corner, Edge);
        assert_eq!(data, AttributeData::Boolean(vec![true; mesh.edge_count()]));
    }

    #[test]
    fn test_rejects_wrong_length_and_instance_domain() {
        let mesh = two_triangles();
        let values = [1.0_f32];
        let adapted = adapt_mesh_domain(&mesh, AttributeSlice::Float(&values), Point, Face);
        assert!(adapted.is_none());
        let values = [1.0_f32; 4];
        let adapted = adapt_mesh_domain(&mesh, AttributeSlice::Float(&values), Point, Instance);
        assert!(adapted.is_none());
    }

    #[test]
    fn test_loose_vertex_gets_default() {
        let mut builder = MeshBuilder::new();
        for p in [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z] {
            builder.add_vertex(p);
        }
        builder.add_face(&[0, 1, 2]).unwrap();
        let mesh = builder.finish();
        let values = [5.0_f32];
        let data = adapt(&mesh, AttributeSlice::Float(&values), Face, Point);
        assert_eq!(floats(data), vec![5.0, 5.0, 5.0, 0.0]);
    }
}
