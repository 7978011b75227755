//! Procedural mesh primitives.

use geometry_math::Vec3;

use crate::mesh::{Mesh, MeshBuilder};

/// A flat grid in the XY plane centred on the origin, with `verts_x` by
/// `verts_y` vertices and quad faces.
///
/// Fewer than two vertices along either axis gives an empty mesh.
#[must_use]
pub fn grid(size_x: f32, size_y: f32, verts_x: u32, verts_y: u32) -> Mesh {
    grid_builder(size_x, size_y, verts_x, verts_y).finish()
}

/// Like [`grid`], returning the builder so callers can add vertex groups or
/// attributes before finishing.
#[must_use]
pub fn grid_builder(size_x: f32, size_y: f32, verts_x: u32, verts_y: u32) -> MeshBuilder {
    let mut builder = MeshBuilder::new();
    if verts_x < 2 || verts_y < 2 {
        return builder;
    }
    let step_x = size_x / (verts_x - 1) as f32;
    let step_y = size_y / (verts_y - 1) as f32;
    let origin = Vec3::new(-size_x * 0.5, -size_y * 0.5, 0.0);
    for y in 0..verts_y {
        for x in 0..verts_x {
            builder.add_vertex(origin + Vec3::new(x as f32 * step_x, y as f32 * step_y, 0.0));
        }
    }
    for y in 0..verts_y - 1 {
        for x in 0..verts_x - 1 {
            let v = y * verts_x + x;
            builder.add_face_unchecked(&[v, v + 1, v + 1 + verts_x, v + verts_x]);
        }
    }
    builder
}

/// An axis-aligned cube of edge length `size` centred on the origin, with
/// outward-facing quads.
#[must_use]
pub fn cube(size: f32) -> Mesh {
    let half = size * 0.5;
    let mut builder = MeshBuilder::new();
    for z in [-half, half] {
        for y in [-half, half] {
            for x in [-half, half] {
                builder.add_vertex(Vec3::new(x, y, z));
            }
        }
    }
    // Vertex index bits are x | y << 1 | z << 2.
    const FACES: [[u32; 4]; 6] = [
        [0, 2, 3, 1],
        [4, 5, 7, 6],
        [0, 1, 5, 4],
        [2, 6, 7, 3],
        [0, 4, 6, 2],
        [1, 3, 7, 5],
    ];
    for face in &FACES {
        builder.add_face_unchecked(face);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_counts() {
        let mesh = grid(2.0, 2.0, 3, 4);
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.corner_count(), 24);
        // 2 * 4 horizontal + 3 * 3 vertical
        assert_eq!(mesh.edge_count(), 17);
    }

    #[test]
    fn test_grid_is_centred() {
        let bounds = grid(2.0, 4.0, 5, 5).bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_degenerate_grid_is_empty() {
        assert!(grid(1.0, 1.0, 1, 8).is_empty());
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let mesh = cube(2.0);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.edge_count(), 12);
        assert_eq!(mesh.face_count(), 6);
        for face in 0..mesh.face_count() {
            let center = mesh.face_center(face);
            assert!(mesh.face_normal(face).dot(center) > 0.0);
        }
    }
}
