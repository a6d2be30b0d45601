use crate::Rgba;

use ilattice::glam::{Vec2, Vec3};
use rayon::prelude::*;

/// Vertices per cube in the batched mesh (4 per face, so faces can carry flat
/// normals).
pub const VERTS_PER_CUBE: usize = 24;
/// Indices per cube in the batched mesh (2 triangles per face).
pub const INDICES_PER_CUBE: usize = 36;

/// Position, UV, and color for one cube of the batch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CubeData {
    pub position: Vec3,
    pub uv: Vec2,
    pub color: Rgba,
}

/// One vertex of the batched output mesh.
///
/// The field order is the vertex layout handed to the renderer: position and
/// normal as 3 floats, tangent as 4 floats, color as 4 unorm bytes, then two
/// UV channels. All 24 vertices of a cube share that cube's color and first
/// UV; tangents and the second UV channel are zeroed.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CubeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tangent: [f32; 4],
    pub color: Rgba,
    pub uv0: [f32; 2],
    pub uv1: [f32; 2],
}

/// The unit-cube geometry shared by every cube in one batch: 24 vertices, 24
/// flat normals, 36 indices.
///
/// A template is an immutable value built for one edge length and passed to
/// [`build_batch_mesh`]; concurrent builds with different sizes just use
/// different templates.
pub struct CubeTemplate {
    vertices: [Vec3; VERTS_PER_CUBE],
    normals: [Vec3; VERTS_PER_CUBE],
    indices: [u32; INDICES_PER_CUBE],
}

/// Corner indices of each face, in bottom/left/front/back/right/top order.
const FACE_CORNERS: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [7, 4, 0, 3],
    [4, 5, 1, 0],
    [6, 7, 3, 2],
    [5, 6, 2, 1],
    [7, 6, 5, 4],
];

const FACE_NORMALS: [Vec3; 6] = [
    Vec3::new(0.0, -1.0, 0.0),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(0.0, 0.0, -1.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
];

/// Two triangles per face, as offsets into that face's 4 corners.
const FACE_INDICES: [u32; 6] = [3, 1, 0, 3, 2, 1];

impl CubeTemplate {
    /// Builds the template for a cube of the given edge length, centered on
    /// the origin.
    pub fn with_edge_length(edge: f32) -> Self {
        let h = edge * 0.5;
        let corners = [
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, -h, -h),
            Vec3::new(-h, -h, -h),
            Vec3::new(-h, h, h),
            Vec3::new(h, h, h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
        ];

        let mut vertices = [Vec3::ZERO; VERTS_PER_CUBE];
        let mut normals = [Vec3::ZERO; VERTS_PER_CUBE];
        let mut indices = [0u32; INDICES_PER_CUBE];

        for (face, face_corners) in FACE_CORNERS.iter().enumerate() {
            for (j, &corner) in face_corners.iter().enumerate() {
                vertices[face * 4 + j] = corners[corner];
                normals[face * 4 + j] = FACE_NORMALS[face];
            }
            for (k, &offset) in FACE_INDICES.iter().enumerate() {
                indices[face * 6 + k] = face as u32 * 4 + offset;
            }
        }

        Self {
            vertices,
            normals,
            indices,
        }
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec3; VERTS_PER_CUBE] {
        &self.vertices
    }

    #[inline]
    pub fn normals(&self) -> &[Vec3; VERTS_PER_CUBE] {
        &self.normals
    }

    #[inline]
    pub fn indices(&self) -> &[u32; INDICES_PER_CUBE] {
        &self.indices
    }
}

/// The batched output mesh: one vertex buffer and one 32-bit index buffer
/// covering every cube, drawn as a single triangle-list submesh.
#[derive(Clone, Debug, Default)]
pub struct BatchMesh {
    pub vertices: Vec<CubeVertex>,
    pub indices: Vec<u32>,
}

impl BatchMesh {
    #[inline]
    pub fn num_cubes(&self) -> usize {
        self.vertices.len() / VERTS_PER_CUBE
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Assembles the batched mesh for an ordered cube list.
///
/// Vertex `24 * i + j` is template vertex `j` translated by cube `i`'s
/// position; index `36 * i + k` is template index `k` plus `24 * i`. Cubes
/// are independent, so both buffers are filled in parallel. Zero cubes
/// produce empty buffers, which is a valid (invisible) mesh, not an error.
pub fn build_batch_mesh(cubes: &[CubeData], template: &CubeTemplate) -> BatchMesh {
    let vertices = cubes
        .par_iter()
        .flat_map_iter(|cube| {
            (0..VERTS_PER_CUBE).map(move |j| CubeVertex {
                position: (cube.position + template.vertices[j]).to_array(),
                normal: template.normals[j].to_array(),
                tangent: [0.0; 4],
                color: cube.color,
                uv0: cube.uv.to_array(),
                uv1: [0.0; 2],
            })
        })
        .collect();

    let indices = cubes
        .par_iter()
        .enumerate()
        .flat_map_iter(|(i, _)| {
            let base = (i * VERTS_PER_CUBE) as u32;
            template.indices.iter().map(move |&index| index + base)
        })
        .collect();

    BatchMesh { vertices, indices }
}
