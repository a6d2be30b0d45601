use crate::{
    build_batch_mesh, probe_voxelize, scatter_voxelize, voxelize, BatchMesh, CubeTemplate, Texture,
    Triangle,
};

use ilattice::glam::{Vec2, Vec3};

/// How cell occupancy is decided.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Strategy {
    /// Exact separating-axis rasterization of every triangle.
    #[default]
    Rasterize,
    /// Six-direction ray probing of grid sample points; see
    /// [`probe_voxelize`].
    RayProbe,
    /// Separating-axis rasterization into a bounded append buffer; see
    /// [`scatter_voxelize`].
    Scatter,
}

/// Input mesh collaborator: positions, triangle indices (stride 3), UVs
/// aligned with positions, and the source object's non-uniform scale.
#[derive(Clone, Debug)]
pub struct MeshBuffers {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub uvs: Vec<Vec2>,
    pub scale: Vec3,
}

impl Default for MeshBuffers {
    fn default() -> Self {
        Self {
            positions: Vec::new(),
            indices: Vec::new(),
            uvs: Vec::new(),
            scale: Vec3::ONE,
        }
    }
}

impl MeshBuffers {
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, uvs: Vec<Vec2>) -> Self {
        Self {
            positions,
            indices,
            uvs,
            scale: Vec3::ONE,
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Extracts the triangle list, applying `scale` to every position.
    ///
    /// Malformed input degrades instead of failing: a trailing partial index
    /// chunk is ignored, a triangle referencing a missing position is
    /// skipped, and a missing UV falls back to `(0, 0)`. An empty mesh is
    /// just zero triangles.
    pub fn triangles(&self) -> Vec<Triangle> {
        self.indices
            .chunks_exact(3)
            .filter_map(|chunk| {
                let mut points = [Vec3::ZERO; 3];
                let mut uvs = [Vec2::ZERO; 3];
                for (corner, &index) in chunk.iter().enumerate() {
                    let index = index as usize;
                    points[corner] = *self.positions.get(index)? * self.scale;
                    uvs[corner] = self.uvs.get(index).copied().unwrap_or(Vec2::ZERO);
                }
                Some(Triangle::new(points, uvs))
            })
            .collect()
    }
}

/// Tunable parameters for a voxelization run.
#[derive(Clone, Copy, Debug)]
pub struct VoxelizerConfig {
    /// Number of cells spanning the mesh's largest axis.
    pub grid_size: u32,
    /// Gap carved between neighboring cubes: each cube's edge is the cell
    /// pitch minus this.
    pub spacing: f32,
    pub strategy: Strategy,
}

impl Default for VoxelizerConfig {
    fn default() -> Self {
        Self {
            grid_size: 32,
            spacing: 0.0,
            strategy: Strategy::default(),
        }
    }
}

/// Runs the full pipeline: triangle extraction, voxelization with the
/// configured strategy, and batch mesh assembly.
///
/// `generate` returns the finished buffers synchronously; every run rebuilds
/// them from scratch and the previous run's mesh is whatever the caller still
/// holds. Nothing here caches state between runs, so two voxelizers (or two
/// meshes through one voxelizer) never share buffers.
#[derive(Clone, Copy, Debug, Default)]
pub struct Voxelizer {
    config: VoxelizerConfig,
}

impl Voxelizer {
    pub fn new(config: VoxelizerConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &VoxelizerConfig {
        &self.config
    }

    /// Voxelizes `mesh` and batches the result into one renderable mesh.
    ///
    /// An empty (or absent) mesh still builds: the result is an empty batch
    /// mesh, and whether to render it is the caller's decision.
    pub fn generate(&self, mesh: &MeshBuffers, texture: Option<&Texture>) -> BatchMesh {
        let triangles = mesh.triangles();
        let voxel_size = self.cell_pitch(&triangles);

        let cubes = match self.config.strategy {
            Strategy::Rasterize => voxelize(&triangles, voxel_size, texture).cube_data(voxel_size),
            Strategy::RayProbe => probe_voxelize(&triangles, voxel_size, texture),
            Strategy::Scatter => scatter_voxelize(&triangles, voxel_size, texture),
        };

        log::debug!(
            "generate: {} triangles -> {} cubes (pitch {voxel_size})",
            triangles.len(),
            cubes.len()
        );

        let template = CubeTemplate::with_edge_length(voxel_size - self.config.spacing);
        build_batch_mesh(&cubes, &template)
    }

    /// Cell pitch such that `grid_size` cells span the largest extent of the
    /// triangle list. Falls back to `1 / grid_size` for an empty list.
    fn cell_pitch(&self, triangles: &[Triangle]) -> f32 {
        let grid_size = self.config.grid_size.max(1) as f32;

        let Some(first) = triangles.first() else {
            return 1.0 / grid_size;
        };
        let (mut min, mut max) = first.aabb();
        for tri in &triangles[1..] {
            let (tri_min, tri_max) = tri.aabb();
            min = min.min(tri_min);
            max = max.max(tri_max);
        }

        let largest = (max - min).max_element();
        if largest > 0.0 {
            largest / grid_size
        } else {
            1.0 / grid_size
        }
    }
}
