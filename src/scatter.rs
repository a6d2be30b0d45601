use crate::{rasterize_triangle, CubeData, Texture, Triangle, TriangleVoxels};

use ndshape::{RuntimeShape, Shape};
use rayon::prelude::*;

/// How many output records the append buffer admits per grid cell. Shared
/// cells can be emitted once per touching triangle, so the bound is a
/// multiple of the cell count.
const RECORDS_PER_CELL_BOUND: u32 = 3;

/// Per-triangle scatter voxelization with a bounded output buffer.
///
/// Runs the same separating-axis rasterization as [`crate::voxelize`], but
/// each triangle appends its hits straight to the output with no cross
/// triangle deduplication, the way a device-side append buffer works. A cell
/// touched by several triangles therefore appears once per triangle.
///
/// The output is capped at `grid_volume * 3` records, computed from the mesh
/// bounds. A run that produces more is clamped to the cap with a warning;
/// nothing past the cap is ever written or read.
pub fn scatter_voxelize(
    triangles: &[Triangle],
    voxel_size: f32,
    texture: Option<&Texture>,
) -> Vec<CubeData> {
    let Some(shape) = grid_shape(triangles, voxel_size) else {
        return Vec::new();
    };
    let capacity = shape.size() as usize * RECORDS_PER_CELL_BOUND as usize;

    let mut cubes: Vec<CubeData> = triangles
        .par_iter()
        .flat_map_iter(|tri| {
            let mut local = TriangleVoxels::new();
            rasterize_triangle(tri, voxel_size, texture, &mut local);
            local
                .into_records()
                .into_iter()
                .map(move |(cell, record)| CubeData {
                    position: cell.min_corner(voxel_size),
                    uv: record.uv,
                    color: record.color,
                })
        })
        .collect();

    if cubes.len() > capacity {
        log::warn!(
            "scatter output clamped: {} records exceed the bound of {}",
            cubes.len(),
            capacity
        );
        cubes.truncate(capacity);
    }

    cubes
}

/// Cell grid covering the mesh bounds, `None` when there are no triangles.
fn grid_shape(triangles: &[Triangle], voxel_size: f32) -> Option<RuntimeShape<u32, 3>> {
    let (mut min, mut max) = triangles.first()?.aabb();
    for tri in &triangles[1..] {
        let (tri_min, tri_max) = tri.aabb();
        min = min.min(tri_min);
        max = max.max(tri_max);
    }

    let cells = ((max - min) / voxel_size)
        .ceil()
        .as_uvec3()
        .max(ilattice::glam::UVec3::ONE);

    Some(RuntimeShape::<u32, 3>::new(cells.to_array()))
}
