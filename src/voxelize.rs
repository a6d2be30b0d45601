use crate::{rasterize_triangle, CubeData, Texture, Triangle, TriangleVoxels, VoxelCell, VoxelRecord};

use hashbrown::HashSet;
use rayon::prelude::*;

/// The global set of occupied cells, merged from per-triangle results.
///
/// Membership is unique (no cell ever has two records) and iteration order is
/// merge-insertion order, so the set fully determines the cube list handed to
/// the batch builder.
#[derive(Default)]
pub struct VoxelSet {
    records: Vec<(VoxelCell, VoxelRecord)>,
    occupied: HashSet<VoxelCell>,
}

impl VoxelSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn contains(&self, cell: VoxelCell) -> bool {
        self.occupied.contains(&cell)
    }

    #[inline]
    pub fn records(&self) -> &[(VoxelCell, VoxelRecord)] {
        &self.records
    }

    /// Merges one triangle's local results into the set.
    ///
    /// Cell membership is a plain union, but the record kept for a cell is
    /// whichever merge got there first. Callers that want deterministic
    /// output must merge in a fixed order; [`voxelize`] always merges in
    /// ascending triangle order.
    pub fn merge(&mut self, local: TriangleVoxels) {
        for (cell, record) in local.into_records() {
            if self.occupied.insert(cell) {
                self.records.push((cell, record));
            }
        }
    }

    /// Emits one [`CubeData`] per occupied cell, in merge-insertion order.
    /// Cube positions are the cells' minimum corners.
    pub fn cube_data(&self, voxel_size: f32) -> Vec<CubeData> {
        self.records
            .iter()
            .map(|(cell, record)| CubeData {
                position: cell.min_corner(voxel_size),
                uv: record.uv,
                color: record.color,
            })
            .collect()
    }
}

/// Voxelizes a triangle list: rasterizes every triangle in parallel, then
/// merges the local results sequentially in ascending triangle order.
///
/// The two phases make a fork/join barrier: rasterization touches no shared
/// state, and the merge alone upholds the one-record-per-cell invariant.
/// Identical input always produces an identical set. An empty triangle list
/// produces an empty set, not an error.
pub fn voxelize(triangles: &[Triangle], voxel_size: f32, texture: Option<&Texture>) -> VoxelSet {
    let locals: Vec<TriangleVoxels> = triangles
        .par_iter()
        .map(|tri| {
            let mut local = TriangleVoxels::new();
            rasterize_triangle(tri, voxel_size, texture, &mut local);
            local
        })
        .collect();

    let mut set = VoxelSet::new();
    for local in locals {
        set.merge(local);
    }

    log::debug!(
        "voxelized {} triangles into {} cells at pitch {}",
        triangles.len(),
        set.len(),
        voxel_size
    );

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rgba, Texture};
    use ilattice::glam::{IVec3, Vec2, Vec3};

    fn tri(points: [Vec3; 3], uv: Vec2) -> Triangle {
        Triangle::new(points, [uv; 3])
    }

    fn quad_triangles() -> Vec<Triangle> {
        // Two triangles sharing the diagonal of the unit square at z = 0.
        let a = Vec3::ZERO;
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(1.0, 1.0, 0.0);
        let d = Vec3::new(0.0, 1.0, 0.0);
        vec![
            // Constant UVs pointing at opposite texels, so the winning
            // triangle is visible in the sampled color.
            tri([a, b, c], Vec2::new(0.0, 0.0)),
            tri([a, c, d], Vec2::new(1.0, 1.0)),
        ]
    }

    #[test]
    fn empty_input_yields_empty_set() {
        let set = voxelize(&[], 1.0, None);
        assert!(set.is_empty());
        assert!(set.cube_data(1.0).is_empty());
    }

    #[test]
    fn no_duplicate_cells_after_merge() {
        let set = voxelize(&quad_triangles(), 0.25, None);

        let mut seen = HashSet::new();
        for (cell, _) in set.records() {
            assert!(seen.insert(*cell), "duplicate cell {cell:?}");
        }
    }

    #[test]
    fn first_merged_triangle_wins_shared_cells() {
        let red = Rgba::new(255, 0, 0, 255);
        let blue = Rgba::new(0, 0, 255, 255);
        let pixels = [red, red, blue, blue];
        let texture = Texture::new(&pixels, 2, 2);

        // Both triangles overlap the same cells; uv (0,0) samples the red
        // row, uv (1,1) the blue row.
        let set = voxelize(&quad_triangles(), 1.0, Some(&texture));

        let origin = VoxelCell(IVec3::ZERO);
        assert!(set.contains(origin));
        let record = set
            .records()
            .iter()
            .find(|(cell, _)| *cell == origin)
            .map(|(_, record)| record)
            .unwrap();
        assert_eq!(record.color, red);
    }

    #[test]
    fn reruns_are_identical() {
        let triangles = quad_triangles();
        let a = voxelize(&triangles, 0.2, None);
        let b = voxelize(&triangles, 0.2, None);

        assert_eq!(a.records(), b.records());
        assert_eq!(a.cube_data(0.2), b.cube_data(0.2));
    }

    #[test]
    fn cube_positions_are_cell_corners() {
        let set = voxelize(&quad_triangles(), 0.5, None);
        let cubes = set.cube_data(0.5);

        assert_eq!(cubes.len(), set.len());
        for ((cell, _), cube) in set.records().iter().zip(&cubes) {
            assert_eq!(cube.position, cell.0.as_vec3() * 0.5);
        }
    }
}
