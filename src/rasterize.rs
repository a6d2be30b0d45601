use crate::{bilinear_sample, triangle_intersects_cube, Rgba, Texture, Triangle};

use hashbrown::HashSet;
use ilattice::glam::{IVec3, Vec2, Vec3};

/// Key of one cell in the voxel grid of pitch `voxel_size`.
///
/// Equality and hashing are purely on the integer coordinates.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct VoxelCell(pub IVec3);

impl VoxelCell {
    /// The cell containing `point`.
    #[inline]
    pub fn containing(point: Vec3, voxel_size: f32) -> Self {
        Self((point / voxel_size).floor().as_ivec3())
    }

    /// World position of the cell's center.
    #[inline]
    pub fn center(self, voxel_size: f32) -> Vec3 {
        (self.0.as_vec3() + Vec3::splat(0.5)) * voxel_size
    }

    /// World position of the cell's minimum corner, `idx * voxel_size` per
    /// axis. This is where cube geometry for the cell gets anchored.
    #[inline]
    pub fn min_corner(self, voxel_size: f32) -> Vec3 {
        self.0.as_vec3() * voxel_size
    }
}

/// Color and UV assigned to an occupied cell by the first triangle that
/// claimed it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelRecord {
    pub color: Rgba,
    pub uv: Vec2,
}

/// One triangle's rasterization output: occupied cells with their records, in
/// insertion order.
///
/// Insertion is set-gated: the first record for a cell wins and later inserts
/// for the same cell are no-ops. The buffer can be reused between calls to
/// avoid reallocations.
#[derive(Default)]
pub struct TriangleVoxels {
    records: Vec<(VoxelCell, VoxelRecord)>,
    occupied: HashSet<VoxelCell>,
}

impl TriangleVoxels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the buffer.
    pub fn reset(&mut self) {
        self.records.clear();
        self.occupied.clear();
    }

    /// Inserts a record for `cell` unless one exists. Returns whether the
    /// cell was newly added.
    #[inline]
    pub fn insert(&mut self, cell: VoxelCell, record: VoxelRecord) -> bool {
        let added = self.occupied.insert(cell);
        if added {
            self.records.push((cell, record));
        }
        added
    }

    #[inline]
    pub fn contains(&self, cell: VoxelCell) -> bool {
        self.occupied.contains(&cell)
    }

    /// Records in insertion order.
    #[inline]
    pub fn records(&self) -> &[(VoxelCell, VoxelRecord)] {
        &self.records
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consumes the buffer, yielding the records in insertion order.
    pub fn into_records(self) -> Vec<(VoxelCell, VoxelRecord)> {
        self.records
    }
}

/// Rasterizes one triangle into voxel cells, appending to `output`.
///
/// Every cell in the triangle's bounding box (inclusive index range, x-outer /
/// y-middle / z-inner) is tested with the separating-axis test; each hit gets
/// its color and UV from a single sample at the cell center, interpolated with
/// barycentric weights.
///
/// A triangle that intersects no candidate cell still contributes: its
/// centroid's cell is force-inserted with a sample taken at the centroid, even
/// though that cell did not pass the intersection test. Coverage wins over
/// exactness for sub-voxel triangles; no triangle is silently dropped.
pub fn rasterize_triangle(
    tri: &Triangle,
    voxel_size: f32,
    texture: Option<&Texture>,
    output: &mut TriangleVoxels,
) {
    let (min, max) = tri.aabb();
    let min_idx = (min / voxel_size).floor().as_ivec3();
    let max_idx = (max / voxel_size).floor().as_ivec3();

    let mut hit = false;
    for x in min_idx.x..=max_idx.x {
        for y in min_idx.y..=max_idx.y {
            for z in min_idx.z..=max_idx.z {
                let cell = VoxelCell(IVec3::new(x, y, z));
                let center = cell.center(voxel_size);

                if !triangle_intersects_cube(tri, center, voxel_size) {
                    continue;
                }

                if output.insert(cell, sample_record(tri, center, texture)) {
                    hit = true;
                }
            }
        }
    }

    if !hit {
        let centroid = tri.centroid();
        let cell = VoxelCell::containing(centroid, voxel_size);
        output.insert(cell, sample_record(tri, centroid, texture));
    }
}

/// Color/UV sample for `tri` at `point`, via barycentric interpolation of the
/// corner UVs.
fn sample_record(tri: &Triangle, point: Vec3, texture: Option<&Texture>) -> VoxelRecord {
    let bary = tri.barycentric(point);
    let uv = tri.interpolate_uv(bary);
    let color = bilinear_sample(uv, texture);

    VoxelRecord { color, uv }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            [
                Vec3::ZERO,
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            [Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
        )
    }

    #[test]
    fn unit_triangle_occupies_its_cell() {
        let mut output = TriangleVoxels::new();
        rasterize_triangle(&unit_triangle(), 1.0, None, &mut output);

        assert!(!output.is_empty());
        assert!(output.contains(VoxelCell(IVec3::ZERO)));
        // No texture: every record samples opaque white.
        for (_, record) in output.records() {
            assert_eq!(record.color, Rgba::WHITE);
        }
    }

    #[test]
    fn records_have_no_duplicate_cells() {
        let mut output = TriangleVoxels::new();
        rasterize_triangle(&unit_triangle(), 0.25, None, &mut output);

        let mut seen = HashSet::new();
        for (cell, _) in output.records() {
            assert!(seen.insert(*cell), "duplicate cell {cell:?}");
        }
    }

    #[test]
    fn cell_centers_and_corners() {
        let cell = VoxelCell(IVec3::new(2, -1, 0));
        assert_eq!(cell.center(0.5), Vec3::new(1.25, -0.25, 0.25));
        assert_eq!(cell.min_corner(0.5), Vec3::new(1.0, -0.5, 0.0));
        assert_eq!(
            VoxelCell::containing(Vec3::new(1.1, -0.1, 0.0), 0.5),
            VoxelCell(IVec3::new(2, -1, 0))
        );
    }

    #[test]
    fn insert_is_first_write_wins() {
        let mut output = TriangleVoxels::new();
        let cell = VoxelCell(IVec3::ZERO);
        let first = VoxelRecord {
            color: Rgba::new(1, 2, 3, 255),
            uv: Vec2::ZERO,
        };
        let second = VoxelRecord {
            color: Rgba::new(9, 9, 9, 255),
            uv: Vec2::new(1.0, 1.0),
        };

        assert!(output.insert(cell, first));
        assert!(!output.insert(cell, second));
        assert_eq!(output.records(), &[(cell, first)]);
    }

    #[test]
    fn every_triangle_contributes_at_least_one_cell() {
        // Sub-voxel slivers included.
        let tris = [
            unit_triangle(),
            Triangle::new(
                [
                    Vec3::new(0.41, 0.42, 0.43),
                    Vec3::new(0.44, 0.42, 0.43),
                    Vec3::new(0.41, 0.45, 0.43),
                ],
                [Vec2::ZERO; 3],
            ),
            Triangle::new(
                [
                    Vec3::new(-3.0, 0.0, 0.0),
                    Vec3::new(-3.0, 0.001, 0.0),
                    Vec3::new(-3.0, 0.0, 0.001),
                ],
                [Vec2::ZERO; 3],
            ),
        ];

        for tri in &tris {
            let mut output = TriangleVoxels::new();
            rasterize_triangle(tri, 1.0, None, &mut output);
            assert!(!output.is_empty(), "triangle dropped: {tri:?}");
        }
    }

    #[test]
    fn degenerate_point_triangle_still_contributes() {
        // The centroid guard exists for float-marginal slivers where every
        // candidate cell fails the exact test; a zero-area triangle must end
        // up in its containing cell one way or the other.
        let tri = Triangle::new([Vec3::splat(10.2); 3], [Vec2::ZERO; 3]);
        let mut output = TriangleVoxels::new();
        rasterize_triangle(&tri, 1.0, None, &mut output);

        assert!(output.contains(VoxelCell::containing(Vec3::splat(10.2), 1.0)));
    }

    #[test]
    fn enumeration_order_is_x_outer_z_inner() {
        // A flat triangle covering several cells; records must come out in
        // ascending (x, y, z) lexicographic order.
        let tri = Triangle::new(
            [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 2.0),
            ],
            [Vec2::ZERO; 3],
        );
        let mut output = TriangleVoxels::new();
        rasterize_triangle(&tri, 1.0, None, &mut output);

        let cells: Vec<[i32; 3]> = output
            .records()
            .iter()
            .map(|(cell, _)| cell.0.to_array())
            .collect();
        let mut sorted = cells.clone();
        sorted.sort();
        assert_eq!(cells, sorted);
    }
}
