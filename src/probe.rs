use crate::{bilinear_sample, CubeData, Texture, Triangle, VoxelCell};

use hashbrown::HashSet;
use ilattice::glam::{IVec3, Vec2, Vec3};
use ndshape::{RuntimeShape, Shape};

/// Probe directions, tried in order: up, down, forward, back, left, right.
const PROBE_DIRS: [Vec3; 6] = [
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, -1.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(0.0, 0.0, -1.0),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
];

/// Ray-probe voxelization: casts 6 axis-aligned rays from every grid sample
/// point and occupies the cell when any ray hits the mesh within one voxel.
///
/// This trades the exactness of the separating-axis rasterizer for a test
/// that only needs ray casts: it can miss interior structure and skims the
/// surface from the outside. Color and UV come from the first hit. Output is
/// deduplicated by cell and ordered by grid traversal, so identical input
/// produces identical output.
pub fn probe_voxelize(
    triangles: &[Triangle],
    voxel_size: f32,
    texture: Option<&Texture>,
) -> Vec<CubeData> {
    let Some((min_cell, shape)) = probe_grid(triangles, voxel_size) else {
        return Vec::new();
    };

    let mut occupied = HashSet::new();
    let mut cubes = Vec::new();

    for i in 0..shape.size() {
        let [x, y, z] = shape.delinearize(i);
        let cell = VoxelCell(min_cell + IVec3::new(x as i32, y as i32, z as i32));
        let origin = cell.min_corner(voxel_size);

        for dir in PROBE_DIRS {
            let Some(hit) = cast_ray(triangles, origin, dir, voxel_size) else {
                continue;
            };
            if occupied.insert(cell) {
                let color = bilinear_sample(hit.uv, texture);
                cubes.push(CubeData {
                    position: origin,
                    uv: hit.uv,
                    color,
                });
            }
            break;
        }
    }

    cubes
}

/// Grid covering the mesh bounds padded by one cell on every side, as the
/// minimum cell index plus the shape of the cell range. `None` when there are
/// no triangles.
fn probe_grid(triangles: &[Triangle], voxel_size: f32) -> Option<(IVec3, RuntimeShape<u32, 3>)> {
    let (mut min, mut max) = triangles.first()?.aabb();
    for tri in &triangles[1..] {
        let (tri_min, tri_max) = tri.aabb();
        min = min.min(tri_min);
        max = max.max(tri_max);
    }

    let min_cell = (min / voxel_size).floor().as_ivec3() - IVec3::ONE;
    let max_cell = (max / voxel_size).floor().as_ivec3() + IVec3::ONE;
    let extent = (max_cell - min_cell + IVec3::ONE).as_uvec3();

    Some((min_cell, RuntimeShape::<u32, 3>::new(extent.to_array())))
}

struct RayHit {
    distance: f32,
    uv: Vec2,
}

/// Nearest hit of the ray against any triangle, within `max_distance`.
fn cast_ray(triangles: &[Triangle], origin: Vec3, dir: Vec3, max_distance: f32) -> Option<RayHit> {
    let mut nearest: Option<RayHit> = None;
    for tri in triangles {
        let Some(hit) = ray_triangle(origin, dir, tri) else {
            continue;
        };
        if hit.distance <= max_distance
            && nearest.as_ref().map_or(true, |n| hit.distance < n.distance)
        {
            nearest = Some(hit);
        }
    }
    nearest
}

/// Möller-Trumbore ray/triangle intersection. Returns the hit distance and
/// the UV interpolated at the hit point.
fn ray_triangle(origin: Vec3, dir: Vec3, tri: &Triangle) -> Option<RayHit> {
    let [a, b, c] = tri.points;
    let e1 = b - a;
    let e2 = c - a;

    let pvec = dir.cross(e2);
    let det = e1.dot(pvec);
    if det.abs() < f32::EPSILON {
        // Ray parallel to the triangle plane.
        return None;
    }

    let inv_det = 1.0 / det;
    let tvec = origin - a;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(e1);
    let v = dir.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let distance = e2.dot(qvec) * inv_det;
    if distance < 0.0 {
        return None;
    }

    let uv = tri.interpolate_uv(Vec3::new(1.0 - u - v, u, v));
    Some(RayHit { distance, uv })
}
