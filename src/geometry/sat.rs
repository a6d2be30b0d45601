use crate::Triangle;

use ilattice::glam::Vec3;

/// Exact separating-axis test between a triangle and the axis-aligned cube of
/// edge length `size` centered at `center`.
///
/// Candidate axes, in test order:
/// 1. the 3 box face normals,
/// 2. the 9 cross products of triangle edges with box axes,
/// 3. the triangle's own plane.
///
/// The first axis that separates the projections ends the test. Touching
/// counts as intersecting.
pub fn triangle_intersects_cube(tri: &Triangle, center: Vec3, size: f32) -> bool {
    let half = size * 0.5;

    // Box-local space.
    let v = [
        tri.points[0] - center,
        tri.points[1] - center,
        tri.points[2] - center,
    ];

    for i in 0..3 {
        let min = v[0][i].min(v[1][i]).min(v[2][i]);
        let max = v[0][i].max(v[1][i]).max(v[2][i]);
        if min > half || max < -half {
            return false;
        }
    }

    let edges = [v[1] - v[0], v[2] - v[1], v[0] - v[2]];
    for e in edges {
        let axes = [
            Vec3::new(0.0, -e.z, e.y),
            Vec3::new(e.z, 0.0, -e.x),
            Vec3::new(-e.y, e.x, 0.0),
        ];
        for axis in axes {
            if !interval_overlaps(&v, axis, half) {
                return false;
            }
        }
    }

    let normal = edges[0].cross(edges[1]);
    plane_overlaps_cube(normal, v[0], half)
}

/// Interval overlap of the triangle's projection on `axis` against the box's
/// projected radius `sum |axis_i| * half`.
fn interval_overlaps(v: &[Vec3; 3], axis: Vec3, half: f32) -> bool {
    let p0 = v[0].dot(axis);
    let p1 = v[1].dot(axis);
    let p2 = v[2].dot(axis);
    let r = half * (axis.x.abs() + axis.y.abs() + axis.z.abs());

    !(p0.min(p1).min(p2) > r || p0.max(p1).max(p2) < -r)
}

/// Plane/box overlap: builds the two box corners extremal along `normal` and
/// requires the plane through `vert` to separate neither from the other side.
fn plane_overlaps_cube(normal: Vec3, vert: Vec3, half: f32) -> bool {
    let mut vmin = Vec3::ZERO;
    let mut vmax = Vec3::ZERO;

    for i in 0..3 {
        if normal[i] > 0.0 {
            vmin[i] = -half - vert[i];
            vmax[i] = half - vert[i];
        } else {
            vmin[i] = half - vert[i];
            vmax[i] = -half - vert[i];
        }
    }

    normal.dot(vmin) <= 0.0 && normal.dot(vmax) >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use ilattice::glam::Vec2;

    fn tri(a: Vec3, b: Vec3, c: Vec3) -> Triangle {
        Triangle::new([a, b, c], [Vec2::ZERO; 3])
    }

    #[test]
    fn triangle_through_cube_intersects() {
        let t = tri(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        assert!(triangle_intersects_cube(&t, Vec3::ZERO, 1.0));
    }

    #[test]
    fn triangle_inside_cube_intersects() {
        let t = tri(
            Vec3::new(0.1, 0.1, 0.1),
            Vec3::new(0.2, 0.1, 0.1),
            Vec3::new(0.1, 0.2, 0.1),
        );
        assert!(triangle_intersects_cube(&t, Vec3::splat(0.5), 1.0));
    }

    #[test]
    fn face_axis_separates_distant_triangle() {
        let t = tri(
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(6.0, 0.0, 0.0),
            Vec3::new(5.0, 1.0, 0.0),
        );
        assert!(!triangle_intersects_cube(&t, Vec3::ZERO, 1.0));
    }

    #[test]
    fn plane_axis_separates_diagonal_cut() {
        // A plane tilted past the cube's corner; all face-axis intervals
        // overlap but the triangle's plane does not reach the cube.
        let t = tri(
            Vec3::new(2.0, -0.2, -0.2),
            Vec3::new(-0.2, 2.0, -0.2),
            Vec3::new(-0.2, -0.2, 2.0),
        );
        assert!(!triangle_intersects_cube(&t, Vec3::ZERO, 1.0));
    }

    #[test]
    fn edge_axis_separates_near_corner() {
        // Sits diagonally just outside the +X/+Y edge of the cube. Face-axis
        // intervals overlap; only an edge cross-product axis separates.
        let t = tri(
            Vec3::new(1.4, 0.0, -2.0),
            Vec3::new(0.0, 1.4, -2.0),
            Vec3::new(1.4, 0.0, 2.0),
        );
        assert!(!triangle_intersects_cube(&t, Vec3::ZERO, 1.0));
    }

    #[test]
    fn touching_face_counts_as_intersecting() {
        let t = tri(
            Vec3::new(0.5, -1.0, -1.0),
            Vec3::new(0.5, 1.0, -1.0),
            Vec3::new(0.5, 0.0, 1.0),
        );
        assert!(triangle_intersects_cube(&t, Vec3::ZERO, 1.0));
    }
}
