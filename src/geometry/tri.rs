use ilattice::glam::{Vec2, Vec3};

/// One triangle of the input mesh, carrying the UVs of its three corners.
///
/// Positions are expected to already include the source object's non-uniform
/// scale; every geometric test downstream works on these values as-is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub points: [Vec3; 3],
    pub uvs: [Vec2; 3],
}

impl Triangle {
    #[inline]
    pub fn new(points: [Vec3; 3], uvs: [Vec2; 3]) -> Self {
        Self { points, uvs }
    }

    #[inline]
    pub fn centroid(&self) -> Vec3 {
        (self.points[0] + self.points[1] + self.points[2]) / 3.0
    }

    /// Axis-aligned bounding box as `(min, max)` corners.
    #[inline]
    pub fn aabb(&self) -> (Vec3, Vec3) {
        let [a, b, c] = self.points;
        (a.min(b).min(c), a.max(b).max(c))
    }

    /// Barycentric weights `(u, v, w)` of `p`, with `u + v + w = 1`.
    ///
    /// Solved with the standard 2x2 system over edge-vector dot products. For
    /// a degenerate (zero-area) triangle the denominator is zero and the
    /// result is NaN/infinite; filter such triangles upstream, this does not
    /// guard against them.
    pub fn barycentric(&self, p: Vec3) -> Vec3 {
        let [a, b, c] = self.points;
        let v0 = b - a;
        let v1 = c - a;
        let v2 = p - a;

        let d00 = v0.dot(v0);
        let d01 = v0.dot(v1);
        let d11 = v1.dot(v1);
        let d20 = v2.dot(v0);
        let d21 = v2.dot(v1);
        let denom = d00 * d11 - d01 * d01;

        let v = (d11 * d20 - d01 * d21) / denom;
        let w = (d00 * d21 - d01 * d20) / denom;
        let u = 1.0 - v - w;

        Vec3::new(u, v, w)
    }

    /// UV interpolated from the corner UVs with the given barycentric weights.
    #[inline]
    pub fn interpolate_uv(&self, bary: Vec3) -> Vec2 {
        bary.x * self.uvs[0] + bary.y * self.uvs[1] + bary.z * self.uvs[2]
    }
}
