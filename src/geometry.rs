use cgmath::InnerSpace;

use crate::{Float, Point3f, Vec3f};

/// Offset applied along the shading normal when spawning secondary and shadow
/// rays, so a ray never re-hits the surface it just left.
pub const RAY_EPSILON: Float = 1e-4;

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Point3f,
    pub dir: Vec3f,
}

impl Ray {
    /// `dir` is expected to be unit length; hit distances are only meaningful
    /// for normalized directions.
    pub fn new(origin: Point3f, dir: Vec3f) -> Self {
        Self { origin, dir }
    }

    /// Ray from `origin` aimed at `target`, with the direction normalized.
    /// `None` when the two points are too close (or not finite) to define a
    /// direction.
    pub fn towards(origin: Point3f, target: Point3f) -> Option<Self> {
        let dir = target - origin;
        let len_sq = dir.magnitude2();
        if !len_sq.is_finite() || len_sq < 1e-12 {
            return None;
        }
        Some(Self { origin, dir: dir / len_sq.sqrt() })
    }

    pub fn at(&self, t: Float) -> Point3f {
        self.origin + self.dir * t
    }
}

/// Flips `n` so it lies in the same hemisphere as `v`.
pub fn faceforward(n: Vec3f, v: Vec3f) -> Vec3f {
    if n.dot(v) < 0.0 {
        -n
    } else {
        n
    }
}

/// Completes `w` (assumed normalized) to an orthonormal basis by zeroing the
/// smaller of its x/y components.
pub fn coordinate_system(w: Vec3f) -> (Vec3f, Vec3f) {
    let u = if w.x.abs() > w.y.abs() {
        let inv_len = 1.0 / (w.x * w.x + w.z * w.z).sqrt();
        Vec3f::new(-w.z * inv_len, 0.0, w.x * inv_len)
    } else {
        let inv_len = 1.0 / (w.y * w.y + w.z * w.z).sqrt();
        Vec3f::new(0.0, w.z * inv_len, -w.y * inv_len)
    };
    let v = w.cross(u);
    (u, v)
}
