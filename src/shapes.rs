use cgmath::{EuclideanSpace, InnerSpace};

use crate::geometry::Ray;
use crate::{Float, Point3f, Vec3f};

/// Nearest intersection of a ray with a single primitive, in world space.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceHit {
    pub t: Float,
    pub p: Point3f,
    pub n: Vec3f,
}

#[derive(Clone, Copy, Debug)]
pub struct Sphere {
    pub center: Point3f,
    pub radius: Float,
    radius_sq: Float,
}

impl Sphere {
    pub fn new(center: Point3f, radius: Float) -> Self {
        Self { center, radius, radius_sq: radius * radius }
    }

    pub fn radius_sq(&self) -> Float {
        self.radius_sq
    }

    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let oc = ray.origin - self.center;
        let a = ray.dir.magnitude2();
        let b = 2.0 * oc.dot(ray.dir);
        let c = oc.magnitude2() - self.radius_sq;

        let disc = b * b - 4.0 * a * c;
        // written so a NaN discriminant (degenerate ray) also misses
        if !(disc >= 0.0) {
            return None;
        }
        let root = disc.sqrt();

        // smaller positive root, falling back to the larger one when the
        // origin is inside the sphere
        let mut t = (-b - root) / (2.0 * a);
        if t <= 0.0 {
            t = (-b + root) / (2.0 * a);
            if t <= 0.0 {
                return None;
            }
        }
        if !t.is_finite() {
            return None;
        }

        let p = ray.at(t);
        let n = (p - self.center).normalize();
        Some(SurfaceHit { t, p, n })
    }
}

/// Plane `dot(normal, p) + d == 0`, one-sided: only rays running against the
/// normal can hit the front face.
#[derive(Clone, Copy, Debug)]
pub struct Plane {
    pub normal: Vec3f,
    pub d: Float,
}

impl Plane {
    pub fn new(normal: Vec3f, d: Float) -> Self {
        Self { normal, d }
    }

    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let vd = self.normal.dot(ray.dir);
        // back-facing and parallel (vd == 0) rays miss
        if !(vd < 0.0) {
            return None;
        }

        let t = -(self.normal.dot(ray.origin.to_vec()) + self.d) / vd;
        if !(t > 0.0) || !t.is_finite() {
            return None;
        }

        Some(SurfaceHit { t, p: ray.at(t), n: self.normal })
    }
}

/// The closed set of primitives the scene can hold.
#[derive(Clone, Copy, Debug)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
}

impl Shape {
    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        match self {
            Shape::Sphere(s) => s.intersect(ray),
            Shape::Plane(p) => p.intersect(ray),
        }
    }

    pub fn as_sphere(&self) -> Option<&Sphere> {
        match self {
            Shape::Sphere(s) => Some(s),
            Shape::Plane(_) => None,
        }
    }

    /// True when every numeric parameter is finite. Checked once at scene
    /// build time so a NaN can never enter the render loop.
    pub fn is_finite(&self) -> bool {
        match self {
            Shape::Sphere(s) => {
                s.center.to_vec().magnitude2().is_finite() && s.radius.is_finite() && s.radius > 0.0
            }
            Shape::Plane(p) => p.normal.magnitude2().is_finite() && p.d.is_finite(),
        }
    }
}
