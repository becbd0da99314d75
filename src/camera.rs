use cgmath::InnerSpace;

use crate::error::Error;
use crate::{Float, Point3f, Vec3f};

/// Orthonormal camera frame, left-handed: `dir` points into the scene.
#[derive(Clone, Copy, Debug)]
pub struct Frame {
    pub right: Vec3f,
    pub up: Vec3f,
    pub dir: Vec3f,
    pub origin: Point3f,
}

/// Pinhole camera: a frame, a field of view and the distance from the eye to
/// the image plane.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub frame: Frame,
    pub fov: Float,
    pub dist: Float,
}

impl Camera {
    /// Builds the frame looking from `eye` toward `target`. `fov` is the
    /// full horizontal field of view in radians.
    pub fn look_at(
        eye: Point3f,
        up: Vec3f,
        target: Point3f,
        fov: Float,
        dist: Float,
    ) -> Result<Self, Error> {
        let dir = target - eye;
        let len_sq = dir.magnitude2();
        if !len_sq.is_finite() || len_sq < 1e-12 {
            return Err(Error::DegenerateCamera);
        }
        let dir = dir / len_sq.sqrt();

        let right = up.cross(dir);
        let len_sq = right.magnitude2();
        if !len_sq.is_finite() || len_sq < 1e-12 {
            // up is parallel to the view direction
            return Err(Error::DegenerateCamera);
        }
        let right = right / len_sq.sqrt();
        let up = dir.cross(right);

        if !fov.is_finite() || fov <= 0.0 || !dist.is_finite() || dist <= 0.0 {
            return Err(Error::DegenerateCamera);
        }

        Ok(Self { frame: Frame { right, up, dir, origin: eye }, fov, dist })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn axis_aligned_frame() {
        let cam = Camera::look_at(
            point3f!(0, 0, 0),
            vec3f!(0, 1, 0),
            point3f!(0, 0, 30),
            std::f32::consts::FRAC_PI_3,
            1.0,
        )
        .unwrap();
        assert_abs_diff_eq!(cam.frame.dir.z, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(cam.frame.right.x, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(cam.frame.up.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn frame_is_orthonormal_for_oblique_views() {
        let cam = Camera::look_at(
            point3f!(5, 5, 10),
            vec3f!(0, 1, 0),
            point3f!(0, 0, 30),
            1.0,
            1.0,
        )
        .unwrap();
        let f = cam.frame;
        assert_abs_diff_eq!(f.right.dot(f.up), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(f.right.dot(f.dir), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(f.up.dot(f.dir), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(f.dir.magnitude(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn degenerate_inputs_fail() {
        let eye = point3f!(1, 2, 3);
        assert!(Camera::look_at(eye, vec3f!(0, 1, 0), eye, 1.0, 1.0).is_err());
        // up parallel to the view direction
        assert!(
            Camera::look_at(point3f!(0, 0, 0), vec3f!(0, 0, 1), point3f!(0, 0, 5), 1.0, 1.0)
                .is_err()
        );
        assert!(
            Camera::look_at(point3f!(0, 0, 0), vec3f!(0, 1, 0), point3f!(0, 0, 5), 0.0, 1.0)
                .is_err()
        );
    }
}
