use crate::{Float, Point2f};
use std::f32::consts::FRAC_PI_4;

/// Maps a point in [-1, 1]^2 onto the unit disk with Shirley's concentric
/// mapping: the square is split into eight angular octants by sign and
/// magnitude of the coordinates, each mapped to a polar wedge. Unlike the
/// naive polar mapping this keeps areas roughly proportional and does not
/// bunch samples at the origin.
pub fn concentric_disk(p: Point2f) -> Point2f {
    let a = p.x;
    let b = p.y;

    let (r, phi) = if a > -b {
        if a > b {
            (a, FRAC_PI_4 * (b / a))
        } else {
            (b, FRAC_PI_4 * (2.0 - a / b))
        }
    } else if a < b {
        (-a, FRAC_PI_4 * (4.0 + b / a))
    } else if b != 0.0 {
        (-b, FRAC_PI_4 * (6.0 - a / b))
    } else {
        // a == b == 0
        return Point2f::new(0.0, 0.0);
    };

    Point2f::new(r * phi.cos(), r * phi.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn len(p: Point2f) -> Float {
        (p.x * p.x + p.y * p.y).sqrt()
    }

    #[test]
    fn center_maps_to_center() {
        let p = concentric_disk(Point2f::new(0.0, 0.0));
        assert_eq!((p.x, p.y), (0.0, 0.0));
    }

    #[test]
    fn axes_are_fixed_points() {
        let p = concentric_disk(Point2f::new(1.0, 0.0));
        assert_abs_diff_eq!(p.x, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn square_maps_inside_disk() {
        // corners and edge midpoints all land on or inside the unit circle
        for &(x, y) in &[
            (1.0, 1.0),
            (-1.0, 1.0),
            (1.0, -1.0),
            (-1.0, -1.0),
            (0.0, 1.0),
            (0.0, -1.0),
            (-1.0, 0.0),
            (0.3, -0.9),
        ] {
            let p = concentric_disk(Point2f::new(x, y));
            assert!(len(p) <= 1.0 + 1e-6, "({}, {}) mapped outside", x, y);
        }
    }

    #[test]
    fn radius_preserved_on_square_boundary() {
        // the outer ring of the square maps to the outer ring of the disk
        for &(x, y) in &[(1.0, 0.5), (-1.0, 0.3), (0.7, 1.0), (-0.2, -1.0)] {
            let p = concentric_disk(Point2f::new(x, y));
            assert_abs_diff_eq!(len(p), 1.0, epsilon = 1e-5);
        }
    }
}
