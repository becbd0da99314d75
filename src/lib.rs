#[macro_use] pub mod macros; // must stay at the top
pub mod camera;
pub mod color;
pub mod error;
pub mod film;
pub mod geometry;
pub mod integrator;
pub mod material;
pub mod renderer;
pub mod sampler;
pub mod sampling;
pub mod scene;
pub mod shapes;

pub use color::Color;
pub use error::Error;
pub use geometry::Ray;

use cgmath::{Point2, Point3, Vector3};

pub type Float = f32;

pub type Point2f = Point2<Float>;
pub type Point3f = Point3<Float>;
pub type Vec3f = Vector3<Float>;

pub const PI: Float = std::f32::consts::PI;
pub const INV_PI: Float = std::f32::consts::FRAC_1_PI;
pub const INFINITY: Float = std::f32::INFINITY;
