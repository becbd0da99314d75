use thiserror::Error;

/// Configuration-time failures. Everything that can go wrong mid-render
/// (degenerate rays, grazing hits) is handled locally as "no hit" instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("sample count {0} cannot produce any sample points")]
    InvalidSampleCount(usize),

    #[error("unknown sampler kind `{0}` (expected random, uniform or poisson)")]
    UnknownSampler(String),

    #[error("image resolution {0}x{1} is too small to span an image plane")]
    InvalidResolution(usize, usize),

    #[error("camera frame is degenerate (eye, target and up do not span a basis)")]
    DegenerateCamera,

    #[error("shape {0} has a non-finite or non-positive parameter")]
    NonFiniteGeometry(usize),

    #[error("shape references material {0} which was never added")]
    UnknownMaterial(usize),
}
