use std::str::FromStr;

use crate::error::Error;
use crate::{Float, Point2f};

pub mod poisson;
pub mod random;
pub mod uniform;

pub use poisson::PoissonSampler;
pub use random::RandomSampler;
pub use uniform::UniformSampler;

/// 2D sample-sequence generator driving antialiasing jitter and light
/// sampling.
///
/// Every sampler owns a single mutable read cursor and must not be shared
/// between workers; give each worker its own instance via [`clone_seeded`].
///
/// [`clone_seeded`]: Sampler::clone_seeded
pub trait Sampler: Sync + Send {
    /// Next sample point in [-1, 1]^2.
    fn next_sample(&mut self) -> Point2f;

    /// Next sample point inside the unit disk.
    fn next_disk_sample(&mut self) -> Point2f;

    /// Duplicate this sampler with a decorrelated stream for another worker.
    fn clone_seeded(&self, seed: u64) -> Box<dyn Sampler>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplerKind {
    Random,
    Uniform,
    Poisson,
}

impl SamplerKind {
    /// Builds a sampler holding roughly `count` precomputed points. Fails
    /// fast on configurations that would produce an empty sample set.
    pub fn create(self, count: usize, seed: u64) -> Result<Box<dyn Sampler>, Error> {
        Ok(match self {
            SamplerKind::Random => Box::new(RandomSampler::new(seed)),
            SamplerKind::Uniform => Box::new(UniformSampler::new(count)?),
            SamplerKind::Poisson => Box::new(PoissonSampler::new(count, seed)?),
        })
    }
}

impl FromStr for SamplerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "random" => Ok(SamplerKind::Random),
            "uniform" => Ok(SamplerKind::Uniform),
            "poisson" => Ok(SamplerKind::Poisson),
            other => Err(Error::UnknownSampler(other.to_string())),
        }
    }
}

/// Mean and standard deviation of the nearest-neighbor distance over `n`
/// draws from the sampler. A quick quality check for a point set: blue-noise
/// sets show a larger mean and smaller deviation than independent uniforms.
pub fn distribution_stats(sampler: &mut dyn Sampler, n: usize) -> (Float, Float) {
    let points: Vec<Point2f> = (0..n).map(|_| sampler.next_sample()).collect();

    let mut distances = Vec::with_capacity(points.len());
    let mut sum = 0.0f64;
    for (i, a) in points.iter().enumerate() {
        let mut nearest = std::f32::MAX;
        for (j, b) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            let (dx, dy) = (a.x - b.x, a.y - b.y);
            let dist_sq = dx * dx + dy * dy;
            if dist_sq < nearest {
                nearest = dist_sq;
            }
        }
        let d = nearest.sqrt();
        distances.push(d);
        sum += f64::from(d);
    }

    let mean = (sum / distances.len() as f64) as Float;
    let var: Float = distances
        .iter()
        .map(|d| (d - mean) * (d - mean))
        .sum::<Float>()
        / distances.len() as Float;

    (mean, var.sqrt())
}
