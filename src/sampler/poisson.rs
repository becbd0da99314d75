use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

use crate::error::Error;
use crate::sampler::Sampler;
use crate::sampling::concentric_disk;
use crate::{Float, Point2f};

/// Blue-noise-like point set built by error diffusion, after "Antialiased
/// Images at Low Sampling Densities" (Mitchell). The accepted points are
/// shuffled once so a cyclic read of any prefix is still well distributed.
pub struct PoissonSampler {
    points: Vec<Point2f>,
    cursor: usize,
}

impl PoissonSampler {
    pub fn new(count: usize, seed: u64) -> Result<Self, Error> {
        if count == 0 {
            return Err(Error::InvalidSampleCount(count));
        }

        let mut rng = Xoshiro256Plus::seed_from_u64(seed);

        // A sqrt(count) base grid subdivided 4x per axis; emission density
        // settles around one point per 16 sub-cells, giving ~count points.
        let f = (count as Float).sqrt().ceil() as usize;
        let sub = 4 * f.max(1);

        // a degenerate jitter draw can leave the set empty; retry on a fresh
        // stretch of the stream before giving up
        for _ in 0..8 {
            let mut points = Self::diffuse(sub, &mut rng);
            if !points.is_empty() {
                points.shuffle(&mut rng);
                return Ok(Self { points, cursor: 0 });
            }
        }
        Err(Error::InvalidSampleCount(count))
    }

    fn diffuse(sub: usize, rng: &mut Xoshiro256Plus) -> Vec<Point2f> {
        let mut d = vec![0.0 as Float; sub * sub];
        let mut points = Vec::new();

        for i in 1..sub {
            for j in 1..sub {
                // weighted error from the already-resolved neighbors: left,
                // upper-left, upper, upper-right (4/8, 1/8, 2/8, 1/8)
                let upper_right = if j + 1 < sub { d[(j + 1) + (i - 1) * sub] } else { 0.0 };
                let mut t = (4.0 * d[(j - 1) + i * sub]
                    + d[(j - 1) + (i - 1) * sub]
                    + 2.0 * d[j + (i - 1) * sub]
                    + upper_right)
                    / 8.0;
                t += rng.gen_range(1.0 / 16.0 - 1.0 / 64.0, 1.0 / 16.0 + 1.0 / 64.0);

                if t >= 0.5 {
                    // binarize, keep the remainder for later neighbors
                    d[j + i * sub] = t - 1.0;
                    points.push(Point2f::new(
                        -1.0 + 2.0 * j as Float / sub as Float,
                        -1.0 + 2.0 * i as Float / sub as Float,
                    ));
                } else {
                    d[j + i * sub] = t;
                }
            }
        }

        points
    }

    #[cfg(test)]
    fn points(&self) -> &[Point2f] {
        &self.points
    }
}

impl Sampler for PoissonSampler {
    fn next_sample(&mut self) -> Point2f {
        let p = self.points[self.cursor % self.points.len()];
        self.cursor += 1;
        p
    }

    fn next_disk_sample(&mut self) -> Point2f {
        concentric_disk(self.next_sample())
    }

    fn clone_seeded(&self, seed: u64) -> Box<dyn Sampler> {
        // same point set, reshuffled so workers read decorrelated orders
        let mut rng = Xoshiro256Plus::seed_from_u64(seed);
        let mut points = self.points.clone();
        points.shuffle(&mut rng);
        Box::new(PoissonSampler { points, cursor: 0 })
    }
}
