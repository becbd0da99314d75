use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

use crate::sampler::Sampler;
use crate::{Float, Point2f};

/// Independent uniform draws per axis; no precomputed point set.
pub struct RandomSampler {
    rng: Xoshiro256Plus,
}

impl RandomSampler {
    pub fn new(seed: u64) -> Self {
        Self { rng: Xoshiro256Plus::seed_from_u64(seed) }
    }
}

impl Sampler for RandomSampler {
    fn next_sample(&mut self) -> Point2f {
        let x: Float = self.rng.gen_range(-1.0, 1.0);
        let y: Float = self.rng.gen_range(-1.0, 1.0);
        Point2f::new(x, y)
    }

    fn next_disk_sample(&mut self) -> Point2f {
        // rejection: redraw until the point falls inside the unit disk
        loop {
            let p = self.next_sample();
            if p.x * p.x + p.y * p.y <= 1.0 {
                return p;
            }
        }
    }

    fn clone_seeded(&self, seed: u64) -> Box<dyn Sampler> {
        Box::new(RandomSampler::new(seed))
    }
}
