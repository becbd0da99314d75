use crate::error::Error;
use crate::sampler::Sampler;
use crate::sampling::concentric_disk;
use crate::{Float, Point2f};

/// Regular grid over [-1, 1]^2, read cyclically. The grid is
/// sqrt(count) x sqrt(count) with spacing 2/sqrt(count); a non-square count
/// rounds down to the nearest full grid so no point leaves the square.
pub struct UniformSampler {
    points: Vec<Point2f>,
    cursor: usize,
}

impl UniformSampler {
    pub fn new(count: usize) -> Result<Self, Error> {
        let f = (count as Float).sqrt() as usize;
        if f == 0 {
            return Err(Error::InvalidSampleCount(count));
        }

        let points = (0..f * f)
            .map(|i| {
                Point2f::new(
                    -1.0 + 2.0 * (i % f) as Float / f as Float,
                    -1.0 + 2.0 * (i / f) as Float / f as Float,
                )
            })
            .collect();

        Ok(Self { points, cursor: 0 })
    }
}

impl Sampler for UniformSampler {
    fn next_sample(&mut self) -> Point2f {
        let p = self.points[self.cursor % self.points.len()];
        self.cursor += 1;
        p
    }

    fn next_disk_sample(&mut self) -> Point2f {
        concentric_disk(self.next_sample())
    }

    fn clone_seeded(&self, seed: u64) -> Box<dyn Sampler> {
        // the sequence is deterministic; the seed only rotates the cursor so
        // workers start at different grid positions
        Box::new(UniformSampler {
            points: self.points.clone(),
            cursor: seed as usize % self.points.len(),
        })
    }
}
