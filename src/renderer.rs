use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rand::SeedableRng;
use rayon::prelude::*;
use tracing::info;

use crate::camera::Camera;
use crate::error::Error;
use crate::film::Film;
use crate::geometry::Ray;
use crate::integrator::PathIntegrator;
use crate::sampler::SamplerKind;
use crate::scene::Scene;
use crate::{Color, Float};
use rand_xoshiro::Xoshiro256Plus;

/// Size of the precomputed jitter sample set each worker cycles through.
const SAMPLE_SET_SIZE: usize = 256;

/// Options recognized by the render entry point.
#[derive(Clone, Copy, Debug)]
pub struct RenderSettings {
    pub width: usize,
    pub height: usize,
    /// Primary rays averaged per pixel.
    pub num_samples: usize,
    /// Enables the exposure + gamma pipeline; otherwise clamp + gamma only.
    pub tone_mapping: bool,
    pub sampler: SamplerKind,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            num_samples: 16,
            tone_mapping: true,
            sampler: SamplerKind::Poisson,
        }
    }
}

pub struct Renderer {
    pub scene: Scene,
    pub camera: Camera,
    pub integrator: PathIntegrator,
}

impl Renderer {
    pub fn new(scene: Scene, camera: Camera, integrator: PathIntegrator) -> Self {
        Self { scene, camera, integrator }
    }

    pub fn render(&self, settings: &RenderSettings) -> Result<Film, Error> {
        self.render_with(settings, &AtomicBool::new(false), || {})
    }

    /// Renders into a fresh film, sharding scanline rows across the rayon
    /// pool. Workers write disjoint rows, each with its own RNG stream and
    /// sampler clone; nothing is locked. `cancel` is checked once per
    /// scanline; cancelled rows are left black. `on_row` runs after each
    /// completed row (progress reporting).
    ///
    /// Returns only after every row has completed, so callers may tone map
    /// the film immediately.
    pub fn render_with(
        &self,
        settings: &RenderSettings,
        cancel: &AtomicBool,
        on_row: impl Fn() + Sync,
    ) -> Result<Film, Error> {
        let &RenderSettings { width, height, num_samples, .. } = settings;
        if width < 2 || height < 2 {
            return Err(Error::InvalidResolution(width, height));
        }
        if num_samples == 0 {
            return Err(Error::InvalidSampleCount(num_samples));
        }

        let sampler_proto = settings.sampler.create(SAMPLE_SET_SIZE, 0)?;

        // Image plane at distance `dist` in front of the eye; its width
        // follows from the fov, its height from the aspect ratio.
        let frame = self.camera.frame;
        let half_width = self.camera.dist * (self.camera.fov / 2.0).tan();
        let plane_width = 2.0 * half_width;
        let plane_height = plane_width * height as Float / width as Float;

        let x_inc = plane_width / (width - 1) as Float;
        let y_inc = -plane_height / (height - 1) as Float;

        let top_left = frame.origin - half_width * frame.right
            + (plane_height / 2.0) * frame.up
            + self.camera.dist * frame.dir;

        info!(
            width,
            height,
            num_samples,
            shapes = self.scene.num_shapes(),
            emitters = self.scene.emitters().len(),
            "render start"
        );
        let start = Instant::now();

        let mut film = Film::new(width, height);
        film.pixels_mut()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                if cancel.load(Ordering::Relaxed) {
                    return;
                }

                let mut rng = Xoshiro256Plus::seed_from_u64(y as u64);
                let mut sampler = sampler_proto.clone_seeded(y as u64 + 1);

                for (x, px) in row.iter_mut().enumerate() {
                    let mut col = Color::BLACK;
                    // TODO: stratify the footprint instead of sharing one
                    // jitter set across all samples of a pixel
                    for _ in 0..num_samples {
                        let ofs = sampler.next_sample();
                        let target = top_left
                            + (x as Float + ofs.x) * x_inc * frame.right
                            + (y as Float + ofs.y) * y_inc * frame.up;
                        // target sits on the image plane, dist > 0 away
                        let ray = match Ray::towards(frame.origin, target) {
                            Some(ray) => ray,
                            None => continue,
                        };
                        col += self.integrator.radiance(&self.scene, &ray, 0, true, &mut rng);
                    }
                    *px = col / num_samples as Float;
                }

                on_row();
            });

        info!(elapsed_ms = start.elapsed().as_millis() as u64, "render done");
        Ok(film)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::scene::SceneBuilder;
    use crate::shapes::{Shape, Sphere};

    fn demo_renderer() -> Renderer {
        let mut builder = SceneBuilder::new();
        let mat = builder.add_material(Material::emitter(Color::WHITE));
        builder.add_shape(Shape::Sphere(Sphere::new(point3f!(0, 0, 30), 5.0)), mat);
        let scene = builder.build().unwrap();
        let camera = Camera::look_at(
            point3f!(0, 0, 0),
            vec3f!(0, 1, 0),
            point3f!(0, 0, 30),
            std::f32::consts::FRAC_PI_3,
            1.0,
        )
        .unwrap();
        Renderer::new(scene, camera, PathIntegrator::new(Color::BLACK))
    }

    #[test]
    fn zero_samples_is_a_config_error() {
        let renderer = demo_renderer();
        let settings = RenderSettings { num_samples: 0, ..RenderSettings::default() };
        assert!(matches!(
            renderer.render(&settings),
            Err(Error::InvalidSampleCount(0))
        ));
    }

    #[test]
    fn tiny_resolution_is_a_config_error() {
        let renderer = demo_renderer();
        let settings = RenderSettings { width: 1, height: 1, ..RenderSettings::default() };
        assert!(matches!(
            renderer.render(&settings),
            Err(Error::InvalidResolution(1, 1))
        ));
    }

    #[test]
    fn cancelled_render_returns_black_film() {
        let renderer = demo_renderer();
        let settings = RenderSettings {
            width: 8,
            height: 8,
            num_samples: 1,
            ..RenderSettings::default()
        };
        let cancel = AtomicBool::new(true);
        let film = renderer.render_with(&settings, &cancel, || {}).unwrap();
        assert!(film.pixels().iter().all(|p| p.is_black()));
    }

    #[test]
    fn progress_callback_fires_once_per_row() {
        use std::sync::atomic::AtomicUsize;
        let renderer = demo_renderer();
        let settings = RenderSettings {
            width: 8,
            height: 6,
            num_samples: 1,
            sampler: SamplerKind::Random,
            ..RenderSettings::default()
        };
        let rows = AtomicUsize::new(0);
        renderer
            .render_with(&settings, &AtomicBool::new(false), || {
                rows.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();
        assert_eq!(rows.load(Ordering::Relaxed), 6);
    }

    #[test]
    fn rows_are_deterministic_across_runs() {
        let renderer = demo_renderer();
        let settings = RenderSettings {
            width: 16,
            height: 16,
            num_samples: 2,
            sampler: SamplerKind::Random,
            ..RenderSettings::default()
        };
        let a = renderer.render(&settings).unwrap();
        let b = renderer.render(&settings).unwrap();
        assert_eq!(a.pixels(), b.pixels());
    }
}
