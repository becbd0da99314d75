use std::env;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;

use anyhow::Context;
use indicatif::ProgressBar;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lumen::camera::Camera;
use lumen::integrator::PathIntegrator;
use lumen::material::Material;
use lumen::renderer::{RenderSettings, Renderer};
use lumen::sampler::{distribution_stats, SamplerKind};
use lumen::scene::{Scene, SceneBuilder};
use lumen::shapes::{Plane, Shape, Sphere};
use lumen::{point3f, vec3f, Color, Float, PI};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let settings = RenderSettings {
        width: arg(&args, 0, 512)?,
        height: arg(&args, 1, 512)?,
        num_samples: arg(&args, 2, 16)?,
        sampler: arg(&args, 3, SamplerKind::Poisson)?,
        tone_mapping: arg(&args, 4, true)?,
    };
    let out: String = arg(&args, 5, "render.png".to_string())?;

    // log the nearest-neighbor distribution of the chosen sample set
    let mut sampler = settings.sampler.create(256, 0)?;
    let (mean, stddev) = distribution_stats(sampler.as_mut(), 256);
    info!(?settings.sampler, mean, stddev, "sample distribution");

    let scene = demo_scene()?;
    let camera = Camera::look_at(
        point3f!(5, 5, 10),
        vec3f!(0, 1, 0),
        point3f!(0, 0, 30),
        60.0 * PI / 180.0,
        1.0,
    )?;
    let renderer = Renderer::new(scene, camera, PathIntegrator::new(Color::BLACK));

    let progress = ProgressBar::new(settings.height as u64);
    let film = renderer.render_with(&settings, &AtomicBool::new(false), || progress.inc(1))?;
    progress.finish_and_clear();

    let bytes = film.to_rgba8(settings.tone_mapping);
    image::save_buffer(
        &out,
        &bytes,
        film.width() as u32,
        film.height() as u32,
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("failed to write {}", out))?;
    info!(path = out.as_str(), "image written");

    Ok(())
}

fn arg<T>(args: &[String], idx: usize, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match args.get(idx) {
        Some(s) => s
            .parse()
            .with_context(|| format!("bad argument {}: `{}`", idx + 1, s)),
        None => Ok(default),
    }
}

/// Ring of ten small spheres around the origin of the far wall, every other
/// one emissive, a big emitter overhead and a red ground plane.
fn demo_scene() -> anyhow::Result<Scene> {
    let ball_diffuse = Color::new(0.1, 0.4, 0.4);
    let ball_spec = Color::uniform(0.2);
    let ball_emit = Color::uniform(0.75);
    let plane_diffuse = Color::new(0.5, 0.0, 0.0);
    let plane_spec = Color::uniform(0.1);

    let mut builder = SceneBuilder::new();
    let lit = builder.add_material(Material::new(ball_diffuse, ball_spec, ball_emit));
    let dark = builder.add_material(Material::new(ball_diffuse, ball_spec, Color::BLACK));
    let overhead = builder.add_material(Material::new(ball_diffuse, Color::BLACK, ball_emit));
    let ground = builder.add_material(Material::new(plane_diffuse, plane_spec, Color::BLACK));

    let num_balls = 10;
    for i in 0..num_balls {
        let angle = i as Float * 2.0 * PI / num_balls as Float;
        let center = point3f!(10.0 * angle.cos(), 1, 30.0 + 10.0 * angle.sin());
        let material = if i % 2 == 1 { dark } else { lit };
        builder.add_shape(Shape::Sphere(Sphere::new(center, 2.0)), material);
    }
    builder.add_shape(Shape::Sphere(Sphere::new(point3f!(0, 50, 30), 15.0)), overhead);
    builder.add_shape(Shape::Plane(Plane::new(vec3f!(0, 1, 0), 0.0)), ground);

    Ok(builder.build()?)
}
