//! Progressive rendering example.
//!
//! Builds a small particle scene, refines it over a number of passes, and
//! saves the result as a PNG.

use glint_renderer::{
    output, Camera, Color, Device, PathTracer, RenderSettings, Scene, SphereGeometry, Vec3,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("GLINT - Progressive Particle Renderer");
    println!("=====================================");

    let device = Device::new();
    let scene = build_scene(&device);

    let settings = RenderSettings {
        seed: 42,
        light_samples: 4,
        ..Default::default()
    };
    let mut tracer = PathTracer::new(&device, 640, 360, settings)?;
    tracer.set_camera(Camera::look_at(
        Vec3::new(0.0, 1.5, 10.0),
        Vec3::new(0.0, 0.5, 0.0),
        Vec3::Y,
        6.0,
    ));

    let passes = 64;
    println!("Rendering 640x360, {passes} passes...");

    let start = std::time::Instant::now();
    for _ in 0..passes {
        tracer.render(&scene)?;
    }
    println!(
        "Accumulated {} samples in {:?}",
        tracer.num_samples(),
        start.elapsed()
    );

    let filename = "progressive.png";
    output::save_png(&tracer.film(), filename)?;
    println!("Saved to {filename}");

    Ok(())
}

fn build_scene(device: &Device) -> Scene {
    let mut scene = Scene::new(device);
    scene.set_background_color(Color::new(0.7, 0.8, 1.0));
    scene.set_background_alpha(1.0);

    // Ground sphere
    let mut ground = SphereGeometry::new();
    ground.push(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Color::new(0.5, 0.5, 0.5),
    );
    scene.attach(ground);

    // A loose grid of colored particles with dark outlines
    let mut particles = SphereGeometry::new();
    particles.set_outline(0.05, Color::ZERO);

    use rand::Rng;
    let mut rng = rand::thread_rng();

    for a in -4..4 {
        for b in -4..4 {
            let center = Vec3::new(
                a as f32 + 0.8 * rng.gen::<f32>(),
                0.35,
                b as f32 + 0.8 * rng.gen::<f32>(),
            );
            let color = Color::new(
                0.2 + 0.8 * rng.gen::<f32>(),
                0.2 + 0.8 * rng.gen::<f32>(),
                0.2 + 0.8 * rng.gen::<f32>(),
            );
            particles.push(center, 0.35, color);
        }
    }

    // One larger showcase sphere in the middle
    particles.push(Vec3::new(0.0, 1.0, 0.0), 1.0, Color::new(0.9, 0.6, 0.2));

    println!("Created {} particles", particles.len());
    scene.attach(particles);
    scene
}
