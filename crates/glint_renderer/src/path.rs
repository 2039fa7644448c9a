//! Progressive path tracer.
//!
//! Every call to [`PathTracer::render`] takes one stochastic sample per
//! pixel and folds it into the film's running average. Many calls converge
//! toward a noise-free image. The tracer cannot tell when the camera or
//! scene changed; callers must [`PathTracer::reset`] to start a fresh
//! accumulation for a new view (leaving it out blends exposures, which is
//! occasionally the desired output).

use glint_core::{Camera, Device, HitRecord, Scene};
use glint_math::{Color, Interval, Ray, Rgba};
use log::debug;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::accum::FilmView;
use crate::error::RenderError;
use crate::raygen::{random_unit_vector, RayGen};
use crate::tracer::Tracer;

/// Near clip for rays cast during traversal, in scene units.
///
/// Deliberately looser than the intersector's own self-intersection guard:
/// this one suppresses re-hits of the surface a bounce just left.
const RAY_TNEAR: f32 = 1e-3;

/// Sampling configuration for a [`PathTracer`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Base seed of the per-pixel random streams
    pub seed: u32,
    /// Light-path samples averaged into each per-pixel sample
    pub light_samples: u32,
    /// Bounce budget per light-path sample
    pub max_depth: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            light_samples: 1,
            max_depth: 50,
        }
    }
}

/// Progressive path-tracing session.
pub struct PathTracer {
    tracer: Tracer,
    seed: u32,
    light_samples: u32,
    max_depth: u32,
}

impl PathTracer {
    /// Create a session on `device` with a `width` x `height` film.
    pub fn new(
        device: &Device,
        width: u32,
        height: u32,
        settings: RenderSettings,
    ) -> Result<Self, RenderError> {
        Ok(Self {
            tracer: Tracer::new(device, width, height)?,
            seed: settings.seed,
            light_samples: settings.light_samples.max(1),
            max_depth: settings.max_depth,
        })
    }

    /// Take one sample per pixel and fold it into the film.
    ///
    /// The grid is sampled in parallel on the session device; the fold and
    /// the counter increment happen once per call, after every pixel of
    /// the pass has finished. The externally visible sample count therefore
    /// advances by exactly one per call no matter how many light samples
    /// were averaged internally.
    pub fn render(&mut self, scene: &Scene) -> Result<(), RenderError> {
        self.tracer.check_scene(scene)?;

        let width = self.tracer.film_ref().width();
        let height = self.tracer.film_ref().height();
        // the first sample after a reset is sample 1
        let sample = self.tracer.film_ref().samples() + 1;
        let camera = *self.tracer.camera();
        let seed = self.seed;
        let light_samples = self.light_samples;
        let max_depth = self.max_depth;

        debug!("render pass {sample}: {width}x{height}, {light_samples} light samples");

        let mut grid = vec![Rgba::default(); (width * height) as usize];
        self.tracer.device().run(|| {
            grid.par_chunks_mut(width as usize)
                .enumerate()
                .for_each(|(j, row)| {
                    for (i, texel) in row.iter_mut().enumerate() {
                        let gen = RayGen::new(i as u32, j as u32, width, height, seed);
                        *texel =
                            sample_pixel(scene, &camera, &gen, sample, light_samples, max_depth);
                    }
                });
        });

        self.tracer.film_mut().fold(&grid);
        Ok(())
    }

    /// Discard accumulated samples and start a fresh run.
    ///
    /// The film keeps its dimensions. The seed advances by one so the new
    /// run does not retrace the sequence the old one already averaged.
    pub fn reset(&mut self) {
        debug!("reset accumulation");
        self.seed = self.seed.wrapping_add(1);
        self.tracer.film_mut().reset();
    }

    /// Samples folded since the last reset or resize.
    pub fn num_samples(&self) -> u32 {
        self.tracer.film_ref().samples()
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Change the random seed. Takes effect on the next render; the
    /// accumulated image is kept until an explicit reset.
    pub fn set_seed(&mut self, seed: u32) {
        self.seed = seed;
    }

    pub fn light_samples(&self) -> u32 {
        self.light_samples
    }

    /// Change the light-sample count. Takes effect on the next render and
    /// never resets accumulated state.
    pub fn set_light_samples(&mut self, light_samples: u32) {
        self.light_samples = light_samples.max(1);
    }

    /// Resize the film, discarding accumulated state.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.tracer.resize(width, height)
    }

    /// Store the camera used by subsequent renders. Never resets.
    pub fn set_camera(&mut self, camera: Camera) {
        self.tracer.set_camera(camera);
    }

    /// Read view of the film.
    pub fn film(&self) -> FilmView<'_> {
        self.tracer.film()
    }
}

/// One per-pixel RGBA sample: the mean over the configured light samples.
fn sample_pixel(
    scene: &Scene,
    camera: &Camera,
    gen: &RayGen,
    sample: u32,
    light_samples: u32,
    max_depth: u32,
) -> Rgba {
    let loc = gen.sample_aa(sample);
    let primary = camera.ray(loc.x, loc.y);

    // the primary hit is shared by every light sample of this pass
    let Some(first_hit) = scene.hit(&primary, Interval::new(RAY_TNEAR, f32::INFINITY)) else {
        return Rgba::new(scene.background_color(), scene.background_alpha());
    };

    let mut result = Color::ZERO;
    for light_sample in 0..light_samples {
        let mut rng = gen.path_rng(sample, light_sample);
        result += trace_path(scene, first_hit, max_depth, &mut rng);
    }

    Rgba::new(result / light_samples as f32, 1.0)
}

/// Walk one light path from an already-resolved primary hit.
///
/// Surfaces scatter diffusely: cosine-weighted bounce directions with the
/// primitive color as albedo, so the estimator needs no explicit pdf
/// weight. A path contributes once it escapes to the background, which
/// doubles as the environment light.
fn trace_path(scene: &Scene, first_hit: HitRecord, max_depth: u32, rng: &mut StdRng) -> Color {
    let mut attenuation = Color::ONE;
    let mut hit = first_hit;

    for _ in 0..max_depth {
        attenuation *= hit.color;

        let mut direction = hit.normal + random_unit_vector(rng);
        if direction.length_squared() < 1e-8 {
            // degenerate scatter straight back along the normal
            direction = hit.normal;
        }
        let ray = Ray::new(hit.point, direction.normalize());

        match scene.hit(&ray, Interval::new(RAY_TNEAR, f32::INFINITY)) {
            Some(next) => hit = next,
            None => return attenuation * scene.background_color(),
        }
    }

    // bounce budget exhausted before reaching the light
    Color::ZERO
}
