//! Flat-shaded preview tracer.
//!
//! One deterministic ray through each pixel center, no jitter, no bounces.
//! Useful for framing a scene before committing to a progressive run. Each
//! call overwrites the film, so the preview never blends with older output.

use glint_core::{Device, Scene};
use glint_math::{Interval, Rgba};
use log::debug;
use rayon::prelude::*;

use crate::accum::FilmView;
use crate::error::RenderError;
use crate::tracer::Tracer;

/// Near clip for preview rays, in scene units.
const RAY_TNEAR: f32 = 1e-3;

/// Single-sample flat-shading session.
pub struct PreviewTracer {
    tracer: Tracer,
}

impl PreviewTracer {
    /// Create a session on `device` with a `width` x `height` film.
    pub fn new(device: &Device, width: u32, height: u32) -> Result<Self, RenderError> {
        Ok(Self {
            tracer: Tracer::new(device, width, height)?,
        })
    }

    /// Render the scene, overwriting any previous image.
    pub fn render(&mut self, scene: &Scene) -> Result<(), RenderError> {
        self.tracer.check_scene(scene)?;

        let width = self.tracer.film_ref().width();
        let height = self.tracer.film_ref().height();
        let camera = *self.tracer.camera();

        debug!("preview pass: {width}x{height}");

        let mut grid = vec![Rgba::default(); (width * height) as usize];
        self.tracer.device().run(|| {
            grid.par_chunks_mut(width as usize)
                .enumerate()
                .for_each(|(j, row)| {
                    for (i, texel) in row.iter_mut().enumerate() {
                        // pixel centers, same screen mapping as the sampler
                        let i_f = i as f32 + 0.5;
                        let j_f = j as f32 + 0.5;
                        let ys = -1.0 * (j_f / height as f32 - 0.5);
                        let xs =
                            i_f / height as f32 - 0.5 * width as f32 / height as f32;

                        let ray = camera.ray(xs, ys);
                        *texel = match scene.hit(&ray, Interval::new(RAY_TNEAR, f32::INFINITY))
                        {
                            Some(hit) => {
                                // headlight shading
                                let shade = hit.normal.dot(-ray.direction).max(0.0);
                                Rgba::new(hit.color * shade, 1.0)
                            }
                            None => {
                                Rgba::new(scene.background_color(), scene.background_alpha())
                            }
                        };
                    }
                });
        });

        // overwrite semantics: the single fold lands with full weight
        let film = self.tracer.film_mut();
        film.reset();
        film.fold(&grid);
        Ok(())
    }

    /// Resize the film.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.tracer.resize(width, height)
    }

    /// Store the camera used by subsequent renders.
    pub fn set_camera(&mut self, camera: glint_core::Camera) {
        self.tracer.set_camera(camera);
    }

    /// Read view of the film.
    pub fn film(&self) -> FilmView<'_> {
        self.tracer.film()
    }
}
