//! Render session shared by all tracers.
//!
//! A `Tracer` owns what every concrete renderer needs: the device binding,
//! the camera, and the accumulation film. Concrete tracers embed one and
//! call [`Tracer::check_scene`] before touching the film, so a mismatched
//! scene can never mutate buffer state.

use glint_core::{Camera, Device, Scene};
use log::debug;

use crate::accum::{AccumulationBuffer, FilmView};
use crate::error::RenderError;

/// Common state and contracts of a render session.
#[derive(Debug)]
pub struct Tracer {
    device: Device,
    camera: Camera,
    film: AccumulationBuffer,
}

impl Tracer {
    /// Bind a session to `device` with a `width` x `height` film.
    pub fn new(device: &Device, width: u32, height: u32) -> Result<Self, RenderError> {
        debug!("create tracer {width}x{height}");
        Ok(Self {
            device: device.clone(),
            camera: Camera::default(),
            film: AccumulationBuffer::new(width, height)?,
        })
    }

    /// Verify that `scene` renders on this session's device.
    ///
    /// Called by every concrete tracer before any film mutation; on error
    /// the render call has no side effects.
    pub fn check_scene(&self, scene: &Scene) -> Result<(), RenderError> {
        if !scene.device().is_same(&self.device) {
            return Err(RenderError::DeviceMismatch);
        }
        Ok(())
    }

    /// Resize the film, discarding accumulated state.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.film.resize(width, height)
    }

    /// Store the camera used by subsequent renders.
    ///
    /// Accumulated samples are kept: a caller changing the view must reset
    /// explicitly, otherwise old and new viewpoints blend together (which
    /// is also how multiple-exposure output is produced on purpose).
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Read view of the film.
    pub fn film(&self) -> FilmView<'_> {
        self.film.view()
    }

    pub(crate) fn film_ref(&self) -> &AccumulationBuffer {
        &self.film
    }

    pub(crate) fn film_mut(&mut self) -> &mut AccumulationBuffer {
        &mut self.film
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_dimensions() {
        let device = Device::new();
        assert_eq!(
            Tracer::new(&device, 0, 10).unwrap_err(),
            RenderError::InvalidDimensions {
                width: 0,
                height: 10
            }
        );
    }

    #[test]
    fn test_check_scene_device_identity() {
        let device = Device::new();
        let other = Device::new();
        let tracer = Tracer::new(&device, 8, 8).unwrap();

        assert!(tracer.check_scene(&Scene::new(&device)).is_ok());
        assert_eq!(
            tracer.check_scene(&Scene::new(&other)).unwrap_err(),
            RenderError::DeviceMismatch
        );
    }

    #[test]
    fn test_set_camera_keeps_film() {
        let device = Device::new();
        let mut tracer = Tracer::new(&device, 4, 4).unwrap();
        tracer
            .film_mut()
            .fold(&vec![glint_math::Rgba::default(); 16]);

        tracer.set_camera(Camera::default());
        assert_eq!(tracer.film().shape(), (4, 4, 4));
        assert_eq!(tracer.film_ref().samples(), 1);
    }
}
