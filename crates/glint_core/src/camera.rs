//! Orthographic camera for particle scenes.

use glam::Vec3;
use glint_math::Ray;

/// Orthographic camera.
///
/// Rays leave the image plane in parallel: the origin slides across the
/// plane with the screen coordinates while the direction stays fixed. The
/// basis stored here is orthonormal; the constructors re-derive `up` from
/// `direction x up` so slightly skewed input vectors still produce a valid
/// frame.
///
/// Screen coordinates `(xs, ys)` are expressed relative to the image-plane
/// height: `ys` spans [-0.5, 0.5] top to bottom and `xs` spans the same
/// range scaled by the aspect ratio.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    position: Vec3,
    direction: Vec3,
    up: Vec3,
    right: Vec3,
    height: f32,
}

impl Camera {
    /// Create a camera at `position` facing `direction`.
    ///
    /// `height` is the world-space height of the image plane. `direction`
    /// and `up` need not be normalized or exactly perpendicular.
    pub fn new(position: Vec3, direction: Vec3, up: Vec3, height: f32) -> Self {
        let direction = direction.normalize();
        let right = direction.cross(up.normalize()).normalize();
        let up = right.cross(direction).normalize();

        Self {
            position,
            direction,
            up,
            right,
            height,
        }
    }

    /// Create a camera at `position` looking at `target`.
    pub fn look_at(position: Vec3, target: Vec3, up: Vec3, height: f32) -> Self {
        Self::new(position, target - position, up, height)
    }

    /// The primary ray for screen coordinates `(xs, ys)`.
    #[inline]
    pub fn ray(&self, xs: f32, ys: f32) -> Ray {
        let origin = self.position + (ys * self.up + xs * self.right) * self.height;
        Ray::new(origin, self.direction)
    }

    /// Center of the image plane.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// View direction (normalized).
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// World-space height of the image plane.
    pub fn height(&self) -> f32 {
        self.height
    }
}

impl Default for Camera {
    /// At the origin, looking down -Z with +Y up, image plane 2 units tall.
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, 2.0)
    }
}
