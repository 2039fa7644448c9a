//! Color types for the linear-light film and its sRGB export.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::ops::{Add, AddAssign, Div, Mul, Sub};

/// Linear RGB color (values typically 0-1, unbounded above for radiance)
pub type Color = Vec3;

/// One film texel: linear RGB radiance plus coverage alpha.
///
/// `#[repr(C)]` and `Pod` so a film row is also a dense `[f32]` slice,
/// which is what the zero-copy export path hands out.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Construct from a linear RGB color and an alpha value.
    #[inline]
    pub fn new(color: Color, a: f32) -> Self {
        Self {
            r: color.x,
            g: color.y,
            b: color.z,
            a,
        }
    }

    /// The RGB channels as a color vector.
    #[inline]
    pub fn rgb(&self) -> Color {
        Color::new(self.r, self.g, self.b)
    }

    /// Convert to 8-bit sRGB; alpha stays linear.
    pub fn to_srgb8(&self) -> [u8; 4] {
        [
            (linear_to_srgb(self.r).clamp(0.0, 1.0) * 255.0).round() as u8,
            (linear_to_srgb(self.g).clamp(0.0, 1.0) * 255.0).round() as u8,
            (linear_to_srgb(self.b).clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }
}

impl Add for Rgba {
    type Output = Rgba;

    #[inline]
    fn add(self, rhs: Rgba) -> Rgba {
        Rgba {
            r: self.r + rhs.r,
            g: self.g + rhs.g,
            b: self.b + rhs.b,
            a: self.a + rhs.a,
        }
    }
}

impl AddAssign for Rgba {
    #[inline]
    fn add_assign(&mut self, rhs: Rgba) {
        *self = *self + rhs;
    }
}

impl Sub for Rgba {
    type Output = Rgba;

    #[inline]
    fn sub(self, rhs: Rgba) -> Rgba {
        Rgba {
            r: self.r - rhs.r,
            g: self.g - rhs.g,
            b: self.b - rhs.b,
            a: self.a - rhs.a,
        }
    }
}

impl Mul<f32> for Rgba {
    type Output = Rgba;

    #[inline]
    fn mul(self, rhs: f32) -> Rgba {
        Rgba {
            r: self.r * rhs,
            g: self.g * rhs,
            b: self.b * rhs,
            a: self.a * rhs,
        }
    }
}

impl Div<f32> for Rgba {
    type Output = Rgba;

    #[inline]
    fn div(self, rhs: f32) -> Rgba {
        self * (1.0 / rhs)
    }
}

/// The sRGB transfer function applied to one linear channel.
pub fn linear_to_srgb(x: f32) -> f32 {
    if x <= 0.0031308 {
        12.92 * x
    } else {
        1.055 * x.powf(1.0 / 2.4) - 0.055
    }
}
