//! Progressive accumulation buffer.
//!
//! The film stores one linear RGBA texel per pixel plus the number of
//! samples folded so far. Folding uses the incremental running mean
//! `m += (x - m) / n` rather than sum-then-divide: the stored value is
//! always the finished mean, drift stays bounded over arbitrarily long
//! accumulations, and no second running-sum buffer is needed.

use glint_math::Rgba;
use log::debug;

use crate::error::RenderError;

/// Output buffer holding the running per-pixel mean of all folded samples.
#[derive(Debug)]
pub struct AccumulationBuffer {
    width: u32,
    height: u32,
    samples: u32,
    data: Vec<Rgba>,
}

impl AccumulationBuffer {
    /// Allocate a zeroed buffer. Fails if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let mut buffer = Self {
            width: 0,
            height: 0,
            samples: 0,
            data: Vec::new(),
        };
        buffer.resize(width, height)?;
        Ok(buffer)
    }

    /// Replace the storage with a zeroed `width` x `height` allocation and
    /// reset the sample counter.
    ///
    /// Validation happens before any mutation: on failure the previous
    /// allocation and counter are untouched.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }

        debug!("resize film to {width}x{height}");
        self.data = vec![Rgba::default(); (width * height) as usize];
        self.width = width;
        self.height = height;
        self.samples = 0;
        Ok(())
    }

    /// Fold one full-frame sample grid into the running mean.
    ///
    /// `grid` holds one sample per pixel in row-major order and must match
    /// the buffer size. The counter advances by exactly one per call.
    pub fn fold(&mut self, grid: &[Rgba]) {
        assert_eq!(
            grid.len(),
            self.data.len(),
            "sample grid does not match film dimensions"
        );

        let n = (self.samples + 1) as f32;
        for (texel, sample) in self.data.iter_mut().zip(grid) {
            *texel = *texel + (*sample - *texel) / n;
        }
        self.samples += 1;
    }

    /// Discard accumulated state: zero the counter and the texels, keeping
    /// the allocation. The next fold lands with full weight and reproduces
    /// its grid exactly.
    pub fn reset(&mut self) {
        self.samples = 0;
        self.data.fill(Rgba::default());
    }

    /// Samples folded since the last reset or resize.
    pub fn samples(&self) -> u32 {
        self.samples
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Immutable view of the film for export.
    pub fn view(&self) -> FilmView<'_> {
        FilmView {
            data: &self.data,
            width: self.width,
            height: self.height,
        }
    }
}

/// Read-only, zero-copy view of the film.
///
/// The layout is dense row-major: height rows of width texels of four
/// floats each, no padding anywhere.
#[derive(Clone, Copy)]
pub struct FilmView<'a> {
    data: &'a [Rgba],
    width: u32,
    height: u32,
}

impl<'a> FilmView<'a> {
    /// `(height, width, channels)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, 4)
    }

    /// Byte strides per (row, texel, channel), matching [`Self::shape`].
    pub fn strides_bytes(&self) -> (usize, usize, usize) {
        let channel = std::mem::size_of::<f32>();
        let texel = 4 * channel;
        (self.width as usize * texel, texel, channel)
    }

    /// The texels in row-major order.
    pub fn as_slice(&self) -> &'a [Rgba] {
        self.data
    }

    /// The same storage as a flat float slice, length `w * h * 4`.
    pub fn as_floats(&self) -> &'a [f32] {
        bytemuck::cast_slice(self.data)
    }

    /// The texel at `(x, y)`, row-major from the top-left.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        self.data[(y * self.width + x) as usize]
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
