//! Renderer error types.

use thiserror::Error;

/// Errors raised by render sessions and their output buffers.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RenderError {
    /// The output buffer cannot have a zero-sized dimension.
    #[error("invalid output dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The scene is bound to a different device than the session.
    #[error("scene and tracer are attached to different devices")]
    DeviceMismatch,
}
