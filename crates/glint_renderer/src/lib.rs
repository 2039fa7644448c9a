//! GLINT renderer - progressive path tracing for particle scenes.
//!
//! Scientific visualization scenes are mostly spheres: molecules, colloids,
//! point clouds. This crate renders them by repeatedly sampling light paths
//! and averaging the results, so an image sharpens the longer it runs.
//!
//! The pieces:
//!
//! - [`AccumulationBuffer`]: the film, a running per-pixel mean with an
//!   exact incremental update
//! - [`Tracer`]: session state shared by all renderers (device binding,
//!   camera, film)
//! - [`PathTracer`]: one stochastic sample per pixel per call, folded into
//!   the film
//! - [`PreviewTracer`]: deterministic flat shading for framing shots
//! - [`output`]: sRGB conversion and PNG export of the film

pub mod accum;
pub mod error;
pub mod output;
pub mod path;
pub mod preview;
pub mod raygen;
pub mod tracer;

pub use accum::{AccumulationBuffer, FilmView};
pub use error::RenderError;
pub use path::{PathTracer, RenderSettings};
pub use preview::PreviewTracer;
pub use raygen::RayGen;
pub use tracer::Tracer;

// Re-export the scene-facing types so most callers need one import
pub use glint_core::{Camera, Device, DeviceError, Scene, SphereGeometry};
pub use glint_math::{Color, Rgba, Vec3};
