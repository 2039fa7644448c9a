//! GLINT core - device, camera, and scene types for particle rendering.
//!
//! This crate provides:
//!
//! - **`Device`**: a cloneable handle to the rendering backend, compared by
//!   identity, optionally pinning a worker thread pool
//! - **`Camera`**: the orthographic view model producing one primary ray
//!   per pixel
//! - **`Scene`**: sphere geometry lists with per-primitive colors, bound to
//!   a device for compatibility checks

pub mod camera;
pub mod device;
pub mod scene;

// Re-export commonly used types
pub use camera::Camera;
pub use device::{Device, DeviceError};
pub use scene::{HitRecord, Scene, Sphere, SphereGeometry};
