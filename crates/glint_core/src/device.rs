//! Rendering device handle.
//!
//! A `Device` stands in for the execution backend a session renders on.
//! Scenes and tracers each hold a clone of the handle; compatibility is a
//! pointer-identity check, never a value comparison, so two devices created
//! with identical settings are still distinct devices.

use log::debug;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while setting up a device.
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("failed to start worker thread pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

struct DeviceInner {
    /// Pinned worker pool; `None` means the process-global pool
    pool: Option<rayon::ThreadPool>,
    limit: Option<usize>,
}

/// Cloneable handle to a rendering device.
///
/// All clones refer to the same device; [`Device::is_same`] tells handles
/// to the same device apart from handles to different ones.
#[derive(Clone)]
pub struct Device {
    inner: Arc<DeviceInner>,
}

impl Device {
    /// Create a device that uses all available CPU cores.
    pub fn new() -> Self {
        debug!("create device (all cores)");
        Self {
            inner: Arc::new(DeviceInner {
                pool: None,
                limit: None,
            }),
        }
    }

    /// Create a device pinned to at most `limit` worker threads.
    pub fn with_cpu_limit(limit: usize) -> Result<Self, DeviceError> {
        debug!("create device (limit {limit} cores)");
        let pool = rayon::ThreadPoolBuilder::new().num_threads(limit).build()?;
        Ok(Self {
            inner: Arc::new(DeviceInner {
                pool: Some(pool),
                limit: Some(limit),
            }),
        })
    }

    /// Run `op` inside this device's worker pool.
    ///
    /// Parallel iterators invoked by `op` execute on the pinned pool when
    /// one exists, otherwise on the global pool.
    pub fn run<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match &self.inner.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    /// The configured worker limit, if any.
    pub fn cpu_limit(&self) -> Option<usize> {
        self.inner.limit
    }

    /// True when both handles refer to the same device.
    pub fn is_same(&self, other: &Device) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Device {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("limit", &self.inner.limit)
            .finish()
    }
}
