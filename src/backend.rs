//! Compute backend handle
//!
//! The backend is acquired once at startup, passed explicitly to every
//! pipeline entry point, and released at shutdown. There is no process-wide
//! device state.
//!
//! ```text
//!   Auto ──▶ Gpu ──(no device / build failure)──▶ Parallel ──(no pool)──▶ Sequential
//! ```

use crate::algorithms::{
    fill_row_major, fill_wavefront, CancelToken, FillReport, ParallelWavefront,
};
use crate::config::{BackendPreference, LcsConfig};
use crate::error::{LcsError, Result};
use crate::storage::{DpTable, EncodedPair};
use std::fmt;

#[cfg(feature = "gpu")]
use crate::gpu::GpuWavefront;

/// Which engine produced a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// wgpu compute dispatch per diagonal
    Gpu,
    /// rayon data-parallel diagonals
    Parallel,
    /// Row-major scan on the calling thread
    Sequential,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Gpu => "gpu",
            Self::Parallel => "parallel",
            Self::Sequential => "sequential",
        };
        f.write_str(name)
    }
}

/// An acquired compute backend
#[derive(Debug)]
pub enum ComputeBackend {
    /// GPU wavefront (device, compiled kernel)
    #[cfg(feature = "gpu")]
    Gpu(Box<GpuWavefront>),
    /// CPU wavefront on rayon
    Parallel(ParallelWavefront),
    /// Sequential row-major fallback
    Sequential,
}

impl ComputeBackend {
    /// Acquire the backend named by `config`
    ///
    /// `Auto` never fails: GPU acquisition or kernel build failures are logged
    /// and the next backend in the chain is tried. An explicit `Gpu`
    /// preference reports those failures instead.
    ///
    /// # Errors
    ///
    /// With `BackendPreference::Gpu`: `DeviceUnavailable` or `Build`.
    pub async fn acquire(config: &LcsConfig) -> Result<Self> {
        let backend = match config.backend {
            BackendPreference::Gpu => Self::gpu().await?,
            BackendPreference::Sequential => Self::Sequential,
            BackendPreference::Parallel => Self::parallel_or_sequential(config),
            BackendPreference::Auto => match Self::gpu().await {
                Ok(gpu) => gpu,
                Err(err) => {
                    log::warn!("GPU backend unavailable ({err}); using CPU wavefront");
                    Self::parallel_or_sequential(config)
                }
            },
        };

        log::info!("compute backend: {}", backend.kind());
        Ok(backend)
    }

    #[cfg(feature = "gpu")]
    async fn gpu() -> Result<Self> {
        let gpu = GpuWavefront::acquire().await?;
        Ok(Self::Gpu(Box::new(gpu)))
    }

    #[cfg(not(feature = "gpu"))]
    #[allow(clippy::unused_async)]
    async fn gpu() -> Result<Self> {
        Err(LcsError::DeviceUnavailable(
            "built without the `gpu` feature".to_string(),
        ))
    }

    /// CPU wavefront per `config`
    ///
    /// # Errors
    ///
    /// Returns `DeviceUnavailable` if a dedicated thread pool cannot be built
    pub fn parallel(config: &LcsConfig) -> Result<Self> {
        let executor = match config.threads {
            Some(threads) => ParallelWavefront::with_threads(threads, config.min_parallel_width)?,
            None => ParallelWavefront::new(config.min_parallel_width),
        };
        Ok(Self::Parallel(executor))
    }

    fn parallel_or_sequential(config: &LcsConfig) -> Self {
        Self::parallel(config).unwrap_or_else(|err| {
            log::warn!("CPU wavefront unavailable ({err}); using sequential fill");
            Self::Sequential
        })
    }

    /// Which engine this handle drives
    #[must_use]
    pub fn kind(&self) -> BackendKind {
        match self {
            #[cfg(feature = "gpu")]
            Self::Gpu(_) => BackendKind::Gpu,
            Self::Parallel(_) => BackendKind::Parallel,
            Self::Sequential => BackendKind::Sequential,
        }
    }

    /// Fill a freshly initialized `table` on this backend
    ///
    /// No fallback happens here; see [`crate::pipeline::fill_with_fallback`].
    ///
    /// # Errors
    ///
    /// Propagates executor, shape and cancellation errors unchanged.
    pub fn fill(
        &mut self,
        pair: &EncodedPair,
        table: &mut DpTable,
        cancel: &CancelToken,
    ) -> Result<FillReport> {
        match self {
            #[cfg(feature = "gpu")]
            Self::Gpu(gpu) => fill_wavefront(gpu.as_mut(), pair, table, cancel),
            Self::Parallel(executor) => fill_wavefront(executor, pair, table, cancel),
            Self::Sequential => fill_row_major(pair, table, cancel),
        }
    }

    /// Replace this backend with the sequential fallback after a failure
    pub fn degrade(&mut self, reason: &LcsError) {
        if matches!(self, Self::Sequential) {
            return;
        }
        log::warn!(
            "{} backend failed ({reason}); degrading to sequential fill",
            self.kind()
        );
        *self = Self::Sequential;
    }

    /// Release device resources
    pub fn release(self) {
        log::debug!("releasing {} backend", self.kind());
        drop(self);
    }
}
