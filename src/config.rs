//! Pipeline configuration

use crate::algorithms::DEFAULT_MIN_PARALLEL_WIDTH;
use std::fmt;

/// Which compute backend to acquire at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum BackendPreference {
    /// GPU if available, otherwise CPU wavefront, otherwise sequential
    #[default]
    Auto,
    /// GPU only; acquisition failures are reported, not degraded
    Gpu,
    /// CPU wavefront on rayon
    Parallel,
    /// Row-major scan on the calling thread
    Sequential,
}

impl fmt::Display for BackendPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Gpu => "gpu",
            Self::Parallel => "parallel",
            Self::Sequential => "sequential",
        };
        f.write_str(name)
    }
}

/// Settings for backend acquisition and the CPU wavefront
///
/// # Example
///
/// ```
/// use trueno_lcs::{BackendPreference, LcsConfig};
///
/// let config = LcsConfig::default()
///     .with_backend(BackendPreference::Parallel)
///     .with_threads(4);
/// assert_eq!(config.threads, Some(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcsConfig {
    /// Backend to acquire
    pub backend: BackendPreference,

    /// Worker threads for the CPU wavefront (`None` = rayon's global pool)
    pub threads: Option<usize>,

    /// Narrowest diagonal handed to the thread pool
    pub min_parallel_width: usize,
}

impl Default for LcsConfig {
    fn default() -> Self {
        Self {
            backend: BackendPreference::Auto,
            threads: None,
            min_parallel_width: DEFAULT_MIN_PARALLEL_WIDTH,
        }
    }
}

impl LcsConfig {
    /// Set the backend preference
    #[must_use]
    pub fn with_backend(mut self, backend: BackendPreference) -> Self {
        self.backend = backend;
        self
    }

    /// Use a dedicated pool of `threads` workers for the CPU wavefront
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Set the narrowest diagonal handed to the thread pool
    #[must_use]
    pub fn with_min_parallel_width(mut self, width: usize) -> Self {
        self.min_parallel_width = width;
        self
    }
}
