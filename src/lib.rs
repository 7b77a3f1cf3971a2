//! trueno-lcs: wavefront-parallel longest common subsequence
//!
//! # Overview
//!
//! trueno-lcs fills the LCS dynamic-programming table one anti-diagonal at a
//! time on a GPU (wgpu) or a CPU thread pool (rayon), then reconstructs one
//! longest common subsequence with a fixed tie-break traceback.
//!
//! # Quick Start
//!
//! ```
//! use trueno_lcs::{compute_lcs, BackendPreference, ComputeBackend, LcsConfig, SequencePair};
//!
//! # async fn example() -> Result<(), trueno_lcs::LcsError> {
//! // Acquire once at startup (GPU when available, CPU wavefront otherwise)
//! let mut backend = ComputeBackend::acquire(&LcsConfig::default()).await?;
//!
//! let pair = SequencePair::from_strs("ABCBDAB", "BDCABA");
//! let outcome = compute_lcs(&mut backend, &pair)?;
//! assert_eq!(outcome.as_string(), "BCBA");
//!
//! backend.release();
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Storage**: [`SequencePair`], symbol codes ([`EncodedPair`]) and the padded [`DpTable`]
//! - **Algorithms**: row-major reference fill, wavefront orchestration, traceback
//! - **Backend**: [`ComputeBackend`] selected at startup, degrading to the sequential fill
//! - **GPU** (feature `gpu`): WGSL stage kernel dispatched once per diagonal

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod algorithms;
pub mod backend;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod storage;

// GPU acceleration (optional)
#[cfg(feature = "gpu")]
pub mod gpu;

// Re-export core types
pub use algorithms::{traceback, CancelToken, FillReport};
pub use backend::{BackendKind, ComputeBackend};
pub use config::{BackendPreference, LcsConfig};
pub use pipeline::{compute_lcs, compute_lcs_with_cancel, verify_against_sequential, LcsOutcome};
pub use storage::{DpTable, EncodedPair, SequencePair, SENTINEL};

#[cfg(feature = "gpu")]
pub use gpu::{GpuDevice, GpuMemoryLimits, GpuWavefront, WavefrontKernel};

// Error type
pub use error::{LcsError, Result};
