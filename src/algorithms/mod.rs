//! Fill and traceback algorithms
//!
//! - `sequential`: row-major reference fill (and fallback)
//! - `wavefront`: anti-diagonal stage orchestration over a [`StageExecutor`]
//! - `parallel`: rayon executor for the wavefront
//! - `traceback`: fixed tie-break reconstruction of one LCS

pub mod cancel;
pub mod parallel;
pub mod sequential;
pub mod traceback;
pub mod wavefront;

pub use cancel::CancelToken;
pub use parallel::{ParallelWavefront, DEFAULT_MIN_PARALLEL_WIDTH};
pub use sequential::fill_row_major;
pub use traceback::{traceback, traceback_steps, TracebackStep};
pub use wavefront::{diagonal_stages, fill_wavefront, DiagonalStage, StageExecutor};

use crate::backend::BackendKind;
use crate::error::{LcsError, Result};
use crate::storage::{DpTable, EncodedPair};

/// Summary of one completed fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillReport {
    /// Backend that produced the table
    pub backend: BackendKind,
    /// Sequential stages executed (diagonals for wavefront, rows for row-major)
    pub stages: usize,
    /// Interior cells written
    pub cells: usize,
}

fn check_shape(pair: &EncodedPair, table: &DpTable) -> Result<()> {
    if table.m() == pair.m() && table.n() == pair.n() {
        Ok(())
    } else {
        Err(LcsError::Index {
            row: pair.m(),
            col: pair.n(),
            rows: table.rows(),
            cols: table.cols(),
        })
    }
}
