//! CPU wavefront executor on rayon
//!
//! Each stage is evaluated as a parallel map over the diagonal's rows against
//! the immutable table, then committed in one pass. The `collect` joins every
//! worker before the commit starts, which is the stage barrier; no cell of
//! diagonal `d + 1` can be evaluated while diagonal `d` is in flight.

use super::wavefront::{DiagonalStage, StageExecutor};
use crate::backend::BackendKind;
use crate::error::{LcsError, Result};
use crate::storage::{DpTable, EncodedPair};
use rayon::prelude::*;

/// Default minimum stage width dispatched to the thread pool
///
/// Narrower stages (the tips of the wavefront) run on the calling thread.
pub const DEFAULT_MIN_PARALLEL_WIDTH: usize = 64;

/// Data-parallel diagonal executor
#[derive(Debug)]
pub struct ParallelWavefront {
    pool: Option<rayon::ThreadPool>,
    min_parallel_width: usize,
}

impl ParallelWavefront {
    /// Executor on rayon's global pool
    #[must_use]
    pub fn new(min_parallel_width: usize) -> Self {
        Self {
            pool: None,
            min_parallel_width: min_parallel_width.max(1),
        }
    }

    /// Executor on a dedicated pool of `threads` workers
    ///
    /// # Errors
    ///
    /// Returns `DeviceUnavailable` if the pool cannot be built.
    pub fn with_threads(threads: usize, min_parallel_width: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|idx| format!("lcs-wavefront-{idx}"))
            .build()
            .map_err(|e| LcsError::DeviceUnavailable(format!("thread pool: {e}")))?;

        Ok(Self {
            pool: Some(pool),
            min_parallel_width: min_parallel_width.max(1),
        })
    }

    /// Number of worker threads stages are spread over
    #[must_use]
    pub fn threads(&self) -> usize {
        self.pool
            .as_ref()
            .map_or_else(rayon::current_num_threads, rayon::ThreadPool::current_num_threads)
    }

    /// Minimum stage width dispatched to the pool
    #[must_use]
    pub const fn min_parallel_width(&self) -> usize {
        self.min_parallel_width
    }

    fn evaluate_stage(pair: &EncodedPair, table: &DpTable, stage: DiagonalStage) -> Vec<i32> {
        let d = stage.diagonal;
        (stage.first_row..=stage.last_row)
            .into_par_iter()
            .map(|i| table.evaluate(i, d - i, pair.matches(i, d - i)))
            .collect()
    }
}

impl Default for ParallelWavefront {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_PARALLEL_WIDTH)
    }
}

impl StageExecutor for ParallelWavefront {
    fn kind(&self) -> BackendKind {
        BackendKind::Parallel
    }

    fn prepare(&mut self, _pair: &EncodedPair, _table: &DpTable) -> Result<()> {
        // Table lives in host memory already
        Ok(())
    }

    fn run_stage(
        &mut self,
        pair: &EncodedPair,
        table: &mut DpTable,
        stage: DiagonalStage,
    ) -> Result<()> {
        let values: Vec<i32> = if stage.width() < self.min_parallel_width {
            stage
                .cells()
                .map(|(i, j)| table.evaluate(i, j, pair.matches(i, j)))
                .collect()
        } else {
            let snapshot = &*table;
            match &self.pool {
                Some(pool) => pool.install(|| Self::evaluate_stage(pair, snapshot, stage)),
                None => Self::evaluate_stage(pair, snapshot, stage),
            }
        };

        let cols = table.cols();
        let cells = table.as_mut_slice();
        for ((i, j), value) in stage.cells().zip(values) {
            cells[i * cols + j] = value;
        }
        Ok(())
    }

    fn finish(&mut self, _table: &mut DpTable) -> Result<()> {
        Ok(())
    }
}
