//! Anti-diagonal wavefront fill
//!
//! Cells sharing `d = i + j` depend only on diagonals `d - 1` and `d - 2`, so
//! each diagonal is one stage of mutually independent work. Stages run in
//! order `d = 2 ..= m + n` with a barrier between them:
//!
//! ```text
//!          j=1  j=2  j=3
//!   i=1    d2   d3   d4
//!   i=2    d3   d4   d5        stage widths: 1, 2, 2, 1
//! ```
//!
//! Dispatching the whole grid at once is not equivalent: a unit may read a
//! neighbor before it has been written. Executors must only ever see one
//! stage at a time.

use super::{check_shape, CancelToken, FillReport};
use crate::backend::BackendKind;
use crate::error::{LcsError, Result};
use crate::storage::{DpTable, EncodedPair};

/// One anti-diagonal: the cells `(i, diagonal - i)` for `i` in `first_row..=last_row`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagonalStage {
    /// Diagonal index `d = i + j`
    pub diagonal: usize,
    /// Smallest row on this diagonal inside the interior
    pub first_row: usize,
    /// Largest row on this diagonal inside the interior
    pub last_row: usize,
}

impl DiagonalStage {
    /// Interior cells of diagonal `d` in an `m x n` problem, if any
    #[must_use]
    pub fn new(diagonal: usize, m: usize, n: usize) -> Option<Self> {
        let first_row = diagonal.saturating_sub(n).max(1);
        let last_row = m.min(diagonal.saturating_sub(1));

        (first_row <= last_row).then_some(Self {
            diagonal,
            first_row,
            last_row,
        })
    }

    /// Number of cells in this stage
    #[must_use]
    pub const fn width(&self) -> usize {
        self.last_row - self.first_row + 1
    }

    /// `(i, j)` coordinates of the stage's cells
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let d = self.diagonal;
        (self.first_row..=self.last_row).map(move |i| (i, d - i))
    }
}

/// All stages of an `m x n` fill, in dependency order
///
/// Empty when either sequence is empty.
pub fn diagonal_stages(m: usize, n: usize) -> impl Iterator<Item = DiagonalStage> {
    (2..=m + n).filter_map(move |d| DiagonalStage::new(d, m, n))
}

/// A concurrent engine that evaluates one diagonal stage at a time
///
/// `run_stage` must not return until every cell of the stage is committed;
/// that return is the barrier the orchestration loop relies on.
pub trait StageExecutor {
    /// Which backend this executor represents
    fn kind(&self) -> BackendKind;

    /// Make the pair and padded table available to the executor
    ///
    /// # Errors
    ///
    /// Backend-specific allocation or upload failure.
    fn prepare(&mut self, pair: &EncodedPair, table: &DpTable) -> Result<()>;

    /// Evaluate every cell of `stage` and wait for completion
    ///
    /// # Errors
    ///
    /// Backend-specific dispatch failure.
    fn run_stage(
        &mut self,
        pair: &EncodedPair,
        table: &mut DpTable,
        stage: DiagonalStage,
    ) -> Result<()>;

    /// Bring all committed stages back into `table`
    ///
    /// # Errors
    ///
    /// Backend-specific readback failure.
    fn finish(&mut self, table: &mut DpTable) -> Result<()>;
}

/// Fill `table` stage by stage on `executor`
///
/// # Errors
///
/// - `Index` if the table shape does not match the pair
/// - `Cancelled` if `cancel` fires; the table is synced and consistent up to
///   the last completed diagonal
/// - any error raised by the executor
pub fn fill_wavefront<E: StageExecutor + ?Sized>(
    executor: &mut E,
    pair: &EncodedPair,
    table: &mut DpTable,
    cancel: &CancelToken,
) -> Result<FillReport> {
    check_shape(pair, table)?;

    let mut report = FillReport {
        backend: executor.kind(),
        stages: 0,
        cells: 0,
    };

    if pair.m() == 0 || pair.n() == 0 {
        return Ok(report);
    }

    executor.prepare(pair, table)?;

    for stage in diagonal_stages(pair.m(), pair.n()) {
        if cancel.is_cancelled() {
            executor.finish(table)?;
            return Err(LcsError::Cancelled {
                completed_stages: report.stages,
            });
        }

        log::trace!(
            "{} stage d={} rows {}..={} ({} cells)",
            report.backend,
            stage.diagonal,
            stage.first_row,
            stage.last_row,
            stage.width()
        );
        executor.run_stage(pair, table, stage)?;

        report.stages += 1;
        report.cells += stage.width();
    }

    executor.finish(table)?;
    Ok(report)
}
