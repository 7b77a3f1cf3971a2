//! End-to-end LCS pipeline
//!
//! ```text
//! SequencePair ──encode──▶ EncodedPair
//!      │                        │
//!      │        DpTable::initialize (sentinel + zero border)
//!      │                        │
//!      │        ComputeBackend::fill ──(recoverable error)──▶ fill_row_major
//!      │                        │
//!      └────────▶ traceback ◀───┘
//! ```

use crate::algorithms::{fill_row_major, traceback, CancelToken, FillReport};
use crate::backend::ComputeBackend;
use crate::error::{LcsError, Result};
use crate::storage::{DpTable, EncodedPair, SequencePair};
use std::hash::Hash;

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcsOutcome<T> {
    /// The filled table
    pub table: DpTable,
    /// One longest common subsequence
    pub subsequence: Vec<T>,
    /// How the table was filled
    pub report: FillReport,
}

impl<T> LcsOutcome<T> {
    /// Length of the subsequence (equals `T[m][n]`)
    #[must_use]
    pub fn len(&self) -> usize {
        self.subsequence.len()
    }

    /// True when the inputs share no symbol
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subsequence.is_empty()
    }
}

impl LcsOutcome<char> {
    /// The subsequence as a `String`
    #[must_use]
    pub fn as_string(&self) -> String {
        self.subsequence.iter().collect()
    }
}

/// Compute one LCS of `pair` on `backend`
///
/// Backend failures (`Build`, `DeviceUnavailable`, `Device`) degrade
/// `backend` to the sequential fill and the problem is recomputed from a
/// fresh table. Invariant violations are returned as-is.
///
/// # Errors
///
/// - `TooLarge` if the table cannot be allocated
/// - `CorruptTable` if traceback finds a cell no recurrence case explains
///
/// # Example
///
/// ```
/// use trueno_lcs::{compute_lcs, ComputeBackend, SequencePair};
///
/// let mut backend = ComputeBackend::Sequential;
/// let pair = SequencePair::from_strs("ABCBDAB", "BDCABA");
/// let outcome = compute_lcs(&mut backend, &pair).unwrap();
///
/// assert_eq!(outcome.as_string(), "BCBA");
/// assert_eq!(outcome.table.final_value(), 4);
/// ```
pub fn compute_lcs<T: Eq + Hash + Clone>(
    backend: &mut ComputeBackend,
    pair: &SequencePair<T>,
) -> Result<LcsOutcome<T>> {
    compute_lcs_with_cancel(backend, pair, &CancelToken::new())
}

/// [`compute_lcs`] with a cancellation token checked between stages
///
/// # Errors
///
/// As [`compute_lcs`], plus `Cancelled` if `cancel` fires during the fill.
pub fn compute_lcs_with_cancel<T: Eq + Hash + Clone>(
    backend: &mut ComputeBackend,
    pair: &SequencePair<T>,
    cancel: &CancelToken,
) -> Result<LcsOutcome<T>> {
    let encoded = pair.encode();
    let (table, report) = fill_with_fallback(backend, &encoded, cancel)?;

    let subsequence = traceback(pair, &table)?;
    log::debug!(
        "LCS of {}x{} has length {} ({} backend, {} stages, {} cells)",
        pair.m(),
        pair.n(),
        subsequence.len(),
        report.backend,
        report.stages,
        report.cells
    );

    Ok(LcsOutcome {
        table,
        subsequence,
        report,
    })
}

/// Fill a fresh table, degrading to the sequential fill on backend failure
///
/// # Errors
///
/// - `TooLarge` if the table cannot be allocated
/// - `Cancelled` if `cancel` fires
/// - any non-recoverable error from the backend
pub fn fill_with_fallback(
    backend: &mut ComputeBackend,
    pair: &EncodedPair,
    cancel: &CancelToken,
) -> Result<(DpTable, FillReport)> {
    log::debug!(
        "filling {}x{} table over {} distinct symbols",
        pair.m(),
        pair.n(),
        pair.alphabet_size
    );
    let mut table = DpTable::initialize(pair.m(), pair.n())?;

    match backend.fill(pair, &mut table, cancel) {
        Ok(report) => Ok((table, report)),
        Err(err) if err.is_recoverable() => {
            backend.degrade(&err);
            let mut table = DpTable::initialize(pair.m(), pair.n())?;
            let report = fill_row_major(pair, &mut table, cancel)?;
            Ok((table, report))
        }
        Err(err) => Err(err),
    }
}

/// Re-fill sequentially and compare with `table` cell by cell
///
/// # Errors
///
/// - `CorruptTable` at the first cell where `table` differs from the reference
/// - `Index` if `table` does not match the pair's shape
pub fn verify_against_sequential(pair: &EncodedPair, table: &DpTable) -> Result<()> {
    let mut reference = DpTable::initialize(pair.m(), pair.n())?;
    fill_row_major(pair, &mut reference, &CancelToken::new())?;

    if table.rows() != reference.rows() || table.cols() != reference.cols() {
        return Err(LcsError::Index {
            row: pair.m(),
            col: pair.n(),
            rows: table.rows(),
            cols: table.cols(),
        });
    }

    match table.first_difference(&reference) {
        None => Ok(()),
        Some((row, col)) => Err(LcsError::CorruptTable {
            row,
            col,
            value: table.get(row, col)?,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::ParallelWavefront;
    use crate::backend::BackendKind;

    #[test]
    fn test_textbook_pair() {
        let mut backend = ComputeBackend::Parallel(ParallelWavefront::new(1));
        let pair = SequencePair::from_strs("ABCBDAB", "BDCABA");
        let outcome = compute_lcs(&mut backend, &pair).unwrap();

        assert_eq!(outcome.as_string(), "BCBA");
        assert_eq!(outcome.len(), 4);
        assert_eq!(outcome.report.backend, BackendKind::Parallel);
        assert!(verify_against_sequential(&pair.encode(), &outcome.table).is_ok());
    }

    #[test]
    fn test_empty_input() {
        let mut backend = ComputeBackend::Sequential;
        let outcome = compute_lcs(&mut backend, &SequencePair::from_strs("", "XYZ")).unwrap();

        assert!(outcome.is_empty());
        assert_eq!(outcome.table.get(0, 3).unwrap(), 0);
        assert_eq!(outcome.report.stages, 0);
    }

    #[test]
    fn test_byte_sequences() {
        let mut backend = ComputeBackend::Sequential;
        let pair = SequencePair::from_bytes(b"AAAA", b"AA");
        let outcome = compute_lcs(&mut backend, &pair).unwrap();
        assert_eq!(outcome.subsequence, b"AA".to_vec());
    }

    #[test]
    fn test_cancel_is_not_recovered() {
        let mut backend = ComputeBackend::Parallel(ParallelWavefront::new(1));
        let cancel = CancelToken::new();
        cancel.cancel();

        let pair = SequencePair::from_strs("AB", "AB");
        let err = compute_lcs_with_cancel(&mut backend, &pair, &cancel).unwrap_err();
        assert_eq!(err, LcsError::Cancelled { completed_stages: 0 });
        assert_eq!(backend.kind(), BackendKind::Parallel);
    }

    #[test]
    fn test_verify_reports_first_bad_cell() {
        let pair = SequencePair::from_strs("ABC", "ABC").encode();
        let (mut table, _) =
            fill_with_fallback(&mut ComputeBackend::Sequential, &pair, &CancelToken::new())
                .unwrap();
        assert!(verify_against_sequential(&pair, &table).is_ok());

        table.set(2, 1, 7).unwrap();
        let err = verify_against_sequential(&pair, &table).unwrap_err();
        assert_eq!(
            err,
            LcsError::CorruptTable {
                row: 2,
                col: 1,
                value: 7
            }
        );
    }

    #[test]
    fn test_verify_shape_mismatch() {
        let pair = SequencePair::from_strs("ABC", "ABC").encode();
        let table = DpTable::initialize(2, 3).unwrap();
        assert!(matches!(
            verify_against_sequential(&pair, &table),
            Err(LcsError::Index { .. })
        ));
    }

    #[cfg(feature = "gpu")]
    #[tokio::test]
    #[serial_test::serial]
    async fn test_gpu_failure_degrades_to_sequential_fill() {
        use crate::gpu::{GpuDevice, GpuMemoryLimits, GpuWavefront};

        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_gpu_failure_degrades_to_sequential_fill: GPU not available");
            return;
        }

        // Limits too small for any table: prepare fails with a recoverable Device error
        let limits = GpuMemoryLimits {
            max_buffer_size: 16,
            max_storage_binding: 16,
            max_workgroups_per_dim: 65_535,
        };
        let gpu = GpuWavefront::acquire().await.unwrap().with_limits(limits);
        let mut backend = ComputeBackend::Gpu(Box::new(gpu));
        assert_eq!(backend.kind(), BackendKind::Gpu);

        let pair = SequencePair::from_strs("ABCBDAB", "BDCABA").encode();
        let (table, report) =
            fill_with_fallback(&mut backend, &pair, &CancelToken::new()).unwrap();

        assert_eq!(report.backend, BackendKind::Sequential);
        assert_eq!(report.stages, 7);
        assert_eq!(backend.kind(), BackendKind::Sequential);

        let mut expected = DpTable::initialize(7, 6).unwrap();
        fill_row_major(&pair, &mut expected, &CancelToken::new()).unwrap();
        assert_eq!(table, expected);
        assert!(verify_against_sequential(&pair, &table).is_ok());
    }
}
