//! Sequential row-major fill
//!
//! Visits `(1,1), (1,2), .., (m,n)` in order. Every neighbor of a cell is
//! visited before the cell itself, so the scan respects the dependency DAG
//! without any staging. This is the reference every other filler is checked
//! against, and the fallback when no concurrent backend is usable.

use super::{check_shape, CancelToken, FillReport};
use crate::backend::BackendKind;
use crate::error::{LcsError, Result};
use crate::storage::{DpTable, EncodedPair};

/// Fill `table` row by row
///
/// Cancellation is checked before every row; on cancellation rows
/// `1..=completed_stages` are final and the rest are untouched.
///
/// # Errors
///
/// - `Index` if the table shape does not match the pair
/// - `Cancelled` if `cancel` fires before the last row
///
/// # Example
///
/// ```
/// use trueno_lcs::algorithms::{fill_row_major, CancelToken};
/// use trueno_lcs::{DpTable, SequencePair};
///
/// let pair = SequencePair::from_strs("AAAA", "AA").encode();
/// let mut table = DpTable::initialize(4, 2).unwrap();
/// let report = fill_row_major(&pair, &mut table, &CancelToken::new()).unwrap();
///
/// assert_eq!(table.final_value(), 2);
/// assert_eq!(report.cells, 8);
/// ```
pub fn fill_row_major(
    pair: &EncodedPair,
    table: &mut DpTable,
    cancel: &CancelToken,
) -> Result<FillReport> {
    check_shape(pair, table)?;

    let (m, n) = (pair.m(), pair.n());
    let cols = table.cols();

    for i in 1..=m {
        if cancel.is_cancelled() {
            return Err(LcsError::Cancelled {
                completed_stages: i - 1,
            });
        }

        for j in 1..=n {
            let value = table.evaluate(i, j, pair.matches(i, j));
            table.as_mut_slice()[i * cols + j] = value;
        }
    }

    Ok(FillReport {
        backend: BackendKind::Sequential,
        stages: if n == 0 { 0 } else { m },
        cells: m * n,
    })
}
