//! Traceback from `T[m][n]` to an edge of the table
//!
//! # Tie-break policy
//!
//! At each cell `(i, j)` the first applicable move wins:
//!
//! 1. **Diagonal** when `a[i-1] == b[j-1]`: emit the symbol, go to `(i-1, j-1)`
//! 2. **Up** when `T[i][j] == T[i-1][j]`: go to `(i-1, j)`
//! 3. **Left** when `T[i][j] == T[i][j-1]`: go to `(i, j-1)`
//!
//! The order is fixed so that inputs with several optimal subsequences always
//! yield the same one. For `ABCBDAB` / `BDCABA` it yields `BCBA`.

use crate::error::{LcsError, Result};
use crate::storage::{DpTable, SequencePair};

/// Move taken from a cell during traceback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracebackStep {
    /// Symbols matched; both prefixes shrink
    Diagonal,
    /// Drop the last symbol of `a`
    Up,
    /// Drop the last symbol of `b`
    Left,
}

fn step<T: Eq>(
    pair: &SequencePair<T>,
    table: &DpTable,
    i: usize,
    j: usize,
) -> Result<TracebackStep> {
    let here = table.get(i, j)?;
    let corrupt = LcsError::CorruptTable {
        row: i,
        col: j,
        value: here,
    };

    if pair.a()[i - 1] == pair.b()[j - 1] {
        // A match must have taken the diagonal in the fill
        return if here == table.get(i - 1, j - 1)? + 1 {
            Ok(TracebackStep::Diagonal)
        } else {
            Err(corrupt)
        };
    }

    if here == table.get(i - 1, j)? {
        Ok(TracebackStep::Up)
    } else if here == table.get(i, j - 1)? {
        Ok(TracebackStep::Left)
    } else {
        Err(corrupt)
    }
}

/// Walk a filled table and return the moves taken, from `(m, n)` outward
///
/// # Errors
///
/// - `Index` if the table shape does not match the pair
/// - `CorruptTable` naming the first cell that satisfies no recurrence case
pub fn traceback_steps<T: Eq>(
    pair: &SequencePair<T>,
    table: &DpTable,
) -> Result<Vec<TracebackStep>> {
    if table.m() != pair.m() || table.n() != pair.n() {
        return Err(LcsError::Index {
            row: pair.m(),
            col: pair.n(),
            rows: table.rows(),
            cols: table.cols(),
        });
    }

    let (mut i, mut j) = (pair.m(), pair.n());
    let mut steps = Vec::with_capacity(i + j);

    while i > 0 && j > 0 {
        let next = step(pair, table, i, j)?;
        match next {
            TracebackStep::Diagonal => {
                i -= 1;
                j -= 1;
            }
            TracebackStep::Up => i -= 1,
            TracebackStep::Left => j -= 1,
        }
        steps.push(next);
    }

    Ok(steps)
}

/// Reconstruct one longest common subsequence from a filled table
///
/// # Errors
///
/// - `Index` if the table shape does not match the pair
/// - `CorruptTable` if the fill produced values inconsistent with the recurrence
///
/// # Example
///
/// ```
/// use trueno_lcs::algorithms::{fill_row_major, traceback, CancelToken};
/// use trueno_lcs::{DpTable, SequencePair};
///
/// let pair = SequencePair::from_strs("ABCBDAB", "BDCABA");
/// let mut table = DpTable::initialize(pair.m(), pair.n()).unwrap();
/// fill_row_major(&pair.encode(), &mut table, &CancelToken::new()).unwrap();
///
/// let lcs: String = traceback(&pair, &table).unwrap().into_iter().collect();
/// assert_eq!(lcs, "BCBA");
/// ```
pub fn traceback<T: Eq + Clone>(pair: &SequencePair<T>, table: &DpTable) -> Result<Vec<T>> {
    let steps = traceback_steps(pair, table)?;

    // Only the row matters for emitting symbols of `a`
    let mut i = pair.m();
    let mut reversed = Vec::new();
    for step in steps {
        match step {
            TracebackStep::Diagonal => {
                reversed.push(pair.a()[i - 1].clone());
                i -= 1;
            }
            TracebackStep::Up => i -= 1,
            TracebackStep::Left => {}
        }
    }

    reversed.reverse();
    Ok(reversed)
}
