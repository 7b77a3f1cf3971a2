//! DP table of LCS lengths for every prefix pair
//!
//! # Layout
//!
//! ```text
//! a = "AB", b = "BA"  (m = 2, n = 2)
//!
//!        ε   B   A
//!   ε    0   0   0
//!   A    0   0   1
//!   B    0   1   1
//!
//! cells: [0, 0, 0, 0, 0, 1, 0, 1, 1]   // row-major, cols = n + 1
//! ```
//!
//! The same flat buffer is uploaded verbatim to device storage, so host and
//! kernel agree on `idx = i * cols + j`.

use crate::error::{LcsError, Result};
use std::fmt;

/// Marker for cells not yet computed
///
/// Only used to make an incomplete fill detectable; no algorithm reads it
/// for correctness.
pub const SENTINEL: i32 = -1;

/// The LCS recurrence for a single interior cell
#[inline]
#[must_use]
pub fn recurrence(diag: i32, up: i32, left: i32, matched: bool) -> i32 {
    if matched {
        diag + 1
    } else {
        up.max(left)
    }
}

/// `(m+1) x (n+1)` table where `T[i][j]` is the LCS length of `a[0..i)` and `b[0..j)`
///
/// # Example
///
/// ```
/// use trueno_lcs::DpTable;
///
/// let table = DpTable::initialize(2, 3).unwrap();
/// assert_eq!(table.rows(), 3);
/// assert_eq!(table.cols(), 4);
/// assert_eq!(table.get(0, 3).unwrap(), 0);
/// assert!(table.get(3, 0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DpTable {
    cells: Vec<i32>,
    rows: usize,
    cols: usize,
}

impl DpTable {
    /// Allocate a padded table for sequences of length `m` and `n`
    ///
    /// Row 0 and column 0 are zero; every interior cell holds [`SENTINEL`].
    ///
    /// # Errors
    ///
    /// Returns `TooLarge` if the cell count overflows `usize` or the
    /// sequences are longer than an `i32` cell can count.
    pub fn initialize(m: usize, n: usize) -> Result<Self> {
        let too_large = || LcsError::TooLarge { m, n };

        let limit = i32::MAX as usize;
        if m >= limit || n >= limit {
            return Err(too_large());
        }

        let rows = m + 1;
        let cols = n + 1;
        let len = rows.checked_mul(cols).ok_or_else(too_large)?;

        let mut cells = vec![SENTINEL; len];
        cells[..cols].fill(0);
        for row in cells.chunks_exact_mut(cols) {
            row[0] = 0;
        }

        Ok(Self { cells, rows, cols })
    }

    /// Number of rows (`m + 1`)
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (`n + 1`)
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Length of the first sequence
    #[must_use]
    pub const fn m(&self) -> usize {
        self.rows - 1
    }

    /// Length of the second sequence
    #[must_use]
    pub const fn n(&self) -> usize {
        self.cols - 1
    }

    /// Total number of cells
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: even a `0 x 0` problem has the single corner cell
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row < self.rows && col < self.cols {
            Ok(row * self.cols + col)
        } else {
            Err(LcsError::Index {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Read `T[row][col]`
    ///
    /// # Errors
    ///
    /// Returns `Index` if the cell is outside the table.
    pub fn get(&self, row: usize, col: usize) -> Result<i32> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Write `T[row][col]`
    ///
    /// # Errors
    ///
    /// Returns `Index` if the cell is outside the table.
    pub fn set(&mut self, row: usize, col: usize, value: i32) -> Result<()> {
        let idx = self.index(row, col)?;
        self.cells[idx] = value;
        Ok(())
    }

    /// Borrow one row
    ///
    /// # Errors
    ///
    /// Returns `Index` if `row` is outside the table.
    pub fn row(&self, row: usize) -> Result<&[i32]> {
        let start = self.index(row, 0)?;
        Ok(&self.cells[start..start + self.cols])
    }

    /// `T[m][n]`, the LCS length once the fill is complete
    #[must_use]
    pub fn final_value(&self) -> i32 {
        self.cells[self.cells.len() - 1]
    }

    /// Row-major cell storage
    #[must_use]
    pub fn as_slice(&self) -> &[i32] {
        &self.cells
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [i32] {
        &mut self.cells
    }

    /// Compute `T[i][j]` from its three neighbors (`i, j >= 1`)
    #[inline]
    pub(crate) fn evaluate(&self, i: usize, j: usize, matched: bool) -> i32 {
        let idx = i * self.cols + j;
        recurrence(
            self.cells[idx - self.cols - 1],
            self.cells[idx - self.cols],
            self.cells[idx - 1],
            matched,
        )
    }

    /// Check the zero border invariant
    #[must_use]
    pub fn border_is_zero(&self) -> bool {
        self.cells[..self.cols].iter().all(|&v| v == 0)
            && self.cells.iter().step_by(self.cols).all(|&v| v == 0)
    }

    /// First interior cell still holding [`SENTINEL`], scanning row-major
    #[must_use]
    pub fn first_uncomputed(&self) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(|&v| v == SENTINEL)
            .map(|idx| (idx / self.cols, idx % self.cols))
    }

    /// First cell (row-major) where two equally-sized tables differ
    ///
    /// Tables of different shape differ at `(0, 0)` by convention.
    #[must_use]
    pub fn first_difference(&self, other: &Self) -> Option<(usize, usize)> {
        if self.rows != other.rows || self.cols != other.cols {
            return Some((0, 0));
        }
        self.cells
            .iter()
            .zip(&other.cells)
            .position(|(x, y)| x != y)
            .map(|idx| (idx / self.cols, idx % self.cols))
    }
}

impl fmt::Display for DpTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .cells
            .iter()
            .map(|v| v.to_string().len())
            .max()
            .unwrap_or(1)
            + 1;

        for row in self.cells.chunks_exact(self.cols) {
            for value in row {
                write!(f, "{value:>width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_padding() {
        let table = DpTable::initialize(3, 2).unwrap();

        assert_eq!(table.rows(), 4);
        assert_eq!(table.cols(), 3);
        assert_eq!(table.len(), 12);
        assert!(table.border_is_zero());

        for i in 1..=3 {
            for j in 1..=2 {
                assert_eq!(table.get(i, j).unwrap(), SENTINEL);
            }
        }
        assert_eq!(table.first_uncomputed(), Some((1, 1)));
    }

    #[test]
    fn test_initialize_degenerate() {
        let table = DpTable::initialize(0, 3).unwrap();
        assert_eq!(table.as_slice(), &[0, 0, 0, 0]);
        assert_eq!(table.first_uncomputed(), None);

        let table = DpTable::initialize(0, 0).unwrap();
        assert_eq!(table.as_slice(), &[0]);
        assert_eq!(table.final_value(), 0);
    }

    #[test]
    fn test_initialize_too_large() {
        let err = DpTable::initialize(usize::MAX / 2, usize::MAX / 2).unwrap_err();
        assert_eq!(
            err,
            LcsError::TooLarge {
                m: usize::MAX / 2,
                n: usize::MAX / 2
            }
        );
    }

    #[test]
    fn test_get_set_bounds() {
        let mut table = DpTable::initialize(2, 2).unwrap();

        table.set(2, 2, 5).unwrap();
        assert_eq!(table.get(2, 2).unwrap(), 5);
        assert_eq!(table.final_value(), 5);

        assert_eq!(
            table.get(3, 0),
            Err(LcsError::Index {
                row: 3,
                col: 0,
                rows: 3,
                cols: 3
            })
        );
        assert!(table.set(0, 3, 1).is_err());
        assert!(table.row(3).is_err());
        assert_eq!(table.row(0).unwrap(), &[0, 0, 0]);
    }

    #[test]
    fn test_recurrence() {
        assert_eq!(recurrence(2, 0, 0, true), 3);
        assert_eq!(recurrence(2, 3, 1, false), 3);
        assert_eq!(recurrence(2, 1, 4, false), 4);
    }

    #[test]
    fn test_first_difference() {
        let a = DpTable::initialize(2, 2).unwrap();
        let mut b = a.clone();
        assert_eq!(a.first_difference(&b), None);

        b.set(2, 1, 1).unwrap();
        assert_eq!(a.first_difference(&b), Some((2, 1)));

        let c = DpTable::initialize(1, 2).unwrap();
        assert_eq!(a.first_difference(&c), Some((0, 0)));
    }

    #[test]
    fn test_display() {
        let mut table = DpTable::initialize(1, 2).unwrap();
        table.set(1, 1, 0).unwrap();
        table.set(1, 2, 1).unwrap();

        assert_eq!(table.to_string(), " 0 0 0\n 0 0 1\n");
    }
}
