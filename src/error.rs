//! Error taxonomy for the LCS pipeline
//!
//! Two families of failure exist:
//!
//! - **Backend failures** (`Build`, `DeviceUnavailable`, `Device`) are caught
//!   at the orchestration boundary and degrade to the sequential filler.
//! - **Contract violations** (`Index`, `CorruptTable`) are never recovered.
//!   They name the offending cell so the defect can be located.

use thiserror::Error;

/// Errors raised by table access, the fill stage, traceback and backends
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LcsError {
    /// Out-of-range table access
    #[error("table index ({row}, {col}) out of range for {rows}x{cols} table")]
    Index {
        /// Requested row
        row: usize,
        /// Requested column
        col: usize,
        /// Table row count (`m + 1`)
        rows: usize,
        /// Table column count (`n + 1`)
        cols: usize,
    },

    /// Kernel compilation failed on the compute backend
    #[error("kernel build failed: {log}")]
    Build {
        /// Diagnostic log reported by the shader compiler
        log: String,
    },

    /// No compatible accelerator was found
    #[error("no compatible compute device: {0}")]
    DeviceUnavailable(String),

    /// Dispatch or readback failed on an acquired device
    #[error("device execution failed: {0}")]
    Device(String),

    /// Traceback found a cell that satisfies no recurrence case
    #[error("corrupt table at cell ({row}, {col}): value {value} is inconsistent with the LCS recurrence")]
    CorruptTable {
        /// Offending row
        row: usize,
        /// Offending column
        col: usize,
        /// Value stored in the offending cell
        value: i32,
    },

    /// Fill was cancelled; the table is consistent up to the reported stage
    #[error("fill cancelled after {completed_stages} completed stages")]
    Cancelled {
        /// Number of stages (diagonals, or rows for row-major) fully committed
        completed_stages: usize,
    },

    /// Requested table cannot be represented
    #[error("table for sequences of length {m} and {n} is too large")]
    TooLarge {
        /// Length of the first sequence
        m: usize,
        /// Length of the second sequence
        n: usize,
    },
}

impl LcsError {
    /// Whether the pipeline may recover by falling back to the sequential filler
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Build { .. } | Self::DeviceUnavailable(_) | Self::Device(_)
        )
    }
}

/// Result alias used throughout the crate
pub type Result<T, E = LcsError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LcsError::Index {
            row: 9,
            col: 1,
            rows: 3,
            cols: 4,
        };
        assert_eq!(
            err.to_string(),
            "table index (9, 1) out of range for 3x4 table"
        );

        let err = LcsError::CorruptTable {
            row: 2,
            col: 5,
            value: 7,
        };
        assert!(err.to_string().contains("(2, 5)"));
        assert!(err.to_string().contains("value 7"));
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(LcsError::Build {
            log: "bad".to_string()
        }
        .is_recoverable());
        assert!(LcsError::DeviceUnavailable("none".to_string()).is_recoverable());
        assert!(LcsError::Device("lost".to_string()).is_recoverable());

        assert!(!LcsError::CorruptTable {
            row: 1,
            col: 1,
            value: 0
        }
        .is_recoverable());
        assert!(!LcsError::Index {
            row: 0,
            col: 0,
            rows: 0,
            cols: 0
        }
        .is_recoverable());
        assert!(!LcsError::Cancelled {
            completed_stages: 3
        }
        .is_recoverable());
    }
}
