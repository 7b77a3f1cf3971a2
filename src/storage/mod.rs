//! Problem storage layer
//!
//! Provides the input sequence pair, its symbol encoding, and the padded DP table.

pub mod sequence;
pub mod table;

pub use sequence::{EncodedPair, SequencePair};
pub use table::{recurrence, DpTable, SENTINEL};
