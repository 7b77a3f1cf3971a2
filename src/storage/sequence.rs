//! Input sequences and their device-friendly symbol encoding

use std::collections::HashMap;
use std::hash::Hash;

/// The two input sequences of an LCS computation
///
/// Symbols are compared by equality only; no ordering is assumed.
///
/// # Example
///
/// ```
/// use trueno_lcs::SequencePair;
///
/// let pair = SequencePair::from_strs("ABCBDAB", "BDCABA");
/// assert_eq!(pair.m(), 7);
/// assert_eq!(pair.n(), 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencePair<T> {
    a: Vec<T>,
    b: Vec<T>,
}

impl<T> SequencePair<T> {
    /// Create a pair from two owned sequences
    #[must_use]
    pub const fn new(a: Vec<T>, b: Vec<T>) -> Self {
        Self { a, b }
    }

    /// First sequence
    #[must_use]
    pub fn a(&self) -> &[T] {
        &self.a
    }

    /// Second sequence
    #[must_use]
    pub fn b(&self) -> &[T] {
        &self.b
    }

    /// Length of `a`
    #[must_use]
    pub fn m(&self) -> usize {
        self.a.len()
    }

    /// Length of `b`
    #[must_use]
    pub fn n(&self) -> usize {
        self.b.len()
    }

    /// True when either sequence is empty (no wavefront stage will run)
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.a.is_empty() || self.b.is_empty()
    }
}

impl SequencePair<char> {
    /// Build a pair of character sequences
    #[must_use]
    pub fn from_strs(a: &str, b: &str) -> Self {
        Self::new(a.chars().collect(), b.chars().collect())
    }
}

impl SequencePair<u8> {
    /// Build a pair of byte sequences
    #[must_use]
    pub fn from_bytes(a: &[u8], b: &[u8]) -> Self {
        Self::new(a.to_vec(), b.to_vec())
    }
}

impl<T: Eq + Hash> SequencePair<T> {
    /// Intern every distinct symbol to a dense `u32` code
    ///
    /// Two positions receive the same code iff their symbols are equal, so
    /// any fill over the codes is identical to a fill over the symbols.
    #[must_use]
    pub fn encode(&self) -> EncodedPair {
        let mut codes = HashMap::new();
        let a = intern(&mut codes, &self.a);
        let b = intern(&mut codes, &self.b);

        EncodedPair {
            a,
            b,
            alphabet_size: codes.len(),
        }
    }
}

#[allow(clippy::cast_possible_truncation)] // > 4B distinct symbols not supported
fn intern<'a, T: Eq + Hash>(codes: &mut HashMap<&'a T, u32>, seq: &'a [T]) -> Vec<u32> {
    seq.iter()
        .map(|symbol| {
            let next = codes.len() as u32;
            *codes.entry(symbol).or_insert(next)
        })
        .collect()
}

/// Symbol codes for both sequences, as consumed by the fill executors
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncodedPair {
    /// Codes for `a`
    pub a: Vec<u32>,
    /// Codes for `b`
    pub b: Vec<u32>,
    /// Number of distinct symbols across both sequences
    pub alphabet_size: usize,
}

impl EncodedPair {
    /// Length of `a`
    #[must_use]
    pub fn m(&self) -> usize {
        self.a.len()
    }

    /// Length of `b`
    #[must_use]
    pub fn n(&self) -> usize {
        self.b.len()
    }

    /// Whether `a[i-1]` and `b[j-1]` hold the same symbol (1-based table coordinates)
    #[inline]
    #[must_use]
    pub fn matches(&self, i: usize, j: usize) -> bool {
        self.a[i - 1] == self.b[j - 1]
    }
}
