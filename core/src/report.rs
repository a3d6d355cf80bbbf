use serde::{Deserialize, Serialize};

/// The immutable result of one comparison.
///
/// `similarity` is always in `[0, 1]`; the three weights are total opcode
/// counts (matched, side A, side B). Weights are symmetric under argument
/// swap: `compare(a, b)` and `compare(b, a)` report the same similarity and
/// matched weight with `weight_a`/`weight_b` exchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityReport {
    pub similarity: f64,
    pub matched_weight: u64,
    pub weight_a: u64,
    pub weight_b: u64,
}

impl SimilarityReport {
    /// A zero-match report that still carries the input weights. Used when a
    /// configured work limit suppresses alignment.
    pub(crate) fn unmatched(weight_a: u64, weight_b: u64) -> SimilarityReport {
        SimilarityReport {
            similarity: 0.0,
            matched_weight: 0,
            weight_a,
            weight_b,
        }
    }
}
