//! Similarity scoring over aligned gram sequences.

use crate::grams::LineGram;
use crate::report::SimilarityReport;

/// Total opcode count underlying a gram sequence. Weight, not gram count,
/// is the scoring unit: a ten-instruction line should count for more than a
/// one-instruction line.
pub fn sequence_weight(grams: &[LineGram]) -> u64 {
    grams.iter().map(LineGram::weight).sum()
}

/// Reduces the LCS and the two input sequences to a similarity report.
///
/// The ratio divides the matched weight by the weight of the *smaller*
/// input: the score reads as "what fraction of the smaller unit's logic is
/// reproduced in the larger one", so boilerplate padding on one side does
/// not dilute an otherwise complete match. Zero-weight inputs score 0.
pub(crate) fn score(a: &[LineGram], b: &[LineGram], lcs: &[LineGram]) -> SimilarityReport {
    let weight_a = sequence_weight(a);
    let weight_b = sequence_weight(b);
    let matched_weight = sequence_weight(lcs);

    let denominator = weight_a.min(weight_b);
    let similarity = if denominator > 0 {
        matched_weight as f64 / denominator as f64
    } else {
        0.0
    };

    debug_assert!(matched_weight <= denominator || denominator == 0);
    SimilarityReport {
        similarity,
        matched_weight,
        weight_a,
        weight_b,
    }
}
