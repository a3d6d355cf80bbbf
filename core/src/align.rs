//! Sequence alignment: longest common subsequence over line-grams.
//!
//! This is the O(m·n) core of the whole comparison. The DP table is the
//! dominant allocation of the system; callers bound it up front via
//! [`crate::CompareConfig::lcs_dp_work_limit`].

use crate::grams::LineGram;

/// Computes the longest common subsequence of `a` and `b`, with grams as
/// atomic units compared by whole-sequence opcode equality.
///
/// The table is built forward (`dp[i][j]` = LCS length of `a[..i]` and
/// `b[..j]`) and the match list recovered by backtracing from `(m, n)`.
/// When both predecessor cells tie, the backtrace consumes from `a`; that
/// choice picks one of possibly several maximal subsequences but never
/// changes the length, and scoring depends only on aggregate weight.
pub fn lcs_grams(a: &[LineGram], b: &[LineGram]) -> Vec<LineGram> {
    let m = a.len();
    let n = b.len();
    if m == 0 || n == 0 {
        return Vec::new();
    }

    let width = n + 1;
    let idx = |i: usize, j: usize| i * width + j;

    let mut dp = vec![0u32; (m + 1) * width];
    for i in 1..=m {
        for j in 1..=n {
            dp[idx(i, j)] = if a[i - 1] == b[j - 1] {
                dp[idx(i - 1, j - 1)] + 1
            } else {
                dp[idx(i - 1, j)].max(dp[idx(i, j - 1)])
            };
        }
    }

    let mut lcs = Vec::with_capacity(dp[idx(m, n)] as usize);
    let mut i = m;
    let mut j = n;
    while i > 0 && j > 0 {
        if a[i - 1] == b[j - 1] {
            lcs.push(a[i - 1].clone());
            i -= 1;
            j -= 1;
        } else if dp[idx(i - 1, j)] >= dp[idx(i, j - 1)] {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    lcs.reverse();

    debug_assert_eq!(lcs.len(), dp[idx(m, n)] as usize);
    lcs
}

/// Number of DP cells `lcs_grams` would allocate for these inputs.
pub(crate) fn dp_cells(a: &[LineGram], b: &[LineGram]) -> usize {
    (a.len() + 1).saturating_mul(b.len() + 1)
}
