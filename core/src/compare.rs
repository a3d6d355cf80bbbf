//! The comparison entry point: extract, group, align, score.

use crate::align::{dp_cells, lcs_grams};
use crate::block::CodeBlock;
use crate::config::{CompareConfig, LimitBehavior};
use crate::error_codes;
use crate::extract::extract_tokens;
use crate::grams::group_into_grams;
use crate::pool::OpcodePool;
use crate::report::SimilarityReport;
use crate::score::{score, sequence_weight};
use log::debug;
use thiserror::Error;

/// Errors produced by the comparison pipeline.
///
/// Degenerate inputs (empty blocks, single instructions) are not errors and
/// produce a normal zero-or-more score; the only failure is breaching the
/// configured alignment work limit under [`LimitBehavior::ReturnError`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompareError {
    #[error(
        "[CODESIM_CMP_001] alignment work limit exceeded: {grams_a} x {grams_b} grams need {cells} DP cells (limit: {limit}). Suggestion: raise `lcs_dp_work_limit` or set `on_limit_exceeded` to `score_zero`."
    )]
    WorkLimitExceeded {
        grams_a: usize,
        grams_b: usize,
        cells: usize,
        limit: usize,
    },
    #[error(
        "[CODESIM_CMP_002] opcode id {id} is not interned in the supplied pool ({len} names). Both units must be loaded through the same pool or session."
    )]
    ForeignOpcode { id: u32, len: usize },
}

impl CompareError {
    pub fn code(&self) -> &'static str {
        match self {
            CompareError::WorkLimitExceeded { .. } => error_codes::COMPARE_WORK_LIMIT,
            CompareError::ForeignOpcode { .. } => error_codes::COMPARE_FOREIGN_OPCODE,
        }
    }
}

/// Compares two instruction-block trees and returns a similarity report.
///
/// Both trees must have been interned through the same [`crate::OpcodePool`]
/// (the loaders and [`crate::CompareSession`] arrange this); opcode ids from
/// unrelated pools compare meaninglessly.
///
/// The computation is pure and deterministic: repeated invocation on the
/// same inputs yields an identical report.
pub fn compare(
    a: &CodeBlock,
    b: &CodeBlock,
    config: &CompareConfig,
) -> Result<SimilarityReport, CompareError> {
    let tokens_a = extract_tokens(a);
    let tokens_b = extract_tokens(b);

    let grams_a = group_into_grams(&tokens_a);
    let grams_b = group_into_grams(&tokens_b);
    debug!(
        "comparing {} x {} grams ({} x {} instructions)",
        grams_a.len(),
        grams_b.len(),
        tokens_a.len(),
        tokens_b.len()
    );

    let cells = dp_cells(&grams_a, &grams_b);
    if cells > config.lcs_dp_work_limit {
        match config.on_limit_exceeded {
            LimitBehavior::ReturnError => {
                return Err(CompareError::WorkLimitExceeded {
                    grams_a: grams_a.len(),
                    grams_b: grams_b.len(),
                    cells,
                    limit: config.lcs_dp_work_limit,
                });
            }
            LimitBehavior::ScoreZero => {
                debug!("work limit exceeded ({cells} cells); scoring zero without alignment");
                return Ok(SimilarityReport::unmatched(
                    sequence_weight(&grams_a),
                    sequence_weight(&grams_b),
                ));
            }
        }
    }

    let lcs = lcs_grams(&grams_a, &grams_b);
    Ok(score(&grams_a, &grams_b, &lcs))
}

/// Session-explicit variant of [`compare`].
///
/// Verifies that every opcode id in both trees is interned in `pool` before
/// comparing, so ids from an unrelated pool fail with
/// [`CompareError::ForeignOpcode`] instead of matching by coincidence.
pub fn compare_with_pool(
    a: &CodeBlock,
    b: &CodeBlock,
    pool: &OpcodePool,
    config: &CompareConfig,
) -> Result<SimilarityReport, CompareError> {
    check_interned(a, pool)?;
    check_interned(b, pool)?;
    compare(a, b, config)
}

fn check_interned(block: &CodeBlock, pool: &OpcodePool) -> Result<(), CompareError> {
    for instr in &block.instrs {
        if instr.op.0 as usize >= pool.len() {
            return Err(CompareError::ForeignOpcode {
                id: instr.op.0,
                len: pool.len(),
            });
        }
        if let Some(nested) = &instr.nested {
            check_interned(nested, pool)?;
        }
    }
    Ok(())
}
