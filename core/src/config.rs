//! Configuration for the comparison pipeline and loaders.
//!
//! `CompareConfig` centralizes the resource limits so they are not hardcoded
//! at the call sites that enforce them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What to do when the aligner's DP table would exceed the work limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitBehavior {
    /// Fail the comparison with [`crate::CompareError::WorkLimitExceeded`].
    ReturnError,
    /// Skip alignment and report similarity 0 with the input weights intact.
    ScoreZero,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Upper bound on `(m + 1) * (n + 1)` DP cells allocated by the aligner.
    /// The default admits two ~5000-gram units.
    pub lcs_dp_work_limit: usize,
    pub on_limit_exceeded: LimitBehavior,
    /// Loader-side cap on block nesting in untrusted input.
    pub max_nesting_depth: u32,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            lcs_dp_work_limit: 25_000_000,
            on_limit_exceeded: LimitBehavior::ReturnError,
            max_nesting_depth: 64,
        }
    }
}

impl CompareConfig {
    /// Batch-screening profile: a smaller alignment budget with score-zero
    /// fallback, so one oversized pair cannot stall a sweep.
    pub fn fastest() -> Self {
        Self {
            lcs_dp_work_limit: 4_000_000,
            on_limit_exceeded: LimitBehavior::ScoreZero,
            ..Default::default()
        }
    }

    pub fn balanced() -> Self {
        Self::default()
    }

    /// Largest alignment budget; breaching it is still an error, so no pair
    /// is ever silently scored zero.
    pub fn most_precise() -> Self {
        Self {
            lcs_dp_work_limit: 400_000_000,
            ..Default::default()
        }
    }

    pub fn builder() -> CompareConfigBuilder {
        CompareConfigBuilder {
            inner: CompareConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lcs_dp_work_limit == 0 {
            return Err(ConfigError::NonPositiveLimit {
                field: "lcs_dp_work_limit",
            });
        }
        if self.max_nesting_depth == 0 {
            return Err(ConfigError::NonPositiveLimit {
                field: "max_nesting_depth",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    NonPositiveLimit { field: &'static str },
}

#[derive(Debug, Clone, Default)]
pub struct CompareConfigBuilder {
    inner: CompareConfig,
}

impl CompareConfigBuilder {
    pub fn lcs_dp_work_limit(mut self, value: usize) -> Self {
        self.inner.lcs_dp_work_limit = value;
        self
    }

    pub fn on_limit_exceeded(mut self, value: LimitBehavior) -> Self {
        self.inner.on_limit_exceeded = value;
        self
    }

    pub fn max_nesting_depth(mut self, value: u32) -> Self {
        self.inner.max_nesting_depth = value;
        self
    }

    pub fn build(self) -> Result<CompareConfig, ConfigError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(CompareConfig::default().validate().is_ok());
    }

    #[test]
    fn serde_roundtrip_preserves_defaults() {
        let cfg = CompareConfig::default();
        let json = serde_json::to_string(&cfg).expect("serialize default config");
        let parsed: CompareConfig =
            serde_json::from_str(&json).expect("deserialize default config");
        assert_eq!(cfg, parsed);
    }

    #[test]
    fn presets_validate_and_differ_where_expected() {
        for preset in [
            CompareConfig::fastest(),
            CompareConfig::balanced(),
            CompareConfig::most_precise(),
        ] {
            assert!(preset.validate().is_ok());
        }

        assert_eq!(CompareConfig::balanced(), CompareConfig::default());
        assert_eq!(
            CompareConfig::fastest().on_limit_exceeded,
            LimitBehavior::ScoreZero
        );
        assert!(
            CompareConfig::fastest().lcs_dp_work_limit
                < CompareConfig::most_precise().lcs_dp_work_limit
        );
    }

    #[test]
    fn fastest_preset_scores_zero_instead_of_erroring() {
        use crate::block::{CodeBlock, Instr};
        use crate::compare::compare;
        use crate::pool::OpcodePool;

        let mut pool = OpcodePool::new();
        let op = pool.intern("NOP");
        let instrs: Vec<Instr> = (0..4000u32)
            .map(|line| Instr::new(op, Some(line + 1)))
            .collect();
        let block = CodeBlock::new(instrs);

        // 4001 * 4001 cells exceed the screening budget.
        let report = compare(&block, &block, &CompareConfig::fastest()).expect("fallback");
        assert_eq!(report.similarity, 0.0);
        assert_eq!(report.weight_a, 4000);
    }

    #[test]
    fn builder_rejects_zero_work_limit() {
        let err = CompareConfig::builder()
            .lcs_dp_work_limit(0)
            .build()
            .expect_err("zero work limit must be rejected");
        assert!(matches!(
            err,
            ConfigError::NonPositiveLimit {
                field: "lcs_dp_work_limit"
            }
        ));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: CompareConfig =
            serde_json::from_str(r#"{"on_limit_exceeded":"score_zero"}"#).expect("partial config");
        assert_eq!(cfg.on_limit_exceeded, LimitBehavior::ScoreZero);
        assert_eq!(cfg.lcs_dp_work_limit, CompareConfig::default().lcs_dp_work_limit);
    }
}
