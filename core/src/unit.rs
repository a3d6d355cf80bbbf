//! A loaded code unit and its convenience API.

use crate::block::CodeBlock;
use crate::compare::{compare, CompareError};
use crate::config::CompareConfig;
use crate::extract::extract_tokens;
use crate::grams::group_into_grams;
use crate::loader::{load_code_unit, LoadError};
use crate::pool::OpcodePool;
use crate::report::SimilarityReport;
use crate::score::sequence_weight;
use std::path::Path;

/// One comparable program unit: the root instruction block of a loaded
/// artifact.
#[derive(Debug, Clone)]
pub struct CodeUnit {
    pub root: CodeBlock,
}

/// Shape summary of a unit, as shown by `codesim info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct UnitProfile {
    pub blocks: u64,
    pub instructions: u64,
    pub grams: u64,
    pub weight: u64,
}

impl From<CodeBlock> for CodeUnit {
    fn from(root: CodeBlock) -> Self {
        Self { root }
    }
}

impl CodeUnit {
    /// Loads a unit through the thread-local default session. Units loaded
    /// this way on the same thread share an opcode pool and may be compared
    /// with each other.
    pub fn load(path: impl AsRef<Path>, config: &CompareConfig) -> Result<Self, LoadError> {
        crate::with_default_session(|session| Self::load_with_pool(path, &mut session.ops, config))
    }

    pub fn load_with_pool(
        path: impl AsRef<Path>,
        pool: &mut OpcodePool,
        config: &CompareConfig,
    ) -> Result<Self, LoadError> {
        let root = load_code_unit(path.as_ref(), pool, config)?;
        Ok(Self { root })
    }

    pub fn compare(
        &self,
        other: &CodeUnit,
        config: &CompareConfig,
    ) -> Result<SimilarityReport, CompareError> {
        compare(&self.root, &other.root, config)
    }

    pub fn profile(&self) -> UnitProfile {
        let tokens = extract_tokens(&self.root);
        let grams = group_into_grams(&tokens);
        UnitProfile {
            blocks: self.root.block_count(),
            instructions: self.root.instruction_count(),
            grams: grams.len() as u64,
            weight: sequence_weight(&grams),
        }
    }
}
