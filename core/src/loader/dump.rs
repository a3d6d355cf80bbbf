//! Reader for the JSON disassembly-dump format.
//!
//! The dump is the interchange point with the external language toolchain:
//! `tools/disassemble.py` compiles a source file with its own compiler and
//! writes the instruction tree as JSON, so this crate never parses source
//! syntax itself.

use crate::block::{CodeBlock, Instr};
use crate::error_codes;
use crate::pool::OpcodePool;
use serde::Deserialize;
use thiserror::Error;

pub(crate) const DUMP_FORMAT_TAG: &str = "codesim-dump";
pub(crate) const DUMP_VERSION: u32 = 1;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DumpError {
    #[error("[CODESIM_DUMP_001] invalid JSON: {0}")]
    Json(String),
    #[error("[CODESIM_DUMP_002] not a codesim dump (format tag '{0}')")]
    UnsupportedFormat(String),
    #[error("[CODESIM_DUMP_003] unsupported dump version {0} (expected {DUMP_VERSION})")]
    UnsupportedVersion(u32),
    #[error("[CODESIM_DUMP_004] block nesting exceeds limit of {limit}")]
    TooDeep { limit: u32 },
}

impl DumpError {
    pub fn code(&self) -> &'static str {
        match self {
            DumpError::Json(_) => error_codes::DUMP_JSON,
            DumpError::UnsupportedFormat(_) => error_codes::DUMP_FORMAT,
            DumpError::UnsupportedVersion(_) => error_codes::DUMP_VERSION,
            DumpError::TooDeep { .. } => error_codes::DUMP_TOO_DEEP,
        }
    }
}

#[derive(Deserialize)]
struct DumpFile {
    format: String,
    version: u32,
    root: DumpBlock,
}

#[derive(Deserialize)]
struct DumpBlock {
    #[serde(default)]
    instrs: Vec<DumpInstr>,
}

#[derive(Deserialize)]
struct DumpInstr {
    op: String,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    nested: Option<DumpBlock>,
}

/// Parses dump bytes into an instruction-block tree, interning opcode names
/// into `pool`.
pub fn parse_dump(
    bytes: &[u8],
    pool: &mut OpcodePool,
    max_depth: u32,
) -> Result<CodeBlock, DumpError> {
    let file: DumpFile =
        serde_json::from_slice(bytes).map_err(|e| DumpError::Json(e.to_string()))?;

    if file.format != DUMP_FORMAT_TAG {
        return Err(DumpError::UnsupportedFormat(file.format));
    }
    if file.version != DUMP_VERSION {
        return Err(DumpError::UnsupportedVersion(file.version));
    }

    convert_block(&file.root, pool, 0, max_depth)
}

fn convert_block(
    block: &DumpBlock,
    pool: &mut OpcodePool,
    depth: u32,
    max_depth: u32,
) -> Result<CodeBlock, DumpError> {
    if depth >= max_depth {
        return Err(DumpError::TooDeep { limit: max_depth });
    }

    let mut instrs = Vec::with_capacity(block.instrs.len());
    for instr in &block.instrs {
        let op = pool.intern(&instr.op);
        let nested = match &instr.nested {
            Some(nested) => Some(Box::new(convert_block(nested, pool, depth + 1, max_depth)?)),
            None => None,
        };
        instrs.push(Instr {
            op,
            line: instr.line,
            nested,
        });
    }
    Ok(CodeBlock::new(instrs))
}
