//! The loading boundary: turning on-disk artifacts into instruction-block
//! trees.
//!
//! All malformed-input detection happens here; the comparison pipeline never
//! sees an invalid tree. Two artifact kinds are supported: the JSON
//! disassembly dump produced by `tools/disassemble.py`, and compiled CPython
//! module containers (`.pyc`).

pub(crate) mod dump;
pub(crate) mod pyc;

use crate::block::CodeBlock;
use crate::config::CompareConfig;
use crate::error_codes;
use crate::pool::OpcodePool;
use dump::DumpError;
use log::debug;
use pyc::PycError;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("[CODESIM_LOAD_001] failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "[CODESIM_LOAD_002] unsupported file type '{extension}' for '{path}'. Supported: .json (disassembly dump), .pyc (compiled module)."
    )]
    UnsupportedExtension { path: String, extension: String },
    #[error("dump error in '{path}': {source}")]
    Dump {
        path: String,
        #[source]
        source: DumpError,
    },
    #[error("pyc error in '{path}': {source}")]
    Pyc {
        path: String,
        #[source]
        source: PycError,
    },
}

impl LoadError {
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::Io { .. } => error_codes::LOAD_IO,
            LoadError::UnsupportedExtension { .. } => error_codes::LOAD_UNSUPPORTED_EXTENSION,
            LoadError::Dump { source, .. } => source.code(),
            LoadError::Pyc { source, .. } => source.code(),
        }
    }
}

/// Loads one code unit, selecting the reader by file extension.
pub fn load_code_unit(
    path: &Path,
    pool: &mut OpcodePool,
    config: &CompareConfig,
) -> Result<CodeBlock, LoadError> {
    let display = path.display().to_string();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: display.clone(),
        source,
    })?;
    debug!("loaded {} bytes from {display}", bytes.len());

    match extension.as_str() {
        "json" => dump::parse_dump(&bytes, pool, config.max_nesting_depth).map_err(|source| {
            LoadError::Dump {
                path: display,
                source,
            }
        }),
        "pyc" => pyc::parse_pyc(&bytes, pool, config.max_nesting_depth).map_err(|source| {
            LoadError::Pyc {
                path: display,
                source,
            }
        }),
        _ => Err(LoadError::UnsupportedExtension {
            path: display,
            extension,
        }),
    }
}
