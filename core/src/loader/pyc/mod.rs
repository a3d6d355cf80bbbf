//! Reader for compiled CPython module containers (`.pyc`).
//!
//! A `.pyc` is a 16-byte header followed by a marshal-serialized code
//! object. The reader validates the header, gates on the CPython 3.10
//! magic-number range (the only bytecode generation this build understands),
//! then reconstructs the instruction-block tree from the marshal payload.

mod disasm;
mod linetable;
mod marshal;
mod opcodes;

use crate::block::CodeBlock;
use crate::error_codes;
use crate::pool::OpcodePool;
use log::debug;
use thiserror::Error;

/// Size of the header prepended to the marshal payload since CPython 3.7:
/// magic (2 bytes + `\r\n`), bit flags, and source mtime/hash metadata.
const HEADER_LEN: usize = 16;

/// Magic-number range emitted by CPython 3.10 (3430 through the released
/// 3439).
const MAGIC_RANGE: std::ops::RangeInclusive<u16> = 3430..=3439;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PycError {
    #[error("[CODESIM_PYC_001] truncated input at byte {offset}")]
    Truncated { offset: usize },
    #[error("[CODESIM_PYC_002] not a pyc container (bad header)")]
    BadHeader,
    #[error(
        "[CODESIM_PYC_003] unsupported bytecode magic {magic} (supported: CPython 3.10, {}..={})",
        MAGIC_RANGE.start(),
        MAGIC_RANGE.end()
    )]
    UnsupportedMagic { magic: u16 },
    #[error("[CODESIM_PYC_004] unknown marshal type code 0x{code:02x} at byte {offset}")]
    UnknownTypeCode { code: u8, offset: usize },
    #[error("[CODESIM_PYC_004] marshal back-reference {index} out of range")]
    BadReference { index: u32 },
    #[error("[CODESIM_PYC_004] invalid string data at byte {offset}")]
    InvalidString { offset: usize },
    #[error("[CODESIM_PYC_004] code object field '{field}' has the wrong type")]
    BadCodeField { field: &'static str },
    #[error("[CODESIM_PYC_005] top-level marshal value is not a code object")]
    NotACodeObject,
    #[error("[CODESIM_PYC_006] bytecode has odd length {len}")]
    OddCodeLength { len: usize },
    #[error("[CODESIM_PYC_006] unknown opcode {opcode} at offset {offset}")]
    UnknownOpcode { opcode: u8, offset: u32 },
    #[error("[CODESIM_PYC_006] LOAD_CONST index {index} out of range ({len} consts)")]
    BadConstIndex { index: u32, len: usize },
    #[error("[CODESIM_PYC_007] nesting exceeds limit of {limit}")]
    TooDeep { limit: u32 },
}

impl PycError {
    pub fn code(&self) -> &'static str {
        match self {
            PycError::Truncated { .. } => error_codes::PYC_TRUNCATED,
            PycError::BadHeader => error_codes::PYC_BAD_HEADER,
            PycError::UnsupportedMagic { .. } => error_codes::PYC_UNSUPPORTED_MAGIC,
            PycError::UnknownTypeCode { .. }
            | PycError::BadReference { .. }
            | PycError::InvalidString { .. }
            | PycError::BadCodeField { .. } => error_codes::PYC_MARSHAL,
            PycError::NotACodeObject => error_codes::PYC_NOT_CODE,
            PycError::OddCodeLength { .. }
            | PycError::UnknownOpcode { .. }
            | PycError::BadConstIndex { .. } => error_codes::PYC_BAD_OPCODE,
            PycError::TooDeep { .. } => error_codes::PYC_TOO_DEEP,
        }
    }
}

/// Parses a complete `.pyc` container into an instruction-block tree,
/// interning opcode names into `pool`.
pub fn parse_pyc(
    bytes: &[u8],
    pool: &mut OpcodePool,
    max_depth: u32,
) -> Result<CodeBlock, PycError> {
    if bytes.len() < HEADER_LEN {
        return Err(PycError::Truncated {
            offset: bytes.len(),
        });
    }
    if bytes[2] != b'\r' || bytes[3] != b'\n' {
        return Err(PycError::BadHeader);
    }

    let magic = u16::from_le_bytes([bytes[0], bytes[1]]);
    if !MAGIC_RANGE.contains(&magic) {
        return Err(PycError::UnsupportedMagic { magic });
    }
    debug!("pyc magic {magic}, {} payload bytes", bytes.len() - HEADER_LEN);

    let value = marshal::read_top_level(&bytes[HEADER_LEN..])?;
    match value {
        marshal::Value::Code(code) => disasm::block_from_code(&code, pool, 0, max_depth),
        _ => Err(PycError::NotACodeObject),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_is_truncated() {
        let err = parse_pyc(&[0x6f, 0x0d], &mut OpcodePool::new(), 64).expect_err("short");
        assert!(matches!(err, PycError::Truncated { offset: 2 }));
    }

    #[test]
    fn missing_crlf_is_a_bad_header() {
        let bytes = [0u8; 16];
        let err = parse_pyc(&bytes, &mut OpcodePool::new(), 64).expect_err("header");
        assert!(matches!(err, PycError::BadHeader));
    }

    #[test]
    fn foreign_magic_is_unsupported() {
        // CPython 3.9's released magic is 3425.
        let mut bytes = vec![0u8; 16];
        bytes[0..4].copy_from_slice(&[0x61, 0x0d, 0x0d, 0x0a]);
        let err = parse_pyc(&bytes, &mut OpcodePool::new(), 64).expect_err("magic");
        assert!(matches!(err, PycError::UnsupportedMagic { magic: 3425 }));
    }

    #[test]
    fn non_code_payload_is_rejected() {
        let mut bytes = vec![0u8; 16];
        bytes[0..4].copy_from_slice(&[0x6f, 0x0d, 0x0d, 0x0a]); // 3439
        bytes.push(b'N'); // marshal None
        let err = parse_pyc(&bytes, &mut OpcodePool::new(), 64).expect_err("payload");
        assert!(matches!(err, PycError::NotACodeObject));
    }
}
