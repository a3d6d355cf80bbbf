//! Stable error codes surfaced in error messages and machine output.

pub(crate) const COMPARE_WORK_LIMIT: &str = "CODESIM_CMP_001";
pub(crate) const COMPARE_FOREIGN_OPCODE: &str = "CODESIM_CMP_002";

pub(crate) const LOAD_IO: &str = "CODESIM_LOAD_001";
pub(crate) const LOAD_UNSUPPORTED_EXTENSION: &str = "CODESIM_LOAD_002";

pub(crate) const DUMP_JSON: &str = "CODESIM_DUMP_001";
pub(crate) const DUMP_FORMAT: &str = "CODESIM_DUMP_002";
pub(crate) const DUMP_VERSION: &str = "CODESIM_DUMP_003";
pub(crate) const DUMP_TOO_DEEP: &str = "CODESIM_DUMP_004";

pub(crate) const PYC_TRUNCATED: &str = "CODESIM_PYC_001";
pub(crate) const PYC_BAD_HEADER: &str = "CODESIM_PYC_002";
pub(crate) const PYC_UNSUPPORTED_MAGIC: &str = "CODESIM_PYC_003";
pub(crate) const PYC_MARSHAL: &str = "CODESIM_PYC_004";
pub(crate) const PYC_NOT_CODE: &str = "CODESIM_PYC_005";
pub(crate) const PYC_BAD_OPCODE: &str = "CODESIM_PYC_006";
pub(crate) const PYC_TOO_DEEP: &str = "CODESIM_PYC_007";
