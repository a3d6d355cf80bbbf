//! codesim: bytecode-level code similarity estimation.
//!
//! This crate compares two compiled program units by their instruction
//! streams rather than their surface source text, so renaming, reformatting,
//! and comment changes do not defeat the comparison. The pipeline:
//!
//! 1. flatten each unit's instruction-block tree into one token stream,
//! 2. group tokens into per-source-line "grams",
//! 3. align the two gram sequences with a longest-common-subsequence
//!    dynamic program,
//! 4. score the overlap as `matched_weight / min(weight_a, weight_b)`.
//!
//! Only literal subsequence overlap in instruction order is detected;
//! recognizing reordered-but-equivalent code is out of scope.
//!
//! # Quick Start
//!
//! ```ignore
//! use codesim::{CodeUnit, CompareConfig};
//!
//! let config = CompareConfig::default();
//! let a = CodeUnit::load("a.pyc", &config)?;
//! let b = CodeUnit::load("b.json", &config)?;
//! let report = a.compare(&b, &config)?;
//! println!("similarity: {:.4}", report.similarity);
//! ```

use std::cell::RefCell;

mod align;
mod block;
mod compare;
mod config;
pub(crate) mod error_codes;
mod extract;
mod grams;
mod loader;
mod pool;
mod report;
mod score;
mod session;
mod unit;

thread_local! {
    static DEFAULT_SESSION: RefCell<CompareSession> = RefCell::new(CompareSession::new());
}

/// Runs `f` against the thread-local session backing the convenience API.
pub fn with_default_session<T>(f: impl FnOnce(&mut CompareSession) -> T) -> T {
    DEFAULT_SESSION.with(|session| {
        let mut session = session.borrow_mut();
        f(&mut session)
    })
}

pub use align::lcs_grams;
pub use block::{CodeBlock, Instr};
pub use compare::{compare, compare_with_pool, CompareError};
pub use config::{CompareConfig, CompareConfigBuilder, ConfigError, LimitBehavior};
pub use extract::{extract_tokens, InstrToken};
pub use grams::{group_into_grams, LineGram};
pub use loader::dump::{parse_dump, DumpError};
pub use loader::pyc::{parse_pyc, PycError};
pub use loader::{load_code_unit, LoadError};
pub use pool::{OpId, OpcodePool};
pub use report::SimilarityReport;
pub use score::sequence_weight;
pub use session::CompareSession;
pub use unit::{CodeUnit, UnitProfile};
