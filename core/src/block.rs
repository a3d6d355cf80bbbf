//! Instruction-block model: the read-only input tree of a comparison.

use crate::pool::OpId;

/// One instruction of a code block.
///
/// `line` is present only on the instruction that begins a new source line;
/// instructions without a line attribution are continuations of the line
/// opened by the most recent lined instruction. `nested` points at a block
/// whose body is defined by this instruction's operand (a nested function,
/// closure, comprehension, or class body).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instr {
    pub op: OpId,
    pub line: Option<u32>,
    pub nested: Option<Box<CodeBlock>>,
}

impl Instr {
    pub fn new(op: OpId, line: Option<u32>) -> Instr {
        Instr {
            op,
            line,
            nested: None,
        }
    }

    pub fn with_nested(op: OpId, line: Option<u32>, nested: CodeBlock) -> Instr {
        Instr {
            op,
            line,
            nested: Some(Box::new(nested)),
        }
    }
}

/// One callable/scope unit: an ordered instruction list plus references to
/// the nested blocks it defines. The tree is acyclic by construction of the
/// loaders and is never mutated by the comparison pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBlock {
    pub instrs: Vec<Instr>,
}

impl CodeBlock {
    pub fn new(instrs: Vec<Instr>) -> CodeBlock {
        CodeBlock { instrs }
    }

    /// Total instruction count across this block and all nested blocks.
    pub fn instruction_count(&self) -> u64 {
        let mut count = self.instrs.len() as u64;
        for instr in &self.instrs {
            if let Some(nested) = &instr.nested {
                count += nested.instruction_count();
            }
        }
        count
    }

    /// Number of blocks in the tree, counting this one.
    pub fn block_count(&self) -> u64 {
        let mut count = 1;
        for instr in &self.instrs {
            if let Some(nested) = &instr.nested {
                count += nested.block_count();
            }
        }
        count
    }
}
