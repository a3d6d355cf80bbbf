//! Instruction decoding: raw code objects to instruction blocks.

use super::linetable::line_starts;
use super::marshal::{RawCode, Value};
use super::opcodes::{opname, EXTENDED_ARG, LOAD_CONST};
use super::PycError;
use crate::block::{CodeBlock, Instr};
use crate::pool::OpcodePool;
use rustc_hash::FxHashMap;

/// Decodes one code object (and, recursively, the code objects in its
/// consts) into a block tree.
///
/// Bytecode units are 2 bytes since 3.6; `EXTENDED_ARG` prefixes are emitted
/// as instructions of their own, exactly as the toolchain's disassembler
/// lists them, while still folding into the following instruction's argument
/// so nested code objects resolve through wide `LOAD_CONST` indices.
pub(crate) fn block_from_code(
    code: &RawCode,
    pool: &mut OpcodePool,
    depth: u32,
    max_depth: u32,
) -> Result<CodeBlock, PycError> {
    if depth >= max_depth {
        return Err(PycError::TooDeep { limit: max_depth });
    }
    if code.code.len() % 2 != 0 {
        return Err(PycError::OddCodeLength {
            len: code.code.len(),
        });
    }

    let starts: FxHashMap<u32, u32> = line_starts(&code.linetable, code.firstlineno)
        .into_iter()
        .collect();

    let mut instrs = Vec::with_capacity(code.code.len() / 2);
    let mut extended: u32 = 0;

    for (unit, pair) in code.code.chunks_exact(2).enumerate() {
        let offset = (unit * 2) as u32;
        let op = pair[0];
        let arg = (extended << 8) | pair[1] as u32;

        let name = opname(op).ok_or(PycError::UnknownOpcode { opcode: op, offset })?;
        let line = starts.get(&offset).copied();
        let mut instr = Instr::new(pool.intern(name), line);

        if op == EXTENDED_ARG {
            extended = arg;
            instrs.push(instr);
            continue;
        }
        extended = 0;

        if op == LOAD_CONST {
            let index = arg as usize;
            let value = code.consts.get(index).ok_or(PycError::BadConstIndex {
                index: arg,
                len: code.consts.len(),
            })?;
            if let Value::Code(nested) = value {
                instr.nested = Some(Box::new(block_from_code(
                    nested,
                    pool,
                    depth + 1,
                    max_depth,
                )?));
            }
        }

        instrs.push(instr);
    }

    Ok(CodeBlock::new(instrs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn raw(code: Vec<u8>, consts: Vec<Value>, linetable: Vec<u8>) -> RawCode {
        RawCode {
            code,
            consts,
            name: "<module>".to_owned(),
            firstlineno: 1,
            linetable,
        }
    }

    #[test]
    fn decodes_a_flat_unit() {
        // LOAD_CONST 0; RETURN_VALUE: one 4-byte range on line 1.
        let code = raw(vec![100, 0, 83, 0], vec![Value::None], vec![4, 0]);
        let mut pool = OpcodePool::new();
        let block = block_from_code(&code, &mut pool, 0, 64).expect("decode");

        assert_eq!(block.instrs.len(), 2);
        assert_eq!(pool.resolve(block.instrs[0].op), "LOAD_CONST");
        assert_eq!(block.instrs[0].line, Some(1));
        assert_eq!(pool.resolve(block.instrs[1].op), "RETURN_VALUE");
        assert_eq!(block.instrs[1].line, None);
    }

    #[test]
    fn nested_code_objects_become_nested_blocks() {
        let inner = raw(vec![124, 0, 83, 0], vec![], vec![4, 1]);
        let outer = raw(
            vec![100, 0, 132, 0, 90, 0, 83, 0],
            vec![Value::Code(Rc::new(inner)), Value::None],
            vec![8, 0],
        );

        let mut pool = OpcodePool::new();
        let block = block_from_code(&outer, &mut pool, 0, 64).expect("decode");
        assert_eq!(block.block_count(), 2);
        assert_eq!(block.instruction_count(), 6);

        let nested = block.instrs[0].nested.as_ref().expect("nested block");
        assert_eq!(pool.resolve(nested.instrs[0].op), "LOAD_FAST");
        assert_eq!(nested.instrs[0].line, Some(2));
    }

    #[test]
    fn extended_arg_folds_into_const_index() {
        // EXTENDED_ARG 1; LOAD_CONST 0 resolves const index 256.
        let mut consts: Vec<Value> = (0..256).map(|_| Value::None).collect();
        consts.push(Value::Bool(true));
        let code = raw(vec![144, 1, 100, 0, 83, 0], consts, vec![6, 0]);

        let mut pool = OpcodePool::new();
        let block = block_from_code(&code, &mut pool, 0, 64).expect("decode");
        assert_eq!(block.instrs.len(), 3);
        assert_eq!(pool.resolve(block.instrs[0].op), "EXTENDED_ARG");
    }

    #[test]
    fn extended_arg_out_of_range_const_errors() {
        let code = raw(vec![144, 1, 100, 0, 83, 0], vec![Value::None], vec![6, 0]);
        let err =
            block_from_code(&code, &mut OpcodePool::new(), 0, 64).expect_err("const index");
        assert!(matches!(err, PycError::BadConstIndex { index: 256, len: 1 }));
    }

    #[test]
    fn unknown_opcode_errors() {
        let code = raw(vec![0, 0], vec![], vec![2, 0]);
        let err = block_from_code(&code, &mut OpcodePool::new(), 0, 64).expect_err("opcode");
        assert!(matches!(
            err,
            PycError::UnknownOpcode {
                opcode: 0,
                offset: 0
            }
        ));
    }

    #[test]
    fn odd_code_length_errors() {
        let code = raw(vec![100], vec![], vec![]);
        let err = block_from_code(&code, &mut OpcodePool::new(), 0, 64).expect_err("length");
        assert!(matches!(err, PycError::OddCodeLength { len: 1 }));
    }

    #[test]
    fn nesting_limit_applies_to_code_objects() {
        let mut code = raw(vec![83, 0], vec![], vec![2, 0]);
        for _ in 0..5 {
            code = raw(
                vec![100, 0, 83, 0],
                vec![Value::Code(Rc::new(code))],
                vec![4, 0],
            );
        }
        let err = block_from_code(&code, &mut OpcodePool::new(), 0, 3).expect_err("depth");
        assert!(matches!(err, PycError::TooDeep { limit: 3 }));
    }
}
