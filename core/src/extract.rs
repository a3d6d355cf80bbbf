//! Flattening of an instruction-block tree into one ordered token stream.

use crate::block::CodeBlock;
use crate::pool::OpId;

/// Transient pair produced by extraction and consumed by line grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstrToken {
    pub line: Option<u32>,
    pub op: OpId,
}

/// Flattens `block` depth-first, pre-order, with immediate recursion: each
/// instruction emits its own token and then, before the next sibling, the
/// entire stream of its nested block if it has one. That interleaving
/// determines where nested-scope instructions land relative to the
/// instruction that introduces them, which in turn fixes the line-gram
/// boundaries downstream, so it must not be reordered.
pub fn extract_tokens(block: &CodeBlock) -> Vec<InstrToken> {
    let mut out = Vec::new();
    walk(block, &mut out);
    out
}

fn walk(block: &CodeBlock, out: &mut Vec<InstrToken>) {
    for instr in &block.instrs {
        out.push(InstrToken {
            line: instr.line,
            op: instr.op,
        });
        if let Some(nested) = &instr.nested {
            walk(nested, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Instr;
    use crate::pool::OpcodePool;

    fn ops(pool: &mut OpcodePool, names: &[&str]) -> Vec<OpId> {
        names.iter().map(|n| pool.intern(n)).collect()
    }

    #[test]
    fn empty_block_yields_no_tokens() {
        assert!(extract_tokens(&CodeBlock::default()).is_empty());
    }

    #[test]
    fn flat_block_preserves_order() {
        let mut pool = OpcodePool::new();
        let ids = ops(&mut pool, &["LOAD_CONST", "STORE_NAME", "RETURN_VALUE"]);
        let block = CodeBlock::new(vec![
            Instr::new(ids[0], Some(1)),
            Instr::new(ids[1], None),
            Instr::new(ids[2], Some(2)),
        ]);

        let tokens = extract_tokens(&block);
        assert_eq!(
            tokens.iter().map(|t| t.op).collect::<Vec<_>>(),
            vec![ids[0], ids[1], ids[2]]
        );
        assert_eq!(
            tokens.iter().map(|t| t.line).collect::<Vec<_>>(),
            vec![Some(1), None, Some(2)]
        );
    }

    #[test]
    fn nested_block_is_emitted_before_next_sibling() {
        let mut pool = OpcodePool::new();
        let ids = ops(
            &mut pool,
            &["LOAD_CONST", "MAKE_FUNCTION", "LOAD_FAST", "RETURN_VALUE"],
        );

        let inner = CodeBlock::new(vec![
            Instr::new(ids[2], Some(2)),
            Instr::new(ids[3], None),
        ]);
        // `LOAD_CONST <code>` carries the nested body; its instructions must
        // appear between the LOAD_CONST and the following MAKE_FUNCTION.
        let outer = CodeBlock::new(vec![
            Instr::with_nested(ids[0], Some(1), inner),
            Instr::new(ids[1], None),
            Instr::new(ids[3], Some(3)),
        ]);

        let tokens = extract_tokens(&outer);
        assert_eq!(
            tokens.iter().map(|t| t.op).collect::<Vec<_>>(),
            vec![ids[0], ids[2], ids[3], ids[1], ids[3]]
        );
    }

    #[test]
    fn deep_nesting_is_flattened_in_full() {
        let mut pool = OpcodePool::new();
        let op = pool.intern("NOP");

        let mut block = CodeBlock::new(vec![Instr::new(op, Some(1))]);
        for depth in 2..=40u32 {
            block = CodeBlock::new(vec![Instr::with_nested(op, Some(depth), block)]);
        }

        assert_eq!(extract_tokens(&block).len(), 40);
    }
}
