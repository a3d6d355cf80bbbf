//! Line grouping: partitioning a token stream into line-grams.

use crate::extract::InstrToken;
use crate::pool::OpId;

/// The maximal run of instructions attributed to one source line.
///
/// Grams are the atomic comparison unit of the aligner. Equality is full
/// sequence equality of the opcode list; the line number that opened the
/// gram does not participate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineGram {
    pub ops: Vec<OpId>,
}

impl LineGram {
    pub fn weight(&self) -> u64 {
        self.ops.len() as u64
    }
}

/// Groups `tokens` into line-grams.
///
/// A token carrying a line number closes the current gram and opens a new
/// one; a token without one is a continuation of the instruction that most
/// recently opened a line and is folded into the open gram. A leading run of
/// line-less tokens accumulates in the initially empty buffer and is flushed
/// as its own gram once the first lined token arrives; that tolerance is
/// deliberate and must not be turned into an error.
pub fn group_into_grams(tokens: &[InstrToken]) -> Vec<LineGram> {
    let mut grams = Vec::new();
    let mut current: Vec<OpId> = Vec::new();

    for token in tokens {
        if token.line.is_some() {
            if !current.is_empty() {
                grams.push(LineGram { ops: current });
            }
            current = vec![token.op];
        } else {
            current.push(token.op);
        }
    }

    if !current.is_empty() {
        grams.push(LineGram { ops: current });
    }

    debug_assert!(
        grams.iter().all(|g| !g.ops.is_empty()),
        "every gram must hold at least one opcode"
    );
    grams
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::OpcodePool;

    fn token(pool: &mut OpcodePool, name: &str, line: Option<u32>) -> InstrToken {
        InstrToken {
            line,
            op: pool.intern(name),
        }
    }

    #[test]
    fn empty_input_yields_empty_sequence() {
        assert!(group_into_grams(&[]).is_empty());
    }

    #[test]
    fn continuations_fold_into_the_open_gram() {
        let mut pool = OpcodePool::new();
        let tokens = vec![
            token(&mut pool, "LOAD_CONST", Some(1)),
            token(&mut pool, "STORE_NAME", None),
            token(&mut pool, "LOAD_NAME", Some(2)),
            token(&mut pool, "RETURN_VALUE", None),
        ];

        let grams = group_into_grams(&tokens);
        assert_eq!(grams.len(), 2);
        assert_eq!(grams[0].ops, vec![tokens[0].op, tokens[1].op]);
        assert_eq!(grams[1].ops, vec![tokens[2].op, tokens[3].op]);
    }

    #[test]
    fn leading_lineless_run_becomes_its_own_gram() {
        let mut pool = OpcodePool::new();
        let tokens = vec![
            token(&mut pool, "GEN_START", None),
            token(&mut pool, "LOAD_FAST", Some(3)),
            token(&mut pool, "RETURN_VALUE", None),
        ];

        let grams = group_into_grams(&tokens);
        assert_eq!(grams.len(), 2);
        assert_eq!(grams[0].ops, vec![tokens[0].op]);
        assert_eq!(grams[1].ops, vec![tokens[1].op, tokens[2].op]);
    }

    #[test]
    fn trailing_gram_is_flushed() {
        let mut pool = OpcodePool::new();
        let tokens = vec![
            token(&mut pool, "LOAD_CONST", Some(1)),
            token(&mut pool, "RETURN_VALUE", None),
        ];

        let grams = group_into_grams(&tokens);
        assert_eq!(grams.len(), 1);
        assert_eq!(grams[0].weight(), 2);
    }

    #[test]
    fn all_lineless_input_yields_a_single_gram() {
        let mut pool = OpcodePool::new();
        let tokens = vec![
            token(&mut pool, "NOP", None),
            token(&mut pool, "NOP", None),
        ];

        let grams = group_into_grams(&tokens);
        assert_eq!(grams.len(), 1);
        assert_eq!(grams[0].weight(), 2);
    }

    #[test]
    fn gram_count_preserves_total_opcode_count() {
        let mut pool = OpcodePool::new();
        let tokens: Vec<InstrToken> = (0..37)
            .map(|i| {
                token(
                    &mut pool,
                    if i % 2 == 0 { "LOAD_FAST" } else { "STORE_FAST" },
                    if i % 5 == 0 { Some(i as u32) } else { None },
                )
            })
            .collect();

        let grams = group_into_grams(&tokens);
        let total: u64 = grams.iter().map(LineGram::weight).sum();
        assert_eq!(total, tokens.len() as u64);
    }
}
