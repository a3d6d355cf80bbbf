//! The CPython 3.10 opcode name table.
//!
//! Kept as data rather than an enum: the comparison pipeline treats opcode
//! names as an open vocabulary, and this table exists only so the binary
//! reader can emit the same names the toolchain's disassembler would.

pub(crate) const LOAD_CONST: u8 = 100;
pub(crate) const EXTENDED_ARG: u8 = 144;

pub(crate) fn opname(op: u8) -> Option<&'static str> {
    Some(match op {
        1 => "POP_TOP",
        2 => "ROT_TWO",
        3 => "ROT_THREE",
        4 => "DUP_TOP",
        5 => "DUP_TOP_TWO",
        6 => "ROT_FOUR",
        9 => "NOP",
        10 => "UNARY_POSITIVE",
        11 => "UNARY_NEGATIVE",
        12 => "UNARY_NOT",
        15 => "UNARY_INVERT",
        16 => "BINARY_MATRIX_MULTIPLY",
        17 => "INPLACE_MATRIX_MULTIPLY",
        19 => "BINARY_POWER",
        20 => "BINARY_MULTIPLY",
        22 => "BINARY_MODULO",
        23 => "BINARY_ADD",
        24 => "BINARY_SUBTRACT",
        25 => "BINARY_SUBSCR",
        26 => "BINARY_FLOOR_DIVIDE",
        27 => "BINARY_TRUE_DIVIDE",
        28 => "INPLACE_FLOOR_DIVIDE",
        29 => "INPLACE_TRUE_DIVIDE",
        30 => "GET_LEN",
        31 => "MATCH_MAPPING",
        32 => "MATCH_SEQUENCE",
        33 => "MATCH_KEYS",
        34 => "COPY_DICT_WITHOUT_KEYS",
        49 => "WITH_EXCEPT_START",
        50 => "GET_AITER",
        51 => "GET_ANEXT",
        52 => "BEFORE_ASYNC_WITH",
        54 => "END_ASYNC_FOR",
        55 => "INPLACE_ADD",
        56 => "INPLACE_SUBTRACT",
        57 => "INPLACE_MULTIPLY",
        59 => "INPLACE_MODULO",
        60 => "STORE_SUBSCR",
        61 => "DELETE_SUBSCR",
        62 => "BINARY_LSHIFT",
        63 => "BINARY_RSHIFT",
        64 => "BINARY_AND",
        65 => "BINARY_XOR",
        66 => "BINARY_OR",
        67 => "INPLACE_POWER",
        68 => "GET_ITER",
        69 => "GET_YIELD_FROM_ITER",
        70 => "PRINT_EXPR",
        71 => "LOAD_BUILD_CLASS",
        72 => "YIELD_FROM",
        73 => "GET_AWAITABLE",
        74 => "LOAD_ASSERTION_ERROR",
        75 => "INPLACE_LSHIFT",
        76 => "INPLACE_RSHIFT",
        77 => "INPLACE_AND",
        78 => "INPLACE_XOR",
        79 => "INPLACE_OR",
        82 => "LIST_TO_TUPLE",
        83 => "RETURN_VALUE",
        84 => "IMPORT_STAR",
        85 => "SETUP_ANNOTATIONS",
        86 => "YIELD_VALUE",
        87 => "POP_BLOCK",
        89 => "POP_EXCEPT",
        90 => "STORE_NAME",
        91 => "DELETE_NAME",
        92 => "UNPACK_SEQUENCE",
        93 => "FOR_ITER",
        94 => "UNPACK_EX",
        95 => "STORE_ATTR",
        96 => "DELETE_ATTR",
        97 => "STORE_GLOBAL",
        98 => "DELETE_GLOBAL",
        99 => "ROT_N",
        100 => "LOAD_CONST",
        101 => "LOAD_NAME",
        102 => "BUILD_TUPLE",
        103 => "BUILD_LIST",
        104 => "BUILD_SET",
        105 => "BUILD_MAP",
        106 => "LOAD_ATTR",
        107 => "COMPARE_OP",
        108 => "IMPORT_NAME",
        109 => "IMPORT_FROM",
        110 => "JUMP_FORWARD",
        111 => "JUMP_IF_FALSE_OR_POP",
        112 => "JUMP_IF_TRUE_OR_POP",
        113 => "JUMP_ABSOLUTE",
        114 => "POP_JUMP_IF_FALSE",
        115 => "POP_JUMP_IF_TRUE",
        116 => "LOAD_GLOBAL",
        117 => "IS_OP",
        118 => "CONTAINS_OP",
        119 => "RERAISE",
        121 => "JUMP_IF_NOT_EXC_MATCH",
        122 => "SETUP_FINALLY",
        124 => "LOAD_FAST",
        125 => "STORE_FAST",
        126 => "DELETE_FAST",
        129 => "GEN_START",
        130 => "RAISE_VARARGS",
        131 => "CALL_FUNCTION",
        132 => "MAKE_FUNCTION",
        133 => "BUILD_SLICE",
        135 => "LOAD_CLOSURE",
        136 => "LOAD_DEREF",
        137 => "STORE_DEREF",
        138 => "DELETE_DEREF",
        141 => "CALL_FUNCTION_KW",
        142 => "CALL_FUNCTION_EX",
        143 => "SETUP_WITH",
        144 => "EXTENDED_ARG",
        145 => "LIST_APPEND",
        146 => "SET_ADD",
        147 => "MAP_ADD",
        148 => "LOAD_CLASSDEREF",
        152 => "MATCH_CLASS",
        154 => "SETUP_ASYNC_WITH",
        155 => "FORMAT_VALUE",
        156 => "BUILD_CONST_KEY_MAP",
        157 => "BUILD_STRING",
        160 => "LOAD_METHOD",
        161 => "CALL_METHOD",
        162 => "LIST_EXTEND",
        163 => "SET_UPDATE",
        164 => "DICT_MERGE",
        165 => "DICT_UPDATE",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_opcodes_resolve() {
        assert_eq!(opname(LOAD_CONST), Some("LOAD_CONST"));
        assert_eq!(opname(EXTENDED_ARG), Some("EXTENDED_ARG"));
        assert_eq!(opname(83), Some("RETURN_VALUE"));
        assert_eq!(opname(124), Some("LOAD_FAST"));
    }

    #[test]
    fn gaps_in_the_table_are_none() {
        assert_eq!(opname(0), None);
        assert_eq!(opname(7), None);
        assert_eq!(opname(255), None);
    }
}
