//! Decoder for the CPython 3.10 line table (PEP 626).
//!
//! The table is a sequence of `(address delta: u8, line delta: i8)` pairs.
//! A line delta of -128 marks a range with no line; pairs with a zero
//! address delta chain larger line jumps. The output mirrors the
//! disassembler's `findlinestarts`: the offsets where a new source line
//! begins, deduplicated against the previously reported line.

/// Marker for "this range has no line number".
const NO_LINE_DELTA: i8 = -128;

pub(crate) fn line_starts(linetable: &[u8], firstlineno: i32) -> Vec<(u32, u32)> {
    let mut starts = Vec::new();
    let mut addr: u32 = 0;
    let mut computed = firstlineno as i64;
    let mut last_line: Option<i64> = None;

    for pair in linetable.chunks_exact(2) {
        let addr_delta = pair[0] as u32;
        let line_delta = pair[1] as i8;

        let line = if line_delta == NO_LINE_DELTA {
            None
        } else {
            computed += line_delta as i64;
            Some(computed)
        };

        let range_start = addr;
        addr = addr.saturating_add(addr_delta);

        if let Some(line) = line {
            if addr_delta > 0 && last_line != Some(line) {
                starts.push((range_start, line.max(0) as u32));
                last_line = Some(line);
            }
        }
    }

    starts
}
