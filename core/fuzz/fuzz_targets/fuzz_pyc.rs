#![no_main]

use codesim::{parse_pyc, OpcodePool};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut pool = OpcodePool::new();
    let _ = parse_pyc(data, &mut pool, 64);
});
