use crate::pool::OpcodePool;

/// Holds the state shared by both sides of a comparison: the opcode pool.
///
/// Loading two units through the same session guarantees their opcode ids
/// are comparable.
#[derive(Default)]
pub struct CompareSession {
    pub ops: OpcodePool,
}

impl CompareSession {
    pub fn new() -> Self {
        Self {
            ops: OpcodePool::new(),
        }
    }

    pub fn ops(&self) -> &OpcodePool {
        &self.ops
    }

    pub fn ops_mut(&mut self) -> &mut OpcodePool {
        &mut self.ops
    }
}
