use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Interned handle for an opcode name.
///
/// The opcode vocabulary is open (it comes from whatever instruction format
/// produced the input), so opcodes are interned rather than enumerated. Two
/// `OpId`s compare equal iff they were interned into the same [`OpcodePool`]
/// from the same name.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OpId(pub u32);

impl std::fmt::Display for OpId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Interner mapping opcode names to dense [`OpId`]s.
///
/// Both inputs of a comparison must intern through the same pool; gram
/// equality is `OpId` equality and ids from different pools are unrelated.
#[derive(Debug, Default)]
pub struct OpcodePool {
    names: Vec<String>,
    index: FxHashMap<String, OpId>,
}

impl OpcodePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, name: &str) -> OpId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = OpId(self.names.len() as u32);
        self.names.push(name.to_owned());
        self.index.insert(name.to_owned(), id);
        id
    }

    /// Panics if `id` did not come from this pool.
    pub fn resolve(&self, id: OpId) -> &str {
        &self.names[id.0 as usize]
    }

    pub fn get(&self, name: &str) -> Option<OpId> {
        self.index.get(name).copied()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
