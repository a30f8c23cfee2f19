//! Dense integer ids for task names.
//!
//! The engine evaluates tasks through `Vec`s indexed by these ids instead of
//! hashing names on every lookup. Ids are handed out in insertion order.

use rustc_hash::FxHashMap;

/// Interned task id.
pub type TaskIdx = u32;

/// Two-way mapping between task names and [`TaskIdx`] values.
#[derive(Debug, Clone, Default)]
pub struct NameInterner<'a> {
    to_idx: FxHashMap<&'a str, TaskIdx>,
    names: Vec<&'a str>,
}

impl<'a> NameInterner<'a> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_idx: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            names: Vec::with_capacity(capacity),
        }
    }

    /// Intern a name, returning the existing id if it was seen before.
    pub fn intern(&mut self, name: &'a str) -> TaskIdx {
        if let Some(&idx) = self.to_idx.get(name) {
            return idx;
        }
        let idx = self.names.len() as TaskIdx;
        self.names.push(name);
        self.to_idx.insert(name, idx);
        idx
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<TaskIdx> {
        self.to_idx.get(name).copied()
    }

    #[inline]
    pub fn resolve(&self, idx: TaskIdx) -> Option<&'a str> {
        self.names.get(idx as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}
