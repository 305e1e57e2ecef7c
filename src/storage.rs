//! Raw key/value storage behind the authenticated map.
//!
//! The map owns the authenticated digest tree; the plain key→value pairs live
//! in a [`RawStorage`] collaborator so adopters can supply their own mapping
//! without touching the digest machinery. The default is the
//! `BTreeMap`-backed [`MemStorage`].

use std::collections::BTreeMap;

/// A conventional mutable key→value mapping.
///
/// The authenticated map requires only these five operations. Implementations
/// must behave like a plain map: `set` overwrites, `delete` returns whether a
/// key was present, `count` reflects every completed mutation.
pub trait RawStorage {
    /// The value stored for `key`, if any.
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;
    /// Store `value` under `key`, overwriting any previous value.
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>);
    /// Remove `key`, returning whether it was present.
    fn delete(&mut self, key: &[u8]) -> bool;
    /// Whether `key` is present.
    fn contains(&self, key: &[u8]) -> bool;
    /// Number of live entries.
    fn count(&self) -> usize;
}

/// In-memory [`RawStorage`] backed by a `BTreeMap`.
#[derive(Debug, Default, Clone)]
pub struct MemStorage {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RawStorage for MemStorage {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.data.get(key).cloned()
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.data.insert(key, value);
    }

    fn delete(&mut self, key: &[u8]) -> bool {
        self.data.remove(key).is_some()
    }

    fn contains(&self, key: &[u8]) -> bool {
        self.data.contains_key(key)
    }

    fn count(&self) -> usize {
        self.data.len()
    }
}
