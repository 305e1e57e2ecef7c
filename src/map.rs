//! The mutation-facing authenticated map façade.

use std::collections::HashMap;

use digest::{Digest, Output};
use sha2::Sha256;

use crate::{
    BucketMapError,
    hash::entry_digest,
    storage::{MemStorage, RawStorage},
    tree::BucketTree,
};

/// Default performance floor exponent: at least `2^3 = 8` buckets.
pub const DEFAULT_PERFORMANCE_FLOOR: u8 = 3;

/// A key/value map that maintains a cryptographic digest of its entire
/// contents, recomputed incrementally on every mutation.
///
/// The root digest is identical for two maps holding the same key-value pairs
/// regardless of the order and history of mutations that produced them, and
/// changes with overwhelming probability when any entry's key or value
/// changes. Reading it is always O(1); mutations cost O(k log k + log c)
/// digest work (k = bucket occupancy, c = bucket count), except at
/// power-of-two crossings of the entry count where the bucket tree is rebuilt
/// in O(n).
///
/// # Representation precondition
///
/// Keys and values are opaque byte strings. The caller must supply byte
/// representations that are injective over the objects actually stored: two
/// logically distinct keys (or values) encoding to the same bytes are
/// indistinguishable to the map, and the digest guarantees are conditional on
/// this property. The map cannot and does not enforce it.
///
/// # Commitment parameters
///
/// The digest algorithm `D` and the performance floor are part of the
/// commitment: roots produced under different algorithms or different floors
/// are unrelated values, and only equality under identical parameters is
/// meaningful.
///
/// # Concurrency
///
/// Single-writer and synchronous by design. Every public operation runs to
/// completion and leaves the structure fully consistent; shared use requires
/// external locking around every operation.
#[derive(Debug, Clone)]
pub struct AuthenticatedMap<D: Digest = Sha256, S: RawStorage = MemStorage> {
    storage: S,
    /// Live entry digests by key, mirroring the raw storage key set.
    digests: HashMap<Vec<u8>, Output<D>>,
    tree: BucketTree<D>,
}

impl<D: Digest, S: RawStorage + Default> AuthenticatedMap<D, S> {
    /// Create an empty map with the default performance floor.
    pub fn new() -> Self {
        Self::with_performance_floor(DEFAULT_PERFORMANCE_FLOOR)
            .expect("default performance floor is within range")
    }

    /// Create an empty map with a minimum bucket count of `2^floor`.
    ///
    /// The floor trades memory for resize frequency: a larger floor allocates
    /// more buckets even when the map is near-empty, but defers the O(n)
    /// rebuilds that happen when the entry count oscillates across small
    /// power-of-two boundaries. It is a tuning parameter, not a correctness
    /// parameter: any floor yields a correct map.
    pub fn with_performance_floor(floor: u8) -> Result<Self, BucketMapError> {
        Ok(Self {
            storage: S::default(),
            digests: HashMap::new(),
            tree: BucketTree::new(floor)?,
        })
    }

    /// Build a map from an iterator of entries.
    ///
    /// Later duplicates of a key overwrite earlier ones, as with repeated
    /// [`insert`](Self::insert).
    pub fn from_entries<I>(entries: I) -> Result<Self, BucketMapError>
    where
        I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>,
    {
        let mut map = Self::new();
        map.extend(entries)?;
        Ok(map)
    }
}

impl<D: Digest, S: RawStorage> AuthenticatedMap<D, S> {
    /// Create an empty map on top of a caller-supplied raw storage.
    ///
    /// The storage must start empty: the map cannot reconstruct entry digests
    /// for pre-existing entries it has never seen.
    pub fn with_storage(storage: S, floor: u8) -> Result<Self, BucketMapError> {
        if storage.count() != 0 {
            return Err(BucketMapError::InvalidInput(
                "raw storage must be empty at construction".into(),
            ));
        }
        Ok(Self {
            storage,
            digests: HashMap::new(),
            tree: BucketTree::new(floor)?,
        })
    }

    /// Insert or overwrite an entry.
    ///
    /// Computes the entry digest, routes it to its bucket and recomputes the
    /// digests on the path to the root. Inserting a brand-new key may first
    /// grow the bucket tree; the resize happens before bucket assignment so
    /// the new entry lands in the correctly-sized tree. Raw storage is
    /// updated last so a digest-side failure leaves it untouched.
    pub fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), BucketMapError> {
        let new_digest = entry_digest::<D>(key, value);

        match self.digests.get(key).cloned() {
            Some(old_digest) => {
                // Value change: the entry count is unchanged, so no resize
                // can occur and the bucket stays the same.
                self.tree.remove_digest(key, &old_digest)?;
                self.tree.insert_digest(key, new_digest.clone());
            }
            None => {
                self.tree.maybe_resize(self.digests.len() + 1, &self.digests);
                self.tree.insert_digest(key, new_digest.clone());
            }
        }

        self.digests.insert(key.to_vec(), new_digest);
        self.storage.set(key.to_vec(), value.to_vec());
        Ok(())
    }

    /// Remove an entry.
    ///
    /// Fails with [`BucketMapError::KeyNotFound`] if the key is absent. The
    /// bucket tree may shrink afterwards, down to the floor capacity.
    pub fn delete(&mut self, key: &[u8]) -> Result<(), BucketMapError> {
        let old_digest = self
            .digests
            .remove(key)
            .ok_or_else(|| BucketMapError::KeyNotFound(hex::encode(key)))?;

        self.tree.remove_digest(key, &old_digest)?;

        if !self.storage.delete(key) {
            return Err(BucketMapError::InvariantViolation(format!(
                "key {} present in digest index but absent from raw storage",
                hex::encode(key)
            )));
        }

        self.tree.maybe_resize(self.digests.len(), &self.digests);
        Ok(())
    }

    /// The value stored for `key`.
    ///
    /// Fails with [`BucketMapError::KeyNotFound`] if the key is absent.
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>, BucketMapError> {
        self.storage
            .get(key)
            .ok_or_else(|| BucketMapError::KeyNotFound(hex::encode(key)))
    }

    /// The value stored for `key`, inserting `default` first if absent.
    pub fn get_or_insert(&mut self, key: &[u8], default: &[u8]) -> Result<Vec<u8>, BucketMapError> {
        if !self.contains(key) {
            self.insert(key, default)?;
        }
        self.get(key)
    }

    /// Insert every entry from an iterator, overwriting existing keys.
    pub fn extend<I>(&mut self, entries: I) -> Result<(), BucketMapError>
    where
        I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>,
    {
        for (key, value) in entries {
            self.insert(&key, &value)?;
        }
        Ok(())
    }

    /// Remove every entry, returning the map to its freshly-constructed
    /// state at floor capacity.
    pub fn clear(&mut self) {
        let keys: Vec<Vec<u8>> = self.digests.keys().cloned().collect();
        for key in keys {
            self.storage.delete(&key);
        }
        self.digests.clear();
        self.tree.reset();
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.storage.contains(key)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.storage.count()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current number of buckets in the authentication tree. Always a power
    /// of two and at least `2^floor`.
    pub fn capacity(&self) -> usize {
        self.tree.capacity()
    }

    /// The root digest authenticating the map's entire contents.
    ///
    /// O(1): the root is maintained eagerly by every mutation and never
    /// recomputed on read.
    pub fn root_hash(&self) -> Output<D> {
        self.tree.root_digest().clone()
    }
}

impl<D: Digest, S: RawStorage + Default> Default for AuthenticatedMap<D, S> {
    fn default() -> Self {
        Self::new()
    }
}
