//! The complete binary tree of buckets and its digest propagation.

use std::collections::HashMap;

use digest::{Digest, Output};

use crate::{
    BucketMapError,
    bucket::Bucket,
    hash::{self, node_digest},
    partition::partition,
};

/// Largest allowed performance floor exponent (2^24 buckets).
const MAX_FLOOR: u8 = 24;

/// Validate that a performance floor exponent is in the allowed range.
pub(crate) fn validate_floor(floor: u8) -> Result<(), BucketMapError> {
    if floor > MAX_FLOOR {
        return Err(BucketMapError::InvalidInput(format!(
            "performance floor must be at most {}, got {}",
            MAX_FLOOR, floor
        )));
    }
    Ok(())
}

/// A complete binary tree whose leaves are digest buckets.
///
/// The tree is stored heap-style: internal node `i` has children `2i` and
/// `2i + 1`, the root is node 1, and bucket `b` occupies the implicit leaf
/// position `capacity + b`. Capacity is a pure function of the live entry
/// count, `max(2^floor, next_power_of_two(count))`, so the root digest of two
/// trees holding the same entries is identical regardless of the mutation
/// history that produced them.
///
/// Every mutation leaves the tree fully propagated; `root_digest` is always
/// an O(1) cached read.
#[derive(Debug, Clone)]
pub(crate) struct BucketTree<D: Digest> {
    floor: u8,
    capacity: usize,
    buckets: Vec<Bucket<D>>,
    /// Heap-indexed internal node digests; index 0 is unused. Empty leaves
    /// aside, `internal[1]` is the root whenever `capacity > 1`.
    internal: Vec<Output<D>>,
}

impl<D: Digest> BucketTree<D> {
    /// Create an empty tree at the floor capacity `2^floor`.
    pub(crate) fn new(floor: u8) -> Result<Self, BucketMapError> {
        validate_floor(floor)?;
        let capacity = 1usize << floor;
        let mut tree = Self {
            floor,
            capacity,
            buckets: (0..capacity).map(|_| Bucket::new()).collect(),
            internal: vec![hash::empty_digest::<D>(); capacity],
        };
        tree.recompute_all();
        Ok(tree)
    }

    /// Number of buckets. Always a power of two and at least `2^floor`.
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// The bucket index a key routes to at the current capacity.
    pub(crate) fn locate(&self, key: &[u8]) -> usize {
        partition(key) as usize & (self.capacity - 1)
    }

    /// Add an entry digest to the bucket its key routes to, then recompute
    /// every ancestor digest up to the root.
    pub(crate) fn insert_digest(&mut self, key: &[u8], entry_digest: Output<D>) {
        let index = self.locate(key);
        self.buckets[index].add(entry_digest);
        self.update_path(index);
    }

    /// Remove an entry digest from the bucket its key routes to, then
    /// recompute every ancestor digest up to the root.
    ///
    /// The digest being absent from the bucket is an invariant violation.
    pub(crate) fn remove_digest(
        &mut self,
        key: &[u8],
        entry_digest: &Output<D>,
    ) -> Result<(), BucketMapError> {
        let index = self.locate(key);
        self.buckets[index].remove(entry_digest)?;
        self.update_path(index);
        Ok(())
    }

    /// Resize to the capacity demanded by `new_count` if it differs from the
    /// current one, re-partitioning every live entry and recomputing the
    /// whole tree bottom-up.
    ///
    /// This is the only O(n) operation in the structure; it triggers exactly
    /// at power-of-two crossings of the entry count. Returns whether a resize
    /// happened.
    pub(crate) fn maybe_resize(
        &mut self,
        new_count: usize,
        entries: &HashMap<Vec<u8>, Output<D>>,
    ) -> bool {
        let target = Self::capacity_for(self.floor, new_count);
        if target == self.capacity {
            return false;
        }
        self.capacity = target;

        let mut members: Vec<Vec<Output<D>>> = (0..target).map(|_| Vec::new()).collect();
        for (key, entry_digest) in entries {
            members[partition(key) as usize & (target - 1)].push(entry_digest.clone());
        }
        self.buckets = members.into_iter().map(Bucket::from_members).collect();
        self.internal = vec![hash::empty_digest::<D>(); target];
        self.recompute_all();
        true
    }

    /// Drop every entry and return to the empty tree at floor capacity.
    pub(crate) fn reset(&mut self) {
        let capacity = 1usize << self.floor;
        self.capacity = capacity;
        self.buckets = (0..capacity).map(|_| Bucket::new()).collect();
        self.internal = vec![hash::empty_digest::<D>(); capacity];
        self.recompute_all();
    }

    /// The cached root digest. O(1), never recomputes.
    pub(crate) fn root_digest(&self) -> &Output<D> {
        if self.capacity == 1 {
            self.buckets[0].digest()
        } else {
            &self.internal[1]
        }
    }

    /// Capacity demanded by an entry count: the smallest power of two that
    /// holds one entry per bucket on average, floored at `2^floor`.
    fn capacity_for(floor: u8, count: usize) -> usize {
        count.next_power_of_two().max(1usize << floor)
    }

    /// Recompute ancestors of bucket `index`, leaf to root.
    fn update_path(&mut self, index: usize) {
        let mut node = (self.capacity + index) / 2;
        while node >= 1 {
            let digest = node_digest::<D>(self.child_digest(2 * node), self.child_digest(2 * node + 1));
            self.internal[node] = digest;
            node /= 2;
        }
    }

    /// Recompute every internal node bottom-up.
    fn recompute_all(&mut self) {
        for node in (1..self.capacity).rev() {
            let digest = node_digest::<D>(self.child_digest(2 * node), self.child_digest(2 * node + 1));
            self.internal[node] = digest;
        }
    }

    /// Digest of a heap position: an internal node below `capacity`, a bucket
    /// at or above it.
    fn child_digest(&self, heap_position: usize) -> &Output<D> {
        if heap_position < self.capacity {
            &self.internal[heap_position]
        } else {
            self.buckets[heap_position - self.capacity].digest()
        }
    }
}
