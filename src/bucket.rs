//! Leaf buckets of the authentication tree.

use digest::{Digest, Output};

use crate::{BucketMapError, hash};

/// A leaf of the authentication tree, holding the digests of every entry
/// routed to it.
///
/// Members are kept sorted so the bucket digest is independent of insertion
/// order. The digest is recomputed eagerly on every mutation; reads are O(1).
/// A bucket is a pure digest multiset: it does not know which key produced a
/// member, so a caller replacing a value must remove the stale digest itself.
#[derive(Debug, Clone)]
pub(crate) struct Bucket<D: Digest> {
    members: Vec<Output<D>>,
    digest: Output<D>,
}

impl<D: Digest> Bucket<D> {
    /// Create an empty bucket. Its digest is the digest of the empty
    /// sequence, `D("")`.
    pub(crate) fn new() -> Self {
        Self {
            members: Vec::new(),
            digest: hash::empty_digest::<D>(),
        }
    }

    /// Build a bucket from an unsorted batch of member digests, sorting and
    /// digesting once. Used when the tree rebuilds all buckets on a resize.
    pub(crate) fn from_members(mut members: Vec<Output<D>>) -> Self {
        members.sort_unstable();
        let mut bucket = Self {
            members,
            digest: hash::empty_digest::<D>(),
        };
        bucket.recompute();
        bucket
    }

    /// Insert an entry digest and recompute the bucket digest.
    ///
    /// Duplicates are tolerated: two distinct keys producing the same entry
    /// digest (a collision of `D`) each contribute one member, so a later
    /// removal of one of them cannot strand the other.
    pub(crate) fn add(&mut self, entry_digest: Output<D>) {
        let position = match self.members.binary_search(&entry_digest) {
            Ok(position) | Err(position) => position,
        };
        self.members.insert(position, entry_digest);
        self.recompute();
    }

    /// Remove one occurrence of an entry digest and recompute the bucket
    /// digest.
    ///
    /// Removing a digest that is not present means the caller's bookkeeping
    /// and the tree have diverged; it is rejected rather than ignored.
    pub(crate) fn remove(&mut self, entry_digest: &Output<D>) -> Result<(), BucketMapError> {
        let position = self.members.binary_search(entry_digest).map_err(|_| {
            BucketMapError::InvariantViolation(format!(
                "entry digest {} absent from its bucket",
                hex::encode(entry_digest)
            ))
        })?;
        self.members.remove(position);
        self.recompute();
        Ok(())
    }

    /// The cached bucket digest: `D(concat(sorted members))`.
    pub(crate) fn digest(&self) -> &Output<D> {
        &self.digest
    }

    /// Number of member digests.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.members.len()
    }

    fn recompute(&mut self) {
        let mut hasher = D::new();
        for member in &self.members {
            hasher.update(member);
        }
        self.digest = hasher.finalize();
    }
}
