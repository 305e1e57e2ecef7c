//! Digest plumbing shared by buckets, tree nodes and the map façade.
//!
//! All digests go through the [`digest::Digest`] capability so any algorithm
//! with an incremental-update/finalize interface plugs in uniformly. Swapping
//! the algorithm changes output values only, never structural behavior.

use digest::{Digest, Output};

/// Compute the digest of a single entry: `D(D(key) || D(value))`.
///
/// Key and value are hashed separately before being combined so the
/// key/value boundary cannot shift: `("ab", "c")` and `("a", "bc")` digest
/// differently even though their concatenations are equal.
pub(crate) fn entry_digest<D: Digest>(key: &[u8], value: &[u8]) -> Output<D> {
    let mut hasher = D::new();
    hasher.update(D::digest(key));
    hasher.update(D::digest(value));
    hasher.finalize()
}

/// Compute an internal node digest: `D(left || right)`.
pub(crate) fn node_digest<D: Digest>(left: &Output<D>, right: &Output<D>) -> Output<D> {
    let mut hasher = D::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize()
}

/// Digest of the empty input, used as the digest of an empty bucket.
pub(crate) fn empty_digest<D: Digest>() -> Output<D> {
    D::new().finalize()
}
