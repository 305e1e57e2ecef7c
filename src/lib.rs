//! Authenticated key/value map with an incrementally maintained digest.
//!
//! Entries are partitioned into a complete binary tree of buckets by a CRC32
//! of the key. Each bucket holds the cryptographic digests of its member
//! entries and digests them in sorted order, so the bucket digest (and
//! therefore the root digest) is independent of insertion order:
//!
//! `root = D(left || right)` recursively, `bucket = D(sorted entry digests)`,
//! `entry = D(D(key) || D(value))`.
//!
//! Mutations update one bucket and the O(log n) path above it; the bucket
//! count grows and shrinks at power-of-two crossings of the entry count,
//! rebuilding the tree in O(n). The digest algorithm is pluggable through
//! the [`digest::Digest`] trait and defaults to SHA-256.

#![warn(missing_docs)]

mod bucket;
mod error;
pub(crate) mod hash;
mod map;
pub mod partition;
pub mod storage;
mod tree;

#[cfg(test)]
pub(crate) mod test_utils;

pub use digest::{Digest, Output};
pub use error::BucketMapError;
pub use map::{AuthenticatedMap, DEFAULT_PERFORMANCE_FLOOR};
pub use sha2::Sha256;
pub use storage::{MemStorage, RawStorage};
