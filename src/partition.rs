//! Fast non-cryptographic routing of keys to buckets.
//!
//! CRC32 is used purely for load distribution across buckets, never for
//! authentication; collisions are expected and tolerated (colliding keys
//! simply share a bucket).

/// Map a key representation to a 32-bit partition value.
///
/// Deterministic for a given input. The bucket index is derived by masking
/// this value with `capacity - 1` (capacity is always a power of two).
pub fn partition(key: &[u8]) -> u32 {
    crc32fast::hash(key)
}
