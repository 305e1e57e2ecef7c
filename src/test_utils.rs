//! Shared test helpers.

use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Deterministic pseudo-random entries with distinct keys.
pub(crate) fn random_entries(count: usize, seed: u64) -> Vec<(Vec<u8>, Vec<u8>)> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let key = format!("key-{:06}-{:08x}", i, rng.gen_range(0..=u32::MAX)).into_bytes();
            let mut value = vec![0u8; rng.gen_range(1..32)];
            rng.fill(&mut value[..]);
            (key, value)
        })
        .collect()
}
