//! Deterministic random number generation for placeholder data.
//!
//! RULE: Nothing here may call a platform RNG.
//! Every stream is derived from one master seed (from `DummyConfig`) and a
//! stable stream key, so the same config always yields the same
//! placeholder propositions.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG stream.
pub struct SeededRng {
    pub name: String,
    inner: Pcg64Mcg,
}

impl SeededRng {
    /// Create a stream from the master seed and a stable stream index.
    pub fn new(master_seed: u64, stream_index: u64) -> Self {
        let derived_seed = master_seed ^ (stream_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed".into(),
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Uniform pick from a non-empty slice.
    pub fn choose<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.next_u64_below(items.len() as u64) as usize]
    }
}

/// Hands out per-chain streams for a single master seed.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    /// Stream for a chain id. The index is an FNV-1a hash of the id, so it
    /// does not depend on which other chains are loaded.
    pub fn for_chain(&self, chain_id: &str) -> SeededRng {
        SeededRng::new(self.master_seed, stream_index(chain_id)).with_name(chain_id)
    }

    /// Stream for the shared default placeholder set.
    pub fn for_default(&self) -> SeededRng {
        SeededRng::new(self.master_seed, 0).with_name("default")
    }
}

fn stream_index(key: &str) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
    key.bytes()
        .fold(FNV_OFFSET, |hash, b| (hash ^ b as u64).wrapping_mul(FNV_PRIME))
}
