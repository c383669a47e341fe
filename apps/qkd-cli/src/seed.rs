use rand_chacha::ChaCha20Rng;
use rand_core::{OsRng, RngCore, SeedableRng};
use sha2::{Digest, Sha256};

/// Set to a u64 to make every protocol roll reproducible (demo/test only).
pub const SEED_ENV: &str = "QKD_SEED";

/// Operating RNG for this invocation: seeded ChaCha20 when `QKD_SEED` is
/// set, the OS generator otherwise. The actor name is mixed into the seed so
/// sender and receiver draw distinct streams under one shared seed.
pub fn rng_from_env(actor: &str) -> Box<dyn RngCore + Send> {
    if let Ok(raw) = std::env::var(SEED_ENV) {
        if let Ok(seed) = raw.trim().parse::<u64>() {
            return Box::new(ChaCha20Rng::from_seed(derive_seed32(actor, seed)));
        }
    }
    Box::new(OsRng)
}

fn derive_seed32(actor: &str, seed: u64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"QKD.SEED");
    hasher.update(actor.as_bytes());
    hasher.update(seed.to_be_bytes());
    hasher.finalize().into()
}
