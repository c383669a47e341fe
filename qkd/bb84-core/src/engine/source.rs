use rand_core::RngCore;

use super::{random_bit, Method};
use crate::error::SessionError;

/// Produces the sender's bit and basis sequences, both uniformly random and
/// independent, length exactly `n`.
pub fn generate(
    n: usize,
    _method: Method,
    rng: &mut dyn RngCore,
) -> Result<(Vec<bool>, Vec<bool>), SessionError> {
    if n < 1 {
        return Err(SessionError::InvalidParameter(
            "qubit count must be at least 1".to_string(),
        ));
    }
    let mut bits = Vec::with_capacity(n);
    let mut bases = Vec::with_capacity(n);
    for _ in 0..n {
        bits.push(random_bit(rng));
        bases.push(random_bit(rng));
    }
    Ok((bits, bases))
}
