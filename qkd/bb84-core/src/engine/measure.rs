use rand_core::RngCore;

use super::{random_bit, Method};

/// Simulates the receiver's measurement: a uniformly random basis per
/// position, the transmitted bit on basis agreement, a fresh random bit
/// otherwise. Inputs of unequal length are truncated to the shorter rather
/// than rejected, consistent with the defensive truncation the rest of the
/// pipeline applies.
pub fn measure(
    sender_bases: &[bool],
    transmitted: &[bool],
    _method: Method,
    rng: &mut dyn RngCore,
) -> (Vec<bool>, Vec<bool>) {
    let n = sender_bases.len().min(transmitted.len());
    let mut bases = Vec::with_capacity(n);
    let mut results = Vec::with_capacity(n);
    for i in 0..n {
        let basis = random_bit(rng);
        let result = if basis == sender_bases[i] {
            transmitted[i]
        } else {
            random_bit(rng)
        };
        bases.push(basis);
        results.push(result);
    }
    (bases, results)
}
