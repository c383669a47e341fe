use rand_core::RngCore;

use super::{random_bit, roll_percent};

/// Percent chance that any given position is intercepted.
const INTERCEPT_PCT: u32 = 60;
/// Percent chance that an intercepted bit collapses to a fresh random value.
const DISTURB_PCT: u32 = 50;

/// Simulates the quantum channel. With no eavesdropper the sequence passes
/// through unchanged. With one, each position is independently intercepted
/// with probability 0.6 and, if intercepted, replaced by a fresh random bit
/// with probability 0.5.
///
/// Interception only ever rewrites the bit value; the recorded basis is
/// untouched. Downstream QBER thresholds are calibrated against exactly this
/// asymmetry.
pub fn transmit(bits: &[bool], eavesdropper: bool, rng: &mut dyn RngCore) -> Vec<bool> {
    if !eavesdropper {
        return bits.to_vec();
    }
    bits.iter()
        .map(|&bit| {
            if roll_percent(rng, INTERCEPT_PCT) && roll_percent(rng, DISTURB_PCT) {
                random_bit(rng)
            } else {
                bit
            }
        })
        .collect()
}
