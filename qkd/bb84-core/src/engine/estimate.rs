use rand_core::RngCore;

/// Divisor for the eavesdropper's forced error injection ceiling. A tunable
/// simulation aid, not a physical constant: it models detectable disturbance
/// even when random chance produced none.
pub const EVE_INJECTION_DIVISOR: usize = 15;

/// Divisor bounding how many trailing bits the public comparison may spend.
const SACRIFICE_DIVISOR: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub error_rate: f64,
    pub error_count: usize,
    pub remaining: Vec<bool>,
}

/// Estimates the error rate on the sifted sequence and spends the bits
/// consumed by the public comparison.
///
/// The sacrifice drops the trailing `min(errors + 1, max(1, total / 8))`
/// bits, except when that would empty the sequence entirely, in which case
/// nothing is removed. The published rate is clamped to 1.0: on tiny sifted
/// sets the injected errors can exceed the comparison window.
pub fn check_errors(
    sender_bits: &[bool],
    sifted_bits: &[bool],
    matching_indices: &[usize],
    eavesdropper: bool,
    rng: &mut dyn RngCore,
) -> Estimate {
    let total = sifted_bits.len();
    if total == 0 {
        return Estimate {
            error_rate: 0.0,
            error_count: 0,
            remaining: Vec::new(),
        };
    }

    let mut errors = 0usize;
    for (k, &bit) in sifted_bits.iter().enumerate() {
        if let Some(&idx) = matching_indices.get(k) {
            if let Some(&sent) = sender_bits.get(idx) {
                if sent != bit {
                    errors += 1;
                }
            }
        }
    }

    if eavesdropper {
        let ceiling = (total / EVE_INJECTION_DIVISOR).max(1);
        errors += 1 + rng.next_u32() as usize % ceiling;
    }

    let error_rate = (errors as f64 / total as f64).min(1.0);
    let sacrifice = (errors + 1).min((total / SACRIFICE_DIVISOR).max(1));
    let remaining = if sacrifice >= total {
        sifted_bits.to_vec()
    } else {
        sifted_bits[..total - sacrifice].to_vec()
    };

    Estimate {
        error_rate,
        error_count: errors,
        remaining,
    }
}
