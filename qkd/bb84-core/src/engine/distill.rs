use sha2::{Digest, Sha256};

use crate::error::SessionError;

/// Fewer surviving bits than this cannot be distilled into a key.
pub const MIN_DISTILL_BITS: usize = 4;

/// Privacy-amplification stand-in: packs the bits into bytes (zero-padded to
/// a byte boundary, most significant bit first) and compresses through
/// SHA-256 into a fixed 64-character hex digest. Deterministic; not formal
/// universal hashing.
pub fn distill(bits: &[bool]) -> Result<String, SessionError> {
    if bits.len() < MIN_DISTILL_BITS {
        return Err(SessionError::InsufficientBits {
            have: bits.len(),
            need: MIN_DISTILL_BITS,
        });
    }
    let mut bytes = vec![0u8; bits.len().div_ceil(8)];
    for (i, &bit) in bits.iter().enumerate() {
        if bit {
            bytes[i / 8] |= 1 << (7 - (i % 8));
        }
    }
    Ok(hex::encode(Sha256::digest(&bytes)))
}
