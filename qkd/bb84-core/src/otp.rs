//! One-time-pad collaborator consumed after a key is distilled. Sits outside
//! the coordinator's responsibility: it only needs a key of sufficient bit
//! length from a completed session.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OtpError {
    #[error("key too short: need {need} bits, have {have}")]
    KeyTooShort { need: usize, have: usize },
    #[error("decode error: {0}")]
    DecodeError(String),
}

/// XORs the message against a prefix of the key bitstream and returns the
/// ciphertext as hex. The key must carry at least as many bits as the
/// message.
pub fn encrypt(message: &str, key_hex: &str) -> Result<String, OtpError> {
    let key = decode_hex("key", key_hex)?;
    let msg = message.as_bytes();
    if key.len() * 8 < msg.len() * 8 {
        return Err(OtpError::KeyTooShort {
            need: msg.len() * 8,
            have: key.len() * 8,
        });
    }
    let cipher: Vec<u8> = msg.iter().zip(key.iter()).map(|(m, k)| m ^ k).collect();
    Ok(hex::encode(cipher))
}

/// Inverse of [`encrypt`]: XORs the ciphertext against the same key prefix
/// and decodes the plaintext as UTF-8.
pub fn decrypt(cipher_hex: &str, key_hex: &str) -> Result<String, OtpError> {
    let key = decode_hex("key", key_hex)?;
    let cipher = decode_hex("ciphertext", cipher_hex)?;
    if key.len() * 8 < cipher.len() * 8 {
        return Err(OtpError::KeyTooShort {
            need: cipher.len() * 8,
            have: key.len() * 8,
        });
    }
    let plain: Vec<u8> = cipher.iter().zip(key.iter()).map(|(c, k)| c ^ k).collect();
    String::from_utf8(plain).map_err(|e| OtpError::DecodeError(format!("plaintext utf-8: {e}")))
}

fn decode_hex(what: &str, raw: &str) -> Result<Vec<u8>, OtpError> {
    hex::decode(raw).map_err(|e| OtpError::DecodeError(format!("{what} hex: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "9f2c1a7be4d8065312f0cc9aa1b35e77d4419a02c6ee58b1730f2d9c84a6e5f3";

    #[test]
    fn round_trip_restores_the_message() {
        let cipher = encrypt("quantum channel clear", KEY).unwrap();
        assert_eq!(decrypt(&cipher, KEY).unwrap(), "quantum channel clear");
    }

    #[test]
    fn ciphertext_differs_from_plaintext_hex() {
        let cipher = encrypt("hello", KEY).unwrap();
        assert_ne!(cipher, hex::encode("hello"));
    }

    #[test]
    fn message_longer_than_the_key_is_rejected() {
        let long = "x".repeat(33); // 264 bits against a 256-bit key
        let err = encrypt(&long, KEY).unwrap_err();
        assert_eq!(
            err,
            OtpError::KeyTooShort {
                need: 264,
                have: 256
            }
        );
    }

    #[test]
    fn malformed_hex_is_a_decode_error() {
        assert!(matches!(
            encrypt("hi", "not-hex"),
            Err(OtpError::DecodeError(_))
        ));
        assert!(matches!(
            decrypt("zz", KEY),
            Err(OtpError::DecodeError(_))
        ));
    }

    #[test]
    fn wrong_key_does_not_round_trip() {
        let cipher = encrypt("attack at dawn", KEY).unwrap();
        let other = "00".repeat(32);
        let out = decrypt(&cipher, &other);
        if let Ok(text) = out {
            assert_ne!(text, "attack at dawn");
        }
    }
}
