//! XChaCha20-Poly1305 message text encryption.
//!
//! Chat text in encrypted rooms travels as
//! `base64(nonce || ciphertext || tag)` inside the JSON envelope, so
//! the wire stays purely text. The 192-bit nonce is generated from OS
//! entropy per message and must never be reused with the same key.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::rngs::OsRng;
use rand::RngCore;

use lanchat_types::{LanchatError, Result};

use crate::kdf::RoomKey;

/// Byte length of the XChaCha20-Poly1305 nonce prepended to the
/// ciphertext.
const NONCE_LEN: usize = 24;

/// Byte length of the Poly1305 authentication tag appended by the
/// cipher.
const TAG_LEN: usize = 16;

// ---------------------------------------------------------------------------
// Encrypt / Decrypt
// ---------------------------------------------------------------------------

/// Encrypts message text with the room key.
///
/// Returns `base64(nonce || ciphertext)` where the ciphertext carries
/// the authentication tag.
///
/// # Errors
///
/// Returns [`LanchatError::CryptoError`] if the AEAD encryption fails.
pub fn encrypt_text(plaintext: &str, key: &RoomKey) -> Result<String> {
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(XNonce::from_slice(&nonce), plaintext.as_bytes())
        .map_err(|e| LanchatError::CryptoError {
            reason: format!("encryption failed: {e}"),
        })?;

    let mut raw = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    raw.extend_from_slice(&nonce);
    raw.extend_from_slice(&ciphertext);

    Ok(BASE64.encode(raw))
}

/// Decrypts message text produced by [`encrypt_text`].
///
/// Any failure (bad base64, truncated input, tag mismatch from a
/// wrong key or tampering, non-UTF-8 plaintext) yields a
/// [`LanchatError::CryptoError`]. Callers treat this as non-fatal:
/// the message is dropped, never surfaced as cleartext.
pub fn decrypt_text(encoded: &str, key: &RoomKey) -> Result<String> {
    let raw = BASE64
        .decode(encoded)
        .map_err(|e| LanchatError::CryptoError {
            reason: format!("ciphertext is not valid base64: {e}"),
        })?;

    if raw.len() < NONCE_LEN + TAG_LEN {
        return Err(LanchatError::CryptoError {
            reason: format!("ciphertext too short: {} bytes", raw.len()),
        });
    }

    let (nonce, ciphertext) = raw.split_at(NONCE_LEN);

    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    let plaintext = cipher
        .decrypt(XNonce::from_slice(nonce), ciphertext)
        .map_err(|_| LanchatError::CryptoError {
            reason: "decryption failed (wrong password?)".into(),
        })?;

    String::from_utf8(plaintext).map_err(|_| LanchatError::CryptoError {
        reason: "decrypted payload is not valid UTF-8".into(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdf::derive_room_key;

    #[test]
    fn encrypt_decrypt_roundtrip() -> Result<()> {
        let key = derive_room_key("hunter2", "general")?;
        let encrypted = encrypt_text("Hello World!", &key)?;
        assert_ne!(encrypted, "Hello World!");

        let decrypted = decrypt_text(&encrypted, &key)?;
        assert_eq!(decrypted, "Hello World!");
        Ok(())
    }

    #[test]
    fn wrong_password_fails() -> Result<()> {
        let key = derive_room_key("hunter2", "general")?;
        let other = derive_room_key("letmein", "general")?;

        let encrypted = encrypt_text("secret", &key)?;
        assert!(decrypt_text(&encrypted, &other).is_err());
        Ok(())
    }

    #[test]
    fn nonces_differ_per_message() -> Result<()> {
        let key = derive_room_key("hunter2", "general")?;
        let a = encrypt_text("same text", &key)?;
        let b = encrypt_text("same text", &key)?;
        assert_ne!(a, b);
        Ok(())
    }

    #[test]
    fn tampered_ciphertext_fails() -> Result<()> {
        let key = derive_room_key("hunter2", "general")?;
        let encrypted = encrypt_text("secret", &key)?;

        let mut raw = BASE64.decode(&encrypted).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0xFF;
        let tampered = BASE64.encode(raw);

        assert!(decrypt_text(&tampered, &key).is_err());
        Ok(())
    }

    #[test]
    fn garbage_input_fails_cleanly() -> Result<()> {
        let key = derive_room_key("hunter2", "general")?;
        assert!(decrypt_text("not base64 at all!!!", &key).is_err());
        assert!(decrypt_text("aGVsbG8=", &key).is_err()); // too short
        Ok(())
    }

    #[test]
    fn empty_plaintext_roundtrip() -> Result<()> {
        let key = derive_room_key("hunter2", "general")?;
        let encrypted = encrypt_text("", &key)?;
        assert_eq!(decrypt_text(&encrypted, &key)?, "");
        Ok(())
    }
}
