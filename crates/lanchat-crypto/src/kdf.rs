//! Argon2id key derivation for room encryption.
//!
//! Derives a 256-bit symmetric key from the room password, salted by
//! a hash of the room name so the same password produces different
//! keys in different rooms. The derivation is deterministic: every
//! peer holding `(password, room)` arrives at the same key without
//! any exchange.

use argon2::{Algorithm, Argon2, Params, Version};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use lanchat_types::{LanchatError, Result};

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Argon2id memory cost in KiB (19 MiB, interactive profile).
///
/// Room joins derive the key once; the interactive profile keeps the
/// join latency low while staying password-hash strength.
const KDF_M_COST: u32 = 19_456;

/// Argon2id iteration count.
const KDF_T_COST: u32 = 2;

/// Argon2id parallelism degree.
const KDF_P_COST: u32 = 1;

/// Domain-separation prefix for the salt hash.
const SALT_DOMAIN: &str = "lanchat/room-key/";

// ---------------------------------------------------------------------------
// RoomKey
// ---------------------------------------------------------------------------

/// 256-bit symmetric room key.
///
/// Zeroized when dropped. Does not implement `Clone` or `Debug` so
/// key material cannot leak through copies or logs.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct RoomKey([u8; 32]);

impl RoomKey {
    /// Fixed byte length of a room key.
    pub const LEN: usize = 32;

    /// Returns the raw key material.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Derives the symmetric key for an encrypted room.
///
/// The salt is `SHA-256(SALT_DOMAIN || room)`, which gives a full-size
/// salt even for one-character room names and keeps keys for the same
/// password apart across rooms.
///
/// # Errors
///
/// Returns [`LanchatError::CryptoError`] if the Argon2 computation
/// fails (should not happen with the fixed parameters).
pub fn derive_room_key(password: &str, room: &str) -> Result<RoomKey> {
    let mut hasher = Sha256::new();
    hasher.update(SALT_DOMAIN.as_bytes());
    hasher.update(room.as_bytes());
    let salt = hasher.finalize();

    let params = Params::new(KDF_M_COST, KDF_T_COST, KDF_P_COST, Some(RoomKey::LEN))
        .map_err(|e| LanchatError::CryptoError {
            reason: format!("invalid Argon2 parameters: {e}"),
        })?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut output = [0u8; 32];
    argon2
        .hash_password_into(password.as_bytes(), &salt, &mut output)
        .map_err(|e| LanchatError::CryptoError {
            reason: format!("Argon2id derivation failed: {e}"),
        })?;

    Ok(RoomKey(output))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() -> Result<()> {
        let a = derive_room_key("hunter2", "general")?;
        let b = derive_room_key("hunter2", "general")?;
        assert_eq!(a.as_bytes(), b.as_bytes());
        Ok(())
    }

    #[test]
    fn different_password_different_key() -> Result<()> {
        let a = derive_room_key("hunter2", "general")?;
        let b = derive_room_key("hunter3", "general")?;
        assert_ne!(a.as_bytes(), b.as_bytes());
        Ok(())
    }

    #[test]
    fn different_room_different_key() -> Result<()> {
        let a = derive_room_key("hunter2", "general")?;
        let b = derive_room_key("hunter2", "lounge")?;
        assert_ne!(a.as_bytes(), b.as_bytes());
        Ok(())
    }

    #[test]
    fn short_room_name_works() -> Result<()> {
        // The salt hash makes even one-character rooms usable.
        let key = derive_room_key("pw", "a")?;
        assert_ne!(key.as_bytes(), &[0u8; 32]);
        Ok(())
    }

    #[test]
    fn empty_password_is_allowed() -> Result<()> {
        // Callers only derive for non-empty passwords; the KDF itself
        // does not care.
        let key = derive_room_key("", "general")?;
        assert_eq!(key.as_bytes().len(), 32);
        Ok(())
    }
}
