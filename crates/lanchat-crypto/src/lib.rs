//! Cryptography for lanchat room encryption.
//!
//! - [`kdf`] — password → 256-bit room key (Argon2id, salted by room name)
//! - [`cipher`] — XChaCha20-Poly1305 text encryption, base64 wire form
//! - [`topic`] — room/password → pubsub topic name derivation
//!
//! Peers derive the same key independently from `(password, room)`;
//! nothing about the derivation is wire-visible because every message
//! carries its own random AEAD nonce.

pub mod cipher;
pub mod kdf;
pub mod topic;

pub use cipher::{decrypt_text, encrypt_text};
pub use kdf::{derive_room_key, RoomKey};
pub use topic::room_topic;
