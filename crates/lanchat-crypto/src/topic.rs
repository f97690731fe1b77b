//! Pubsub topic name derivation.
//!
//! Plaintext rooms live on `chat/rooms/<room>`; encrypted rooms append
//! the first 8 bytes of SHA-256(password) as 16 lowercase hex chars:
//! `chat/rooms/<room>/<hex16>`. Peers holding the wrong password join
//! a different topic and receive nothing, so the encryption key is
//! defense-in-depth on top of topic partitioning.

use sha2::{Digest, Sha256};

/// Prefix shared by all room topics.
pub const TOPIC_PREFIX: &str = "chat/rooms";

/// Number of password-hash bytes encoded into the topic suffix.
const SUFFIX_BYTES: usize = 8;

/// Derives the pubsub topic name for a room.
pub fn room_topic(room: &str, password: &str) -> String {
    if password.is_empty() {
        return format!("{TOPIC_PREFIX}/{room}");
    }

    let digest = Sha256::digest(password.as_bytes());
    format!(
        "{TOPIC_PREFIX}/{room}/{}",
        hex::encode(&digest[..SUFFIX_BYTES])
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plaintext_room_has_no_suffix() {
        assert_eq!(room_topic("general", ""), "chat/rooms/general");
    }

    #[test]
    fn password_adds_hex16_suffix() {
        let topic = room_topic("general", "hunter2");
        let suffix = topic.rsplit('/').next().unwrap();
        assert!(topic.starts_with("chat/rooms/general/"));
        assert_eq!(suffix.len(), 16);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!suffix.chars().any(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn password_partitions_topics() {
        let open = room_topic("secret", "");
        let a = room_topic("secret", "pw");
        let b = room_topic("secret", "other");
        assert_ne!(open, a);
        assert_ne!(a, b);
    }

    #[test]
    fn same_password_same_topic() {
        assert_eq!(room_topic("secret", "pw"), room_topic("secret", "pw"));
    }
}
