//! Active room state.
//!
//! At most one room is active per node. The room owns its append-only
//! message log and the set of member peer ids; peer details live in
//! the registry and are looked up on render, never duplicated here.
//!
//! Invariant: `key` is `Some` iff `password` is non-empty.

use std::collections::HashSet;

use lanchat_crypto::RoomKey;
use lanchat_p2p::PeerId;
use lanchat_types::{ChatMessage, RoomInfo};

/// State of the room this node is currently in.
pub struct Room {
    /// Sanitized room name.
    pub name: String,
    /// Full pubsub topic name the room is bound to.
    pub topic_name: String,
    /// Password as entered; retained only to mark the room encrypted
    /// in listings.
    pub password: String,
    /// Symmetric key derived from the password; `None` for plaintext
    /// rooms.
    pub key: Option<RoomKey>,
    /// Peers seen in this room, by id. Snapshots live in the registry.
    pub members: HashSet<PeerId>,
    /// Append-only log, ordered by arrival.
    pub messages: Vec<ChatMessage>,
}

impl Room {
    /// Creates a fresh room with an empty log.
    pub fn new(name: String, topic_name: String, password: String, key: Option<RoomKey>) -> Self {
        Self {
            name,
            topic_name,
            password,
            key,
            members: HashSet::new(),
            messages: Vec::new(),
        }
    }

    /// Whether messages in this room are encrypted.
    pub fn encrypted(&self) -> bool {
        !self.password.is_empty()
    }

    /// Public description for events and listings.
    pub fn info(&self) -> RoomInfo {
        RoomInfo {
            name: self.name.clone(),
            topic: self.topic_name.clone(),
            encrypted: self.encrypted(),
        }
    }

    /// Appends one message to the log.
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lanchat_crypto::derive_room_key;
    use lanchat_types::MessageKind;

    fn message(content: &str) -> ChatMessage {
        ChatMessage {
            id: "1".into(),
            from: "peer".into(),
            identity: "@x-y-1".into(),
            nickname: "alice".into(),
            content: content.into(),
            timestamp: Utc::now(),
            kind: MessageKind::Text,
        }
    }

    #[test]
    fn plaintext_room_is_not_encrypted() {
        let room = Room::new("general".into(), "chat/rooms/general".into(), String::new(), None);
        assert!(!room.encrypted());
        assert!(!room.info().encrypted);
    }

    #[test]
    fn password_marks_room_encrypted() {
        let key = derive_room_key("pw", "secret").unwrap();
        let room = Room::new(
            "secret".into(),
            "chat/rooms/secret/abcd".into(),
            "pw".into(),
            Some(key),
        );
        assert!(room.encrypted());
        assert!(room.info().encrypted);
    }

    #[test]
    fn log_preserves_arrival_order() {
        let mut room =
            Room::new("general".into(), "chat/rooms/general".into(), String::new(), None);
        room.append(message("first"));
        room.append(message("second"));
        assert_eq!(room.messages.len(), 2);
        assert_eq!(room.messages[0].content, "first");
        assert_eq!(room.messages[1].content, "second");
    }
}
