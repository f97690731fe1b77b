//! Core shared types for the lanchat decentralized LAN chat system.
//!
//! This crate defines the types used across the workspace: the local
//! user, remote peer snapshots, chat messages, consumer-facing events,
//! the metadata record exchanged between peers, and the central error
//! enum. No other crate should define shared types.
//!
//! Peer identifiers appear here in their stable string form only; the
//! binary transport identifier type stays inside the networking crates
//! so this crate carries no libp2p dependency.

pub mod config;

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// The local identity. Created at startup, mutated only by its owner.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    /// Sanitized display name, at most 30 characters.
    pub nickname: String,
    /// Free-form status string, e.g. `"online"`.
    pub status: String,
}

// ---------------------------------------------------------------------------
// PeerInfo
// ---------------------------------------------------------------------------

/// Snapshot of a remote peer as of its last successful metadata fetch.
///
/// The `id` is the transport peer identifier rendered as a string and
/// never changes; every other field may be refreshed on each metadata
/// exchange. Nickname is a label, never an identity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PeerInfo {
    /// Stable peer identifier in string form.
    pub id: String,
    /// Friendly display identity derived from the peer id,
    /// e.g. `@brave-otter-42`.
    pub identity: String,
    /// Sanitized nickname (falls back to `"Unknown"`).
    pub nickname: String,
    /// Status string, capped at 50 characters on ingest.
    pub status: String,
    /// When the last metadata fetch for this peer succeeded.
    pub last_seen: DateTime<Utc>,
    /// Room name the peer reported being in (empty if none).
    pub current_room: String,
    /// Custom key/value metadata from the peer's record.
    pub custom: HashMap<String, String>,
}

impl PeerInfo {
    /// Whether the peer reported its current room as encrypted.
    pub fn room_encrypted(&self) -> bool {
        self.custom
            .get(MetadataRecord::KEY_ROOM_ENCRYPTED)
            .map(|v| v == "true")
            .unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// MessageKind
// ---------------------------------------------------------------------------

/// Classifies a chat message within a room.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// User-authored text.
    Text,
    /// Rendered join notice.
    Join,
    /// Rendered leave notice.
    Leave,
}

impl Default for MessageKind {
    fn default() -> Self {
        Self::Text
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Join => write!(f, "join"),
            Self::Leave => write!(f, "leave"),
        }
    }
}

// ---------------------------------------------------------------------------
// ChatMessage
// ---------------------------------------------------------------------------

/// One entry in a room's message log.
///
/// `content` has always been sanitized and is at most 100 characters.
/// For `Join`/`Leave` the content is the rendered notice text.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Locally-assigned unique identifier (arrival timestamp nanos).
    pub id: String,
    /// Originating peer identifier in string form.
    pub from: String,
    /// Friendly display identity of the originator.
    pub identity: String,
    /// Nickname snapshot at time of receipt.
    pub nickname: String,
    /// Sanitized message content.
    pub content: String,
    /// Sender-reported timestamp from the envelope.
    pub timestamp: DateTime<Utc>,
    /// How `content` is to be interpreted.
    pub kind: MessageKind,
}

// ---------------------------------------------------------------------------
// RoomInfo
// ---------------------------------------------------------------------------

/// Public description of a joined room, carried on [`Event::RoomJoined`].
///
/// Key material and the message log stay inside the room controller;
/// consumers only need the name and whether encryption is active.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoomInfo {
    /// Sanitized room name.
    pub name: String,
    /// Full pubsub topic the room is bound to.
    pub topic: String,
    /// Whether a password (and therefore an encryption key) is set.
    pub encrypted: bool,
}

// ---------------------------------------------------------------------------
// MetadataRecord
// ---------------------------------------------------------------------------

/// Record exchanged over the `/chat/metadata/1.0.0` sub-protocol.
///
/// All fields are optional on the wire; readers ignore unknown fields
/// and tolerate missing ones.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Display name of the peer.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nickname: String,
    /// Software version string.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    /// Name of the room the peer is currently in (empty if none).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub current_room: String,
    /// Free-form key/value pairs. Recognized keys are the
    /// `KEY_*` constants on this type.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub custom: HashMap<String, String>,
}

impl MetadataRecord {
    /// Custom key carrying the peer's status string.
    pub const KEY_STATUS: &'static str = "status";

    /// Custom key set to `"true"` when the current room is encrypted.
    pub const KEY_ROOM_ENCRYPTED: &'static str = "room_encrypted";

    /// Whether the record marks its current room as encrypted.
    pub fn room_encrypted(&self) -> bool {
        self.custom
            .get(Self::KEY_ROOM_ENCRYPTED)
            .map(|v| v == "true")
            .unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// Items pushed to consumers through the event bus.
///
/// Events are passed by value; the bus owns nothing long-lived.
#[derive(Clone, Debug)]
pub enum Event {
    /// A peer completed discovery and metadata exchange.
    PeerJoined(PeerInfo),
    /// A peer lost its last connection or went stale.
    PeerLeft(PeerInfo),
    /// A message was appended to the current room's log. Includes
    /// the local mirror of our own outbound messages.
    MessageReceived(ChatMessage),
    /// The local node joined a room.
    RoomJoined(RoomInfo),
    /// A peer's status string changed.
    StatusChange(String),
    /// Free-form notice for consumers to surface.
    SystemMessage(String),
}

// ---------------------------------------------------------------------------
// LanchatError
// ---------------------------------------------------------------------------

/// Central error type for the lanchat system.
///
/// All crates in the workspace convert their internal errors into
/// variants of this enum.
#[derive(Debug, Error)]
pub enum LanchatError {
    /// Caller-supplied input was empty or oversized after sanitization.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// An operation that requires an active room was attempted outside one.
    #[error("not in a room")]
    NotInRoom,

    /// A transport-level operation failed (dial, stream, publish).
    #[error("transport error: {reason}")]
    TransportError {
        /// Description of the transport failure.
        reason: String,
    },

    /// A wire frame or payload could not be parsed.
    #[error("parse error: {reason}")]
    ParseError {
        /// Description of the parse failure.
        reason: String,
    },

    /// A cryptographic operation failed (derivation, encrypt, decrypt).
    #[error("crypto error: {reason}")]
    CryptoError {
        /// Description of the cryptographic failure.
        reason: String,
    },

    /// A sender exceeded the per-peer admission window.
    #[error("rate limited: {reason}")]
    RateLimited {
        /// Which peer and which limit.
        reason: String,
    },

    /// A configuration value is invalid.
    #[error("config error: {reason}")]
    ConfigError {
        /// Description of the configuration problem.
        reason: String,
    },
}

/// Convenience result type using [`LanchatError`].
pub type Result<T> = std::result::Result<T, LanchatError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_kind_serde_lowercase() {
        let json = serde_json::to_string(&MessageKind::Join).unwrap();
        assert_eq!(json, "\"join\"");
        let parsed: MessageKind = serde_json::from_str("\"leave\"").unwrap();
        assert_eq!(parsed, MessageKind::Leave);
    }

    #[test]
    fn message_kind_defaults_to_text() {
        assert_eq!(MessageKind::default(), MessageKind::Text);
    }

    #[test]
    fn metadata_record_tolerates_unknown_fields() {
        let json = r#"{"nickname":"alice","flux_capacitor":42}"#;
        let record: MetadataRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.nickname, "alice");
        assert!(record.current_room.is_empty());
    }

    #[test]
    fn metadata_record_empty_object_parses() {
        let record: MetadataRecord = serde_json::from_str("{}").unwrap();
        assert!(record.nickname.is_empty());
        assert!(record.custom.is_empty());
    }

    #[test]
    fn metadata_record_room_encrypted_flag() {
        let mut record = MetadataRecord::default();
        assert!(!record.room_encrypted());

        record.custom.insert(
            MetadataRecord::KEY_ROOM_ENCRYPTED.to_string(),
            "true".to_string(),
        );
        assert!(record.room_encrypted());
    }

    #[test]
    fn metadata_record_omits_empty_fields() {
        let record = MetadataRecord {
            nickname: "bob".into(),
            ..MetadataRecord::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("nickname"));
        assert!(!json.contains("current_room"));
        assert!(!json.contains("custom"));
    }

    #[test]
    fn peer_info_room_encrypted() {
        let mut custom = HashMap::new();
        custom.insert(
            MetadataRecord::KEY_ROOM_ENCRYPTED.to_string(),
            "true".to_string(),
        );
        let peer = PeerInfo {
            id: "12D3KooW".into(),
            identity: "@brave-otter-42".into(),
            nickname: "carol".into(),
            status: String::new(),
            last_seen: Utc::now(),
            current_room: "secret".into(),
            custom,
        };
        assert!(peer.room_encrypted());
    }

    #[test]
    fn error_display_includes_reason() {
        let err = LanchatError::TransportError {
            reason: "dial refused".into(),
        };
        assert!(err.to_string().contains("dial refused"));
        assert_eq!(LanchatError::NotInRoom.to_string(), "not in a room");
    }
}
