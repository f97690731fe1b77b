//! The JSON wire envelope framing every pubsub payload.
//!
//! ```text
//! { "type": "chat" | "metadata" | "status",
//!   "from": "<stable peer id string>",
//!   "timestamp": "<RFC 3339>",
//!   "data": <opaque JSON> }
//! ```
//!
//! The `data` field stays opaque at this layer; the chat payload
//! shape lives in [`ChatPayload`] and is decoded by the room
//! controller's handler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lanchat_types::{LanchatError, MessageKind, Result};

// ---------------------------------------------------------------------------
// EnvelopeKind
// ---------------------------------------------------------------------------

/// Top-level envelope type, used to pick the registered handler.
///
/// Unrecognized values parse as [`EnvelopeKind::Unknown`] so a newer
/// peer cannot break the subscription loop; there is simply no
/// handler for them.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeKind {
    /// Room chat traffic.
    Chat,
    /// Metadata announcements.
    Metadata,
    /// Status announcements.
    Status,
    /// Anything this version does not recognize.
    Unknown,
}

// Hand-written so unknown tags map to `Unknown` instead of failing
// the whole envelope (serde's `other` attribute does not cover
// externally tagged enums).
impl<'de> Deserialize<'de> for EnvelopeKind {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(match tag.as_str() {
            "chat" => Self::Chat,
            "metadata" => Self::Metadata,
            "status" => Self::Status,
            _ => Self::Unknown,
        })
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// One framed pubsub message.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope {
    /// Envelope type tag.
    #[serde(rename = "type")]
    pub kind: EnvelopeKind,
    /// Publisher's peer id in string form.
    pub from: String,
    /// Publisher-reported send time.
    pub timestamp: DateTime<Utc>,
    /// Opaque payload.
    pub data: serde_json::Value,
}

impl Envelope {
    /// Builds an envelope stamped with the current time.
    pub fn new(kind: EnvelopeKind, from: String, data: serde_json::Value) -> Self {
        Self {
            kind,
            from,
            timestamp: Utc::now(),
            data,
        }
    }

    /// Serializes the envelope for publishing.
    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| LanchatError::ParseError {
            reason: format!("failed to encode envelope: {e}"),
        })
    }

    /// Parses an envelope from raw frame bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| LanchatError::ParseError {
            reason: format!("failed to decode envelope: {e}"),
        })
    }
}

// ---------------------------------------------------------------------------
// ChatPayload
// ---------------------------------------------------------------------------

/// Payload carried by `"chat"` envelopes.
///
/// A missing `type` defaults to text, matching peers that omit the
/// tag on plain messages. In encrypted rooms `text` holds the base64
/// ciphertext rather than cleartext.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatPayload {
    /// Chat message kind; defaults to [`MessageKind::Text`].
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
    /// Cleartext or base64 ciphertext; absent for join/leave.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Sender's self-reported nickname, used as a fallback when the
    /// peer registry has no entry yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

impl ChatPayload {
    /// Payload announcing a room join.
    pub fn join(nickname: &str) -> Self {
        Self {
            kind: MessageKind::Join,
            text: None,
            nickname: Some(nickname.to_string()),
        }
    }

    /// Payload announcing a room leave.
    pub fn leave(nickname: &str) -> Self {
        Self {
            kind: MessageKind::Leave,
            text: None,
            nickname: Some(nickname.to_string()),
        }
    }

    /// Payload carrying message text (clear or encrypted).
    pub fn text(text: String, nickname: &str) -> Self {
        Self {
            kind: MessageKind::Text,
            text: Some(text),
            nickname: Some(nickname.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_roundtrip() {
        let envelope = Envelope::new(
            EnvelopeKind::Chat,
            "12D3KooWExample".into(),
            serde_json::json!({"type": "text", "text": "hi"}),
        );
        let bytes = envelope.encode().unwrap();
        let decoded = Envelope::decode(&bytes).unwrap();
        assert_eq!(decoded.kind, EnvelopeKind::Chat);
        assert_eq!(decoded.from, "12D3KooWExample");
        assert_eq!(decoded.data["text"], "hi");
    }

    #[test]
    fn envelope_uses_type_key_on_wire() {
        let envelope = Envelope::new(EnvelopeKind::Status, "p".into(), serde_json::Value::Null);
        let json: serde_json::Value =
            serde_json::from_slice(&envelope.encode().unwrap()).unwrap();
        assert_eq!(json["type"], "status");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn unknown_envelope_kind_tolerated() {
        let bytes = br#"{"type":"presence","from":"p","timestamp":"2024-05-01T10:00:00Z","data":null}"#;
        let decoded = Envelope::decode(bytes).unwrap();
        assert_eq!(decoded.kind, EnvelopeKind::Unknown);
    }

    #[test]
    fn garbage_frame_is_parse_error() {
        assert!(Envelope::decode(b"\x00\x01not json").is_err());
    }

    #[test]
    fn chat_payload_missing_type_defaults_to_text() {
        let payload: ChatPayload =
            serde_json::from_str(r#"{"text":"hello","nickname":"alice"}"#).unwrap();
        assert_eq!(payload.kind, MessageKind::Text);
        assert_eq!(payload.text.as_deref(), Some("hello"));
    }

    #[test]
    fn join_payload_omits_text() {
        let json = serde_json::to_string(&ChatPayload::join("alice")).unwrap();
        assert!(json.contains(r#""type":"join""#));
        assert!(!json.contains("text"));
    }
}
