//! The `/chat/metadata/1.0.0` peer metadata sub-protocol.
//!
//! One stream per exchange: the client sends a single JSON request
//! object, the server replies with a single JSON
//! [`lanchat_types::MetadataRecord`], both sides close. This maps
//! exactly onto libp2p `request_response` with the JSON codec; the
//! behaviour itself is assembled in [`crate::behaviour`].
//!
//! The request body is effectively a keep-alive: servers answer
//! regardless of its `type` and silently tolerate unknown values.

use libp2p::StreamProtocol;
use serde::{Deserialize, Serialize};

/// Protocol identifier for the metadata exchange.
pub const METADATA_PROTOCOL: StreamProtocol = StreamProtocol::new("/chat/metadata/1.0.0");

/// Request half of the metadata exchange.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetadataRequest {
    /// Request type; only `"get"` is defined today.
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl MetadataRequest {
    /// The standard `get` request.
    pub fn get() -> Self {
        Self {
            kind: "get".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanchat_types::MetadataRecord;

    #[test]
    fn request_wire_shape() {
        let json = serde_json::to_string(&MetadataRequest::get()).unwrap();
        assert_eq!(json, r#"{"type":"get"}"#);
    }

    #[test]
    fn unknown_request_type_parses() {
        let req: MetadataRequest = serde_json::from_str(r#"{"type":"refresh"}"#).unwrap();
        assert_eq!(req.kind, "refresh");
    }

    #[test]
    fn missing_request_type_parses() {
        let req: MetadataRequest = serde_json::from_str("{}").unwrap();
        assert!(req.kind.is_empty());
    }

    #[test]
    fn record_roundtrip() {
        let record = MetadataRecord {
            nickname: "alice".into(),
            version: "1.0.0".into(),
            current_room: "general".into(),
            custom: Default::default(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: MetadataRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.nickname, "alice");
        assert_eq!(parsed.current_room, "general");
    }
}
