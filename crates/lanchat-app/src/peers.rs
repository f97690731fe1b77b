//! Registry of discovered peers.
//!
//! Owns the authoritative [`PeerInfo`] values. The discovery path
//! inserts after a successful metadata fetch; the host's disconnect
//! and staleness signals remove. Records are normalized on ingest:
//! nickname sanitized and bounded (falling back to `"Unknown"`),
//! status capped. The authoritative nickname is always the one from
//! the most recent successful fetch.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use lanchat_p2p::PeerId;
use lanchat_types::{MetadataRecord, PeerInfo};

use crate::identity::display_identity;
use crate::sanitize::{sanitize_bounded, truncate, MAX_NICKNAME_LEN, MAX_STATUS_LEN};

/// Nickname used when a peer reports nothing usable.
pub const UNKNOWN_NICKNAME: &str = "Unknown";

/// Read/write-guarded map of peer id → last-known peer snapshot.
#[derive(Default)]
pub struct PeerRegistry {
    inner: RwLock<HashMap<PeerId, PeerInfo>>,
}

impl PeerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or refreshes a peer from a fetched metadata record.
    ///
    /// Returns the normalized snapshot that was stored.
    pub fn upsert_from_record(&self, peer_id: &PeerId, record: MetadataRecord) -> PeerInfo {
        let mut nickname = sanitize_bounded(&record.nickname, MAX_NICKNAME_LEN);
        if nickname.is_empty() {
            nickname = UNKNOWN_NICKNAME.to_string();
        }

        let status = record
            .custom
            .get(MetadataRecord::KEY_STATUS)
            .cloned()
            .map(|s| truncate(s, MAX_STATUS_LEN))
            .unwrap_or_default();

        let id = peer_id.to_string();
        let info = PeerInfo {
            identity: display_identity(&id),
            id,
            nickname,
            status,
            last_seen: Utc::now(),
            current_room: record.current_room,
            custom: record.custom,
        };

        if let Ok(mut map) = self.inner.write() {
            map.insert(*peer_id, info.clone());
        }
        info
    }

    /// Returns the last-known snapshot for a peer.
    pub fn get(&self, peer_id: &PeerId) -> Option<PeerInfo> {
        self.inner
            .read()
            .ok()
            .and_then(|map| map.get(peer_id).cloned())
    }

    /// Removes a peer, returning its last snapshot.
    pub fn remove(&self, peer_id: &PeerId) -> Option<PeerInfo> {
        self.inner.write().ok().and_then(|mut map| map.remove(peer_id))
    }

    /// Whether the registry knows this peer.
    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.inner
            .read()
            .map(|map| map.contains_key(peer_id))
            .unwrap_or(false)
    }

    /// Snapshot of all known peers.
    pub fn snapshot(&self) -> Vec<PeerInfo> {
        self.inner
            .read()
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of known peers.
    pub fn len(&self) -> usize {
        self.inner.read().map(|map| map.len()).unwrap_or(0)
    }

    /// Whether no peers are known.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap as StdHashMap;

    fn record(nickname: &str, status: &str) -> MetadataRecord {
        let mut custom = StdHashMap::new();
        if !status.is_empty() {
            custom.insert(MetadataRecord::KEY_STATUS.to_string(), status.to_string());
        }
        MetadataRecord {
            nickname: nickname.to_string(),
            version: "1.0.0".to_string(),
            current_room: String::new(),
            custom,
        }
    }

    #[test]
    fn upsert_normalizes_nickname() {
        let registry = PeerRegistry::new();
        let peer = PeerId::random();

        let info = registry.upsert_from_record(&peer, record("al\x00ice", "online"));
        assert_eq!(info.nickname, "alice");
        assert_eq!(info.status, "online");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn empty_nickname_becomes_unknown() {
        let registry = PeerRegistry::new();
        let peer = PeerId::random();

        let info = registry.upsert_from_record(&peer, record("\u{200b}\u{200b}", ""));
        assert_eq!(info.nickname, UNKNOWN_NICKNAME);
    }

    #[test]
    fn oversized_fields_are_capped() {
        let registry = PeerRegistry::new();
        let peer = PeerId::random();

        let info =
            registry.upsert_from_record(&peer, record(&"n".repeat(80), &"s".repeat(80)));
        assert_eq!(info.nickname.len(), MAX_NICKNAME_LEN);
        assert_eq!(info.status.len(), MAX_STATUS_LEN);
    }

    #[test]
    fn refresh_replaces_previous_snapshot() {
        let registry = PeerRegistry::new();
        let peer = PeerId::random();

        registry.upsert_from_record(&peer, record("alice", ""));
        registry.upsert_from_record(&peer, record("alicia", ""));

        let info = registry.get(&peer).unwrap();
        assert_eq!(info.nickname, "alicia");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_returns_last_snapshot() {
        let registry = PeerRegistry::new();
        let peer = PeerId::random();

        registry.upsert_from_record(&peer, record("bob", ""));
        let removed = registry.remove(&peer).unwrap();
        assert_eq!(removed.nickname, "bob");
        assert!(registry.is_empty());
        assert!(registry.remove(&peer).is_none());
    }
}
