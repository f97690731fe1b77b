//! Combined libp2p behaviour for the lanchat host.
//!
//! Composes:
//! - `gossipsub::Behaviour` — room topics (signed messages).
//! - `mdns::tokio::Behaviour` — local-network peer discovery.
//! - `identify::Behaviour` — peer info exchange; its protocol version
//!   string carries the rendezvous tag, so peers on a different tag
//!   are recognized and disconnected before they surface.
//! - `request_response::json::Behaviour` — the metadata sub-protocol.
//!
//! The `#[derive(NetworkBehaviour)]` macro auto-generates
//! `LanchatBehaviourEvent` with one variant per field.

use std::time::Duration;

use libp2p::request_response::{self, ProtocolSupport};
use libp2p::swarm::NetworkBehaviour;
use libp2p::{gossipsub, identify, identity, mdns, PeerId};

use lanchat_types::{LanchatError, MetadataRecord};

use crate::config::P2pConfig;
use crate::metadata::{MetadataRequest, METADATA_PROTOCOL};

/// Local alias so we never shadow `std::result::Result`, which the
/// `#[derive(NetworkBehaviour)]` macro needs.
type PResult<T> = std::result::Result<T, LanchatError>;

/// Maximum accepted pubsub frame size (64 KiB).
pub const MAX_FRAME_SIZE: usize = 65_536;

// ---------------------------------------------------------------------------
// Combined behaviour
// ---------------------------------------------------------------------------

/// Combined network behaviour for a lanchat host.
#[derive(NetworkBehaviour)]
pub struct LanchatBehaviour {
    /// Pub/sub for room topics.
    pub gossipsub: gossipsub::Behaviour,
    /// Local-network discovery.
    pub mdns: mdns::tokio::Behaviour,
    /// Peer info exchange; doubles as the rendezvous gate.
    pub identify: identify::Behaviour,
    /// Metadata request/response over `/chat/metadata/1.0.0`.
    pub metadata: request_response::json::Behaviour<MetadataRequest, MetadataRecord>,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Identify protocol version string for a rendezvous tag.
///
/// Peers whose identify handshake reports a different string are on a
/// different rendezvous and get disconnected.
pub fn rendezvous_protocol(tag: &str) -> String {
    format!("/lanchat/{tag}/1.0.0")
}

/// Builds the combined [`LanchatBehaviour`] for the given identity.
pub fn build_behaviour(
    keypair: &identity::Keypair,
    config: &P2pConfig,
) -> PResult<LanchatBehaviour> {
    let local_peer_id = PeerId::from(keypair.public());

    let gossipsub = build_gossipsub(keypair)?;
    let mdns = build_mdns(local_peer_id)?;

    let identify = identify::Behaviour::new(
        identify::Config::new(rendezvous_protocol(&config.rendezvous), keypair.public())
            .with_agent_version(format!("lanchat/{}", env!("CARGO_PKG_VERSION"))),
    );

    let metadata = request_response::json::Behaviour::new(
        [(METADATA_PROTOCOL, ProtocolSupport::Full)],
        request_response::Config::default()
            .with_request_timeout(Duration::from_secs(config.metadata_timeout_secs)),
    );

    Ok(LanchatBehaviour {
        gossipsub,
        mdns,
        identify,
        metadata,
    })
}

fn build_gossipsub(keypair: &identity::Keypair) -> PResult<gossipsub::Behaviour> {
    let config = gossipsub::ConfigBuilder::default()
        .max_transmit_size(MAX_FRAME_SIZE)
        .build()
        .map_err(|e| LanchatError::ConfigError {
            reason: format!("failed to build gossipsub config: {e}"),
        })?;

    gossipsub::Behaviour::new(
        gossipsub::MessageAuthenticity::Signed(keypair.clone()),
        config,
    )
    .map_err(|e| LanchatError::TransportError {
        reason: format!("failed to create gossipsub behaviour: {e}"),
    })
}

fn build_mdns(local_peer_id: PeerId) -> PResult<mdns::tokio::Behaviour> {
    mdns::tokio::Behaviour::new(mdns::Config::default(), local_peer_id).map_err(|e| {
        LanchatError::TransportError {
            reason: format!("failed to start mDNS: {e}"),
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn build_behaviour_succeeds() {
        let keypair = identity::Keypair::generate_ed25519();
        let config = P2pConfig::default();
        assert!(build_behaviour(&keypair, &config).is_ok());
    }

    #[test]
    fn rendezvous_protocol_embeds_tag() {
        assert_eq!(rendezvous_protocol("test"), "/lanchat/test/1.0.0");
        assert_ne!(rendezvous_protocol("a"), rendezvous_protocol("b"));
    }
}
