//! lanchat libp2p network layer.
//!
//! Wraps a libp2p swarm into a [`host::Host`] handle with a
//! channel-based API: topic join/publish/read, peer metadata exchange,
//! and local-network discovery. The swarm itself runs in a dedicated
//! tokio task; everything else talks to it through commands.
//!
//! # Architecture
//!
//! - [`config`] — network configuration with defaults
//! - [`behaviour`] — combined `NetworkBehaviour` (gossipsub, mDNS,
//!   identify, metadata request-response)
//! - [`envelope`] — the JSON wire envelope framing every pubsub payload
//! - [`metadata`] — the `/chat/metadata/1.0.0` request/response types
//! - [`handler`] — per-envelope-kind handler registry
//! - [`host`] — the `Host` handle and the swarm task
//! - [`pubsub`] — the `Topic` handle for a joined topic

pub mod behaviour;
pub mod config;
pub mod envelope;
pub mod handler;
pub mod host;
pub mod metadata;
pub mod pubsub;

pub use config::P2pConfig;
pub use envelope::{ChatPayload, Envelope, EnvelopeKind};
pub use handler::EnvelopeHandler;
pub use host::{Host, HostEvent};
pub use pubsub::Topic;

pub use libp2p::PeerId;
