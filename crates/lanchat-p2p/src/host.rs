//! The lanchat host: a libp2p swarm behind a channel-based handle.
//!
//! [`Host::spawn`] builds the swarm and moves it into a dedicated
//! tokio task. The returned [`Host`] handle is cheap to clone and
//! talks to the task through a command channel; discovery results
//! come back on the [`HostEvent`] channel handed to the caller.
//!
//! Discovery flow: mDNS finds a peer on the LAN → the task dials it →
//! the identify handshake proves the rendezvous tag matches →
//! `HostEvent::Discovered` is emitted. Peers on a different tag are
//! disconnected and never surface. A 30-second sweep removes peers
//! the transport no longer reports as connected, and a peer whose
//! last connection closes is reported as `Disconnected`.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use futures::StreamExt;
use libp2p::request_response::{self, OutboundRequestId};
use libp2p::swarm::dial_opts::DialOpts;
use libp2p::swarm::SwarmEvent;
use libp2p::{gossipsub, identify, mdns, noise, tcp, yamux, PeerId, Swarm};
use tokio::sync::{mpsc, oneshot, watch};

use lanchat_types::{LanchatError, MetadataRecord, Result};

use crate::behaviour::{self, LanchatBehaviour, LanchatBehaviourEvent};
use crate::config::P2pConfig;
use crate::envelope::{Envelope, EnvelopeKind};
use crate::handler::{EnvelopeHandler, HandlerRegistry};
use crate::metadata::MetadataRequest;
use crate::pubsub::Topic;

// ---------------------------------------------------------------------------
// Channel sizes
// ---------------------------------------------------------------------------

/// Command channel capacity; callers await backpressure beyond this.
const COMMAND_CHANNEL_SIZE: usize = 64;

/// Host event channel capacity.
const HOST_EVENT_CHANNEL_SIZE: usize = 64;

/// Per-topic envelope channel capacity.
const TOPIC_CHANNEL_SIZE: usize = 64;

// ---------------------------------------------------------------------------
// Events & commands
// ---------------------------------------------------------------------------

/// Discovery events delivered to the host's consumer.
#[derive(Clone, Debug)]
pub enum HostEvent {
    /// A peer on the same rendezvous tag is reachable. Also re-emitted
    /// on periodic mDNS re-announcements so consumers can refresh the
    /// peer's metadata.
    Discovered(PeerId),
    /// The last connection to a peer closed, or the sweep found it
    /// gone.
    Disconnected(PeerId),
}

/// Commands sent into the swarm task.
enum HostCommand {
    JoinTopic {
        name: String,
        reply: oneshot::Sender<Result<mpsc::Receiver<Envelope>>>,
    },
    LeaveTopic {
        name: String,
        reply: oneshot::Sender<Result<()>>,
    },
    Publish {
        topic: String,
        data: Vec<u8>,
        reply: oneshot::Sender<Result<()>>,
    },
    RequestMetadata {
        peer: PeerId,
        reply: oneshot::Sender<Result<MetadataRecord>>,
    },
}

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// State shared between the handle and the swarm task.
///
/// The metadata record is answered from the swarm task on inbound
/// requests and written by the room controller on join/leave; both
/// sides take the lock only for the copy.
pub(crate) struct HostShared {
    metadata: RwLock<MetadataRecord>,
    handlers: HandlerRegistry,
}

impl HostShared {
    fn metadata(&self) -> MetadataRecord {
        self.metadata
            .read()
            .map(|record| record.clone())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Host handle
// ---------------------------------------------------------------------------

/// Cloneable handle to a running lanchat host.
#[derive(Clone)]
pub struct Host {
    local_peer_id: PeerId,
    cmd_tx: mpsc::Sender<HostCommand>,
    shared: Arc<HostShared>,
    shutdown_tx: Arc<watch::Sender<bool>>,
}

impl Host {
    /// Builds the swarm, starts listening, and spawns the swarm task.
    ///
    /// Returns the handle plus the receiver for [`HostEvent`]s. Must
    /// be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`LanchatError::ConfigError`] for invalid configuration
    /// and [`LanchatError::TransportError`] if transport or behaviour
    /// construction fails or a listen address cannot be bound.
    pub fn spawn(config: P2pConfig) -> Result<(Self, mpsc::Receiver<HostEvent>)> {
        config.validate()?;

        let mut swarm = build_swarm(&config)?;
        let local_peer_id = *swarm.local_peer_id();

        for addr in &config.listen_addrs {
            swarm
                .listen_on(addr.clone())
                .map_err(|e| LanchatError::TransportError {
                    reason: format!("failed to listen on {addr}: {e}"),
                })?;
        }

        let shared = Arc::new(HostShared {
            metadata: RwLock::new(MetadataRecord::default()),
            handlers: HandlerRegistry::default(),
        });

        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let (event_tx, event_rx) = mpsc::channel(HOST_EVENT_CHANNEL_SIZE);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = SwarmTask {
            swarm,
            shared: Arc::clone(&shared),
            local_peer_id,
            rendezvous_protocol: behaviour::rendezvous_protocol(&config.rendezvous),
            cmd_rx,
            event_tx,
            shutdown_rx,
            subscriptions: HashMap::new(),
            pending_metadata: HashMap::new(),
            connected: HashSet::new(),
            announced: HashSet::new(),
            mismatched: HashSet::new(),
            sweep_interval_secs: config.sweep_interval_secs,
        };
        tokio::spawn(task.run());

        tracing::info!(peer_id = %local_peer_id, "host started");

        let host = Self {
            local_peer_id,
            cmd_tx,
            shared,
            shutdown_tx: Arc::new(shutdown_tx),
        };
        Ok((host, event_rx))
    }

    /// The local transport peer id.
    pub fn local_peer_id(&self) -> PeerId {
        self.local_peer_id
    }

    /// Snapshot of the local metadata record.
    pub fn metadata(&self) -> MetadataRecord {
        self.shared.metadata()
    }

    /// Replaces the local metadata record.
    pub fn set_metadata(&self, record: MetadataRecord) {
        if let Ok(mut guard) = self.shared.metadata.write() {
            *guard = record;
        }
    }

    /// Mutates the local metadata record in place.
    pub fn update_metadata(&self, mutate: impl FnOnce(&mut MetadataRecord)) {
        if let Ok(mut guard) = self.shared.metadata.write() {
            mutate(&mut guard);
        }
    }

    /// Registers (or replaces) the handler invoked for envelopes of
    /// the given kind.
    pub fn register_handler(&self, kind: EnvelopeKind, handler: Arc<dyn EnvelopeHandler>) {
        self.shared.handlers.register(kind, handler);
    }

    /// Joins a pubsub topic.
    ///
    /// Returns the [`Topic`] handle for publishing plus the receiver
    /// of parsed envelopes. The receiver ends when the topic is closed
    /// or the host shuts down; it is not restartable.
    pub async fn join_topic(&self, name: &str) -> Result<(Topic, mpsc::Receiver<Envelope>)> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send_command(HostCommand::JoinTopic {
            name: name.to_string(),
            reply: reply_tx,
        })
        .await?;
        let rx = await_reply(reply_rx).await??;
        Ok((Topic::new(name.to_string(), self.clone()), rx))
    }

    /// Fetches the metadata record of a connected peer.
    ///
    /// Bounded by the configured request timeout; a timeout surfaces
    /// as a [`LanchatError::TransportError`].
    pub async fn request_metadata(&self, peer: PeerId) -> Result<MetadataRecord> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send_command(HostCommand::RequestMetadata {
            peer,
            reply: reply_tx,
        })
        .await?;
        await_reply(reply_rx).await?
    }

    /// Signals the swarm task to shut down. Idempotent.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// A receiver that flips to `true` when the host shuts down.
    /// Background loops select on this to exit cleanly.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    pub(crate) async fn publish_raw(&self, topic: &str, data: Vec<u8>) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send_command(HostCommand::Publish {
            topic: topic.to_string(),
            data,
            reply: reply_tx,
        })
        .await?;
        await_reply(reply_rx).await?
    }

    pub(crate) async fn leave_topic(&self, name: &str) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send_command(HostCommand::LeaveTopic {
            name: name.to_string(),
            reply: reply_tx,
        })
        .await?;
        await_reply(reply_rx).await?
    }

    async fn send_command(&self, cmd: HostCommand) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| LanchatError::TransportError {
                reason: "host task is not running".into(),
            })
    }
}

/// Awaits a oneshot reply from the swarm task.
async fn await_reply<T>(rx: oneshot::Receiver<T>) -> Result<T> {
    rx.await.map_err(|_| LanchatError::TransportError {
        reason: "host task dropped the request".into(),
    })
}

// ---------------------------------------------------------------------------
// Swarm construction
// ---------------------------------------------------------------------------

fn build_swarm(config: &P2pConfig) -> Result<Swarm<LanchatBehaviour>> {
    let swarm = libp2p::SwarmBuilder::with_new_identity()
        .with_tokio()
        .with_tcp(
            tcp::Config::default().nodelay(true),
            noise::Config::new,
            yamux::Config::default,
        )
        .map_err(|e| LanchatError::TransportError {
            reason: format!("failed to configure TCP transport: {e}"),
        })?
        .with_quic()
        .with_behaviour(|key| {
            behaviour::build_behaviour(key, config)
                .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
        })
        .map_err(|e| LanchatError::TransportError {
            reason: format!("failed to build network behaviour: {e}"),
        })?
        .with_swarm_config(|cfg| {
            cfg.with_idle_connection_timeout(Duration::from_secs(config.idle_timeout_secs))
        })
        .build();

    Ok(swarm)
}

// ---------------------------------------------------------------------------
// Swarm task
// ---------------------------------------------------------------------------

/// Owns the swarm and all per-connection bookkeeping.
struct SwarmTask {
    swarm: Swarm<LanchatBehaviour>,
    shared: Arc<HostShared>,
    local_peer_id: PeerId,
    rendezvous_protocol: String,
    cmd_rx: mpsc::Receiver<HostCommand>,
    event_tx: mpsc::Sender<HostEvent>,
    shutdown_rx: watch::Receiver<bool>,
    /// Envelope senders of active subscriptions, by topic hash.
    subscriptions: HashMap<gossipsub::TopicHash, mpsc::Sender<Envelope>>,
    /// In-flight metadata requests awaiting a response or failure.
    pending_metadata: HashMap<OutboundRequestId, oneshot::Sender<Result<MetadataRecord>>>,
    /// Peers with at least one established connection.
    connected: HashSet<PeerId>,
    /// Peers surfaced to the consumer via `Discovered`.
    announced: HashSet<PeerId>,
    /// Peers seen with a different rendezvous tag; never redialed.
    mismatched: HashSet<PeerId>,
    sweep_interval_secs: u64,
}

impl SwarmTask {
    async fn run(mut self) {
        let mut sweep =
            tokio::time::interval(Duration::from_secs(self.sweep_interval_secs));
        // The first tick completes immediately; harmless for a sweep.
        loop {
            tokio::select! {
                event = self.swarm.select_next_some() => {
                    self.on_swarm_event(event).await;
                }
                cmd = self.cmd_rx.recv() => {
                    match cmd {
                        Some(cmd) => self.on_command(cmd).await,
                        None => break,
                    }
                }
                _ = sweep.tick() => {
                    self.sweep_stale_peers().await;
                }
                _ = self.shutdown_rx.changed() => {
                    if *self.shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::info!("host task exiting");
    }

    // -----------------------------------------------------------------------
    // Swarm events
    // -----------------------------------------------------------------------

    async fn on_swarm_event(&mut self, event: SwarmEvent<LanchatBehaviourEvent>) {
        match event {
            SwarmEvent::NewListenAddr { address, .. } => {
                tracing::info!(%address, "listening");
            }
            SwarmEvent::ConnectionEstablished {
                peer_id,
                num_established,
                ..
            } => {
                tracing::debug!(%peer_id, num_established, "connection established");
                self.connected.insert(peer_id);
            }
            SwarmEvent::ConnectionClosed {
                peer_id,
                num_established,
                ..
            } => {
                if num_established == 0 {
                    tracing::debug!(%peer_id, "last connection closed");
                    self.connected.remove(&peer_id);
                    if self.announced.remove(&peer_id) {
                        let _ = self.event_tx.send(HostEvent::Disconnected(peer_id)).await;
                    }
                }
            }
            SwarmEvent::OutgoingConnectionError { peer_id, error, .. } => {
                tracing::debug!(?peer_id, %error, "outgoing connection error");
            }
            SwarmEvent::Behaviour(event) => self.on_behaviour_event(event).await,
            other => {
                tracing::trace!(?other, "unhandled swarm event");
            }
        }
    }

    async fn on_behaviour_event(&mut self, event: LanchatBehaviourEvent) {
        match event {
            LanchatBehaviourEvent::Mdns(event) => self.on_mdns_event(event).await,
            LanchatBehaviourEvent::Identify(event) => self.on_identify_event(event).await,
            LanchatBehaviourEvent::Gossipsub(event) => self.on_gossipsub_event(event).await,
            LanchatBehaviourEvent::Metadata(event) => self.on_metadata_event(event),
        }
    }

    // -----------------------------------------------------------------------
    // mDNS
    // -----------------------------------------------------------------------

    async fn on_mdns_event(&mut self, event: mdns::Event) {
        match event {
            mdns::Event::Discovered(peers) => {
                let mut seen = HashSet::new();
                for (peer_id, addr) in peers {
                    if peer_id == self.local_peer_id
                        || self.mismatched.contains(&peer_id)
                        || !seen.insert(peer_id)
                    {
                        continue;
                    }

                    if self.connected.contains(&peer_id) {
                        // Periodic re-announcement of a live peer:
                        // surface it again so consumers refresh its
                        // metadata.
                        if self.announced.contains(&peer_id) {
                            let _ =
                                self.event_tx.send(HostEvent::Discovered(peer_id)).await;
                        }
                        continue;
                    }

                    tracing::debug!(%peer_id, %addr, "mDNS discovered peer");
                    self.swarm
                        .behaviour_mut()
                        .gossipsub
                        .add_explicit_peer(&peer_id);
                    let opts = DialOpts::peer_id(peer_id).addresses(vec![addr]).build();
                    if let Err(e) = self.swarm.dial(opts) {
                        tracing::debug!(%peer_id, %e, "dial failed");
                    }
                }
            }
            mdns::Event::Expired(peers) => {
                for (peer_id, _) in peers {
                    tracing::trace!(%peer_id, "mDNS record expired");
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Identify (rendezvous gate)
    // -----------------------------------------------------------------------

    async fn on_identify_event(&mut self, event: identify::Event) {
        match event {
            identify::Event::Received { peer_id, info, .. } => {
                if info.protocol_version != self.rendezvous_protocol {
                    tracing::debug!(
                        %peer_id,
                        theirs = %info.protocol_version,
                        "peer is on a different rendezvous tag; disconnecting"
                    );
                    self.mismatched.insert(peer_id);
                    self.announced.remove(&peer_id);
                    let _ = self.swarm.disconnect_peer_id(peer_id);
                    return;
                }

                if self.connected.contains(&peer_id) && self.announced.insert(peer_id) {
                    tracing::info!(%peer_id, "peer discovered on rendezvous");
                    let _ = self.event_tx.send(HostEvent::Discovered(peer_id)).await;
                }
            }
            identify::Event::Error { peer_id, error, .. } => {
                tracing::debug!(%peer_id, %error, "identify error");
            }
            _ => {}
        }
    }

    // -----------------------------------------------------------------------
    // Gossipsub
    // -----------------------------------------------------------------------

    async fn on_gossipsub_event(&mut self, event: gossipsub::Event) {
        match event {
            gossipsub::Event::Message {
                propagation_source,
                message,
                ..
            } => {
                self.on_gossip_message(propagation_source, message).await;
            }
            gossipsub::Event::Subscribed { peer_id, topic } => {
                tracing::debug!(%peer_id, %topic, "peer subscribed");
            }
            gossipsub::Event::Unsubscribed { peer_id, topic } => {
                tracing::debug!(%peer_id, %topic, "peer unsubscribed");
            }
            _ => {}
        }
    }

    async fn on_gossip_message(
        &mut self,
        propagation_source: PeerId,
        message: gossipsub::Message,
    ) {
        let tx = match self.subscriptions.get(&message.topic) {
            Some(tx) => tx.clone(),
            None => return,
        };

        // The local mirror handles self-visibility; skip anything
        // originating here. Signed gossipsub does not loop our own
        // publishes back, so this is a defensive check.
        if message.source == Some(self.local_peer_id)
            || propagation_source == self.local_peer_id
        {
            return;
        }

        let envelope = match Envelope::decode(&message.data) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(%propagation_source, %e, "dropping unparseable frame");
                return;
            }
        };

        if tx.send(envelope.clone()).await.is_err() {
            // Receiver dropped: the topic is being torn down.
            return;
        }

        if let Some(handler) = self.shared.handlers.get(&envelope.kind) {
            tokio::spawn(async move {
                if let Err(e) = handler.handle(envelope).await {
                    tracing::warn!(%e, "message handler failed");
                }
            });
        }
    }

    // -----------------------------------------------------------------------
    // Metadata request/response
    // -----------------------------------------------------------------------

    fn on_metadata_event(
        &mut self,
        event: request_response::Event<MetadataRequest, MetadataRecord>,
    ) {
        match event {
            request_response::Event::Message { peer, message } => match message {
                // The request body is a keep-alive; unknown request
                // types are served like any other.
                request_response::Message::Request { channel, .. } => {
                    let record = self.shared.metadata();
                    if self
                        .swarm
                        .behaviour_mut()
                        .metadata
                        .send_response(channel, record)
                        .is_err()
                    {
                        tracing::debug!(%peer, "metadata response channel closed");
                    }
                }
                request_response::Message::Response {
                    request_id,
                    response,
                } => {
                    if let Some(reply) = self.pending_metadata.remove(&request_id) {
                        let _ = reply.send(Ok(response));
                    }
                }
            },
            request_response::Event::OutboundFailure {
                peer,
                request_id,
                error,
            } => {
                if let Some(reply) = self.pending_metadata.remove(&request_id) {
                    let _ = reply.send(Err(LanchatError::TransportError {
                        reason: format!("metadata request to {peer} failed: {error}"),
                    }));
                }
            }
            request_response::Event::InboundFailure { peer, error, .. } => {
                tracing::debug!(%peer, %error, "inbound metadata exchange failed");
            }
            request_response::Event::ResponseSent { .. } => {}
        }
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    async fn on_command(&mut self, cmd: HostCommand) {
        match cmd {
            HostCommand::JoinTopic { name, reply } => {
                let topic = gossipsub::IdentTopic::new(&name);
                match self.swarm.behaviour_mut().gossipsub.subscribe(&topic) {
                    Ok(_) => {
                        tracing::debug!(topic = %name, "joined topic");
                        let (tx, rx) = mpsc::channel(TOPIC_CHANNEL_SIZE);
                        self.subscriptions.insert(topic.hash(), tx);
                        let _ = reply.send(Ok(rx));
                    }
                    Err(e) => {
                        let _ = reply.send(Err(LanchatError::TransportError {
                            reason: format!("failed to subscribe to '{name}': {e}"),
                        }));
                    }
                }
            }
            HostCommand::LeaveTopic { name, reply } => {
                let topic = gossipsub::IdentTopic::new(&name);
                // Dropping the sender ends the topic's read stream.
                self.subscriptions.remove(&topic.hash());
                let result = self
                    .swarm
                    .behaviour_mut()
                    .gossipsub
                    .unsubscribe(&topic)
                    .map(|_| ())
                    .map_err(|e| LanchatError::TransportError {
                        reason: format!("failed to unsubscribe from '{name}': {e}"),
                    });
                let _ = reply.send(result);
            }
            HostCommand::Publish { topic, data, reply } => {
                let result = match self
                    .swarm
                    .behaviour_mut()
                    .gossipsub
                    .publish(gossipsub::IdentTopic::new(&topic), data)
                {
                    Ok(_) => Ok(()),
                    // Alone in the room: nothing to deliver, and the
                    // local mirror still shows the message.
                    Err(gossipsub::PublishError::InsufficientPeers) => {
                        tracing::debug!(%topic, "publish with no subscribed peers");
                        Ok(())
                    }
                    Err(e) => Err(LanchatError::TransportError {
                        reason: format!("publish to '{topic}' failed: {e}"),
                    }),
                };
                let _ = reply.send(result);
            }
            HostCommand::RequestMetadata { peer, reply } => {
                let request_id = self
                    .swarm
                    .behaviour_mut()
                    .metadata
                    .send_request(&peer, MetadataRequest::get());
                self.pending_metadata.insert(request_id, reply);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Staleness sweep
    // -----------------------------------------------------------------------

    async fn sweep_stale_peers(&mut self) {
        let stale: Vec<PeerId> = self
            .announced
            .iter()
            .copied()
            .filter(|peer_id| !self.swarm.is_connected(peer_id))
            .collect();

        for peer_id in stale {
            tracing::debug!(%peer_id, "sweeping stale peer");
            self.announced.remove(&peer_id);
            self.connected.remove(&peer_id);
            let _ = self.event_tx.send(HostEvent::Disconnected(peer_id)).await;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::ChatPayload;

    /// Tags are unique per test so concurrently-running hosts in this
    /// binary never pass each other's rendezvous gate.
    fn test_config(tag: &str) -> P2pConfig {
        P2pConfig {
            rendezvous: format!("host-tests-{tag}"),
            ..P2pConfig::default()
        }
    }

    #[tokio::test]
    async fn spawn_and_shutdown() {
        let (host, _events) = Host::spawn(test_config("spawn")).unwrap();
        assert_ne!(host.local_peer_id().to_string(), "");
        host.shutdown();
    }

    #[tokio::test]
    async fn metadata_record_readable_after_set() {
        let (host, _events) = Host::spawn(test_config("metadata")).unwrap();
        host.update_metadata(|record| {
            record.nickname = "tester".into();
            record.current_room = "general".into();
        });
        let record = host.metadata();
        assert_eq!(record.nickname, "tester");
        assert_eq!(record.current_room, "general");
        host.shutdown();
    }

    #[tokio::test]
    async fn join_publish_and_close_topic() {
        let (host, _events) = Host::spawn(test_config("publish")).unwrap();

        let (topic, _rx) = host.join_topic("chat/rooms/publish-test").await.unwrap();
        // No peers subscribed; publish must still succeed so the local
        // mirror path works for the first node in a room.
        topic
            .publish(EnvelopeKind::Chat, &ChatPayload::join("tester"))
            .await
            .unwrap();
        topic.close().await.unwrap();

        host.shutdown();
    }

    #[tokio::test]
    async fn topic_receiver_ends_on_close() {
        let (host, _events) = Host::spawn(test_config("close")).unwrap();
        let (topic, mut rx) = host.join_topic("chat/rooms/close-test").await.unwrap();
        topic.close().await.unwrap();
        assert!(rx.recv().await.is_none());
        host.shutdown();
    }

    #[tokio::test]
    async fn commands_fail_after_shutdown() {
        let (host, _events) = Host::spawn(test_config("stopped")).unwrap();
        host.shutdown();
        // Give the task a moment to exit.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(host.join_topic("chat/rooms/stopped-test").await.is_err());
    }
}
