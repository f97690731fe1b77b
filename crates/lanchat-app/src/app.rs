//! Application core: lifecycle, discovery, and the room controller.
//!
//! [`App::new`] starts the host, seeds the local metadata record, and
//! spawns the two background loops (discovery handling and
//! rate-limiter cleanup). The handle is cheap to clone; all state is
//! shared. Consumers drain the event receiver returned alongside.
//!
//! Room state machine: OUT → IN via [`App::join_room`] (leaving any
//! prior room first), IN → OUT via [`App::leave_room`]. At most one
//! room is active; [`App::send_message`] requires IN.

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;

use lanchat_crypto::{derive_room_key, encrypt_text, room_topic};
use lanchat_p2p::{ChatPayload, EnvelopeKind, Host, HostEvent, P2pConfig, PeerId, Topic};
use lanchat_types::config::AppConfig;
use lanchat_types::{
    ChatMessage, Event, LanchatError, MessageKind, MetadataRecord, PeerInfo, Result, RoomInfo,
    User,
};

use crate::chat::{next_message_id, ChatHandler};
use crate::events::EventSink;
use crate::identity::display_identity;
use crate::peers::PeerRegistry;
use crate::rate_limiter::{RateLimiter, CLEANUP_INTERVAL};
use crate::room::Room;
use crate::sanitize::{sanitize, sanitize_bounded, MAX_MESSAGE_LEN, MAX_NICKNAME_LEN, MAX_ROOM_NAME_LEN};

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Handle to a running lanchat node.
///
/// Clones share all state; drop order does not matter. Call
/// [`App::close`] for a clean shutdown.
#[derive(Clone)]
pub struct App {
    user: User,
    host: Host,
    config: AppConfig,
    peers: Arc<PeerRegistry>,
    rate_limiter: Arc<RateLimiter>,
    room: Arc<RwLock<Option<Room>>>,
    topic: Arc<RwLock<Option<Topic>>>,
    events: EventSink,
}

impl App {
    /// Creates the node: sanitizes the nickname, starts the host on
    /// the configured rendezvous, publishes the initial metadata
    /// record, and spawns the background loops.
    ///
    /// Returns the handle plus the consumer event receiver.
    ///
    /// # Errors
    ///
    /// - [`LanchatError::InvalidInput`] if the nickname is empty after
    ///   sanitization.
    /// - [`LanchatError::ConfigError`] / [`LanchatError::TransportError`]
    ///   if configuration or host construction fails.
    pub fn new(nickname: &str, config: AppConfig) -> Result<(Self, mpsc::Receiver<Event>)> {
        config.validate()?;

        let nickname = sanitize_bounded(nickname, MAX_NICKNAME_LEN);
        if nickname.is_empty() {
            return Err(LanchatError::InvalidInput {
                reason: "invalid nickname".into(),
            });
        }

        let p2p_config = P2pConfig {
            rendezvous: config.rendezvous_or_default().to_string(),
            metadata_timeout_secs: config.metadata_timeout_secs,
            sweep_interval_secs: config.sweep_interval_secs,
            ..P2pConfig::default()
        };
        let (host, host_events) = Host::spawn(p2p_config)?;

        let user = User {
            nickname: nickname.clone(),
            status: "online".to_string(),
        };

        let mut record = MetadataRecord {
            nickname: nickname.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            ..MetadataRecord::default()
        };
        record.custom.insert(
            MetadataRecord::KEY_STATUS.to_string(),
            user.status.clone(),
        );
        host.set_metadata(record);

        let (events, event_rx) = EventSink::new(config.event_queue_size);

        let app = Self {
            user,
            host,
            peers: Arc::new(PeerRegistry::new()),
            rate_limiter: Arc::new(RateLimiter::new(
                config.rate_limit,
                Duration::from_secs(config.rate_window_secs),
            )),
            room: Arc::new(RwLock::new(None)),
            topic: Arc::new(RwLock::new(None)),
            events,
            config,
        };

        tokio::spawn(discovery_loop(app.clone(), host_events));
        tokio::spawn(cleanup_loop(app.clone()));

        tracing::info!(
            user = %app.user.nickname,
            id = %app.local_id(),
            "app initialized"
        );

        Ok((app, event_rx))
    }

    /// The local user.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// The local peer identifier in string form.
    pub fn local_id(&self) -> String {
        self.host.local_peer_id().to_string()
    }

    /// The local display identity, e.g. `@brave-otter-42`.
    pub fn local_identity(&self) -> String {
        display_identity(&self.local_id())
    }

    // -----------------------------------------------------------------------
    // Room lifecycle
    // -----------------------------------------------------------------------

    /// Joins a room, leaving any current room first.
    ///
    /// An empty password joins the plaintext topic; a non-empty one
    /// derives the encryption key and switches to the partitioned
    /// topic, so peers with a different password never meet.
    pub async fn join_room(&self, name: &str, password: &str) -> Result<()> {
        let name = sanitize(name);
        if name.is_empty() {
            return Err(LanchatError::InvalidInput {
                reason: "invalid room name".into(),
            });
        }
        let name = crate::sanitize::truncate(name, MAX_ROOM_NAME_LEN);

        if self.current_room().is_some() {
            if let Err(e) = self.leave_room().await {
                tracing::warn!(%e, "error leaving current room");
            }
        }

        let topic_name = room_topic(&name, password);
        let (topic, mut messages) = self.host.join_topic(&topic_name).await?;

        let key = if password.is_empty() {
            None
        } else {
            let key = derive_room_key(password, &name)?;
            tracing::info!("room encryption enabled");
            Some(key)
        };

        let room = Room::new(name.clone(), topic_name, password.to_string(), key);
        let info = room.info();

        if let Ok(mut guard) = self.room.write() {
            *guard = Some(room);
        }
        if let Ok(mut guard) = self.topic.write() {
            *guard = Some(topic.clone());
        }

        self.host.register_handler(
            EnvelopeKind::Chat,
            Arc::new(ChatHandler::new(
                self.room.clone(),
                self.peers.clone(),
                self.rate_limiter.clone(),
                self.events.clone(),
            )),
        );

        // Drain the read stream; envelopes are dispatched to the
        // registered handler by the host. Ends when the topic closes.
        tokio::spawn(async move { while messages.recv().await.is_some() {} });

        if let Err(e) = topic
            .publish(EnvelopeKind::Chat, &ChatPayload::join(&self.user.nickname))
            .await
        {
            tracing::warn!(%e, "failed to announce join");
        }

        let encrypted = info.encrypted;
        let room_name = name.clone();
        self.host.update_metadata(move |record| {
            record.current_room = room_name;
            if encrypted {
                record.custom.insert(
                    MetadataRecord::KEY_ROOM_ENCRYPTED.to_string(),
                    "true".to_string(),
                );
            } else {
                record.custom.remove(MetadataRecord::KEY_ROOM_ENCRYPTED);
            }
        });

        tracing::info!(room = %name, "joined room");
        self.events.emit(Event::RoomJoined(info)).await;

        Ok(())
    }

    /// Leaves the current room. A no-op when not in one.
    pub async fn leave_room(&self) -> Result<()> {
        // Clear the advertised room before anything else so metadata
        // fetched mid-leave is already accurate.
        self.host.update_metadata(|record| {
            record.current_room.clear();
            record.custom.remove(MetadataRecord::KEY_ROOM_ENCRYPTED);
        });

        let room = self.room.write().ok().and_then(|mut guard| guard.take());
        let topic = self.topic.write().ok().and_then(|mut guard| guard.take());

        let Some(room) = room else {
            return Ok(());
        };

        if let Some(topic) = topic {
            if let Err(e) = topic
                .publish(EnvelopeKind::Chat, &ChatPayload::leave(&self.user.nickname))
                .await
            {
                tracing::warn!(%e, "failed to announce leave");
            }
            if let Err(e) = topic.close().await {
                tracing::warn!(%e, "error closing topic");
            }
        }

        tracing::info!(room = %room.name, "left room");
        Ok(())
    }

    /// Sends message text to the current room.
    ///
    /// The text is sanitized first; empty and oversized inputs are
    /// rejected. On success the message is mirrored locally as a
    /// `MessageReceived` event so the sender sees its own message.
    pub async fn send_message(&self, text: &str) -> Result<()> {
        let text = sanitize(text);
        if text.is_empty() {
            return Err(LanchatError::InvalidInput {
                reason: "message is empty after sanitization".into(),
            });
        }
        if text.len() > MAX_MESSAGE_LEN {
            return Err(LanchatError::InvalidInput {
                reason: format!("message too long (max {MAX_MESSAGE_LEN} characters)"),
            });
        }

        let wire_text = {
            let guard = match self.room.read() {
                Ok(guard) => guard,
                Err(_) => return Err(LanchatError::NotInRoom),
            };
            let Some(room) = guard.as_ref() else {
                return Err(LanchatError::NotInRoom);
            };
            match &room.key {
                Some(key) => encrypt_text(&text, key)?,
                None => text.clone(),
            }
        };

        let topic = self
            .topic
            .read()
            .ok()
            .and_then(|guard| guard.clone())
            .ok_or(LanchatError::NotInRoom)?;

        topic
            .publish(
                EnvelopeKind::Chat,
                &ChatPayload::text(wire_text, &self.user.nickname),
            )
            .await?;

        // Local mirror: consumers only see events, so the sender's
        // own message must be enqueued here.
        let local_id = self.local_id();
        let message = ChatMessage {
            id: next_message_id(),
            identity: display_identity(&local_id),
            from: local_id,
            nickname: self.user.nickname.clone(),
            content: text,
            timestamp: Utc::now(),
            kind: MessageKind::Text,
        };
        if let Ok(mut guard) = self.room.write() {
            if let Some(room) = guard.as_mut() {
                room.append(message.clone());
            }
        }
        self.events.emit(Event::MessageReceived(message)).await;

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Description of the current room, if any.
    pub fn current_room(&self) -> Option<RoomInfo> {
        self.room
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|room| room.info()))
    }

    /// Snapshot of the current room's message log.
    pub fn room_messages(&self) -> Vec<ChatMessage> {
        self.room
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|room| room.messages.clone()))
            .unwrap_or_default()
    }

    /// Snapshot of all known peers.
    pub fn get_peers(&self) -> Vec<PeerInfo> {
        self.peers.snapshot()
    }

    /// Renders the peer list for display.
    ///
    /// Peers advertising a non-empty, non-encrypted room render as
    /// `"<nickname> (In room: <room>)"`; everyone else as the bare
    /// nickname.
    pub fn get_peer_list(&self) -> Vec<String> {
        let mut list: Vec<String> = self
            .peers
            .snapshot()
            .into_iter()
            .map(|peer| {
                if !peer.current_room.is_empty() && !peer.room_encrypted() {
                    let room = sanitize(&peer.current_room);
                    format!("{} (In room: {room})", peer.nickname)
                } else {
                    peer.nickname
                }
            })
            .collect();
        list.sort();
        list
    }

    /// Renders the de-duplicated room list: the local room (suffixed
    /// `" (encrypted)"` when keyed) plus every peer's non-encrypted
    /// advertised room.
    pub fn get_room_list(&self) -> Vec<String> {
        let mut rooms = BTreeSet::new();

        if let Ok(guard) = self.room.read() {
            if let Some(room) = guard.as_ref() {
                let name = if room.encrypted() {
                    format!("{} (encrypted)", room.name)
                } else {
                    room.name.clone()
                };
                rooms.insert(name);
            }
        }

        for peer in self.peers.snapshot() {
            if peer.current_room.is_empty() || peer.room_encrypted() {
                continue;
            }
            let name = sanitize(&peer.current_room);
            if !name.is_empty() && name.len() <= MAX_ROOM_NAME_LEN {
                rooms.insert(name);
            }
        }

        rooms.into_iter().collect()
    }

    // -----------------------------------------------------------------------
    // Shutdown
    // -----------------------------------------------------------------------

    /// Leaves any room, stops the host, and closes the event stream.
    pub async fn close(&self) {
        tracing::info!("closing app");
        if self.current_room().is_some() {
            let _ = self.leave_room().await;
        }
        self.host.shutdown();
        self.events.close();
    }

    // -----------------------------------------------------------------------
    // Discovery
    // -----------------------------------------------------------------------

    /// Handles one discovered (or re-announced) peer: waits for the
    /// pubsub session to settle, fetches metadata, and upserts the
    /// registry. Fetch failures skip the peer without inserting.
    async fn on_peer_discovered(&self, peer_id: PeerId) {
        tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms)).await;

        match self.host.request_metadata(peer_id).await {
            Ok(record) => {
                let info = self.peers.upsert_from_record(&peer_id, record);
                tracing::info!(peer = %info.nickname, id = %info.id, "peer connected");
                self.events.emit(Event::PeerJoined(info)).await;
            }
            Err(e) => {
                tracing::warn!(%peer_id, %e, "failed to fetch peer metadata; skipping");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Background loops
// ---------------------------------------------------------------------------

/// Consumes host discovery events until the host shuts down.
async fn discovery_loop(app: App, mut host_events: mpsc::Receiver<HostEvent>) {
    while let Some(event) = host_events.recv().await {
        match event {
            HostEvent::Discovered(peer_id) => {
                let app = app.clone();
                tokio::spawn(async move {
                    app.on_peer_discovered(peer_id).await;
                });
            }
            HostEvent::Disconnected(peer_id) => {
                if let Some(info) = app.peers.remove(&peer_id) {
                    tracing::info!(peer = %info.nickname, "peer disconnected");
                    app.events.emit(Event::PeerLeft(info)).await;
                }
            }
        }
    }
    tracing::debug!("discovery loop ended");
}

/// Periodically compacts the rate limiter until shutdown.
async fn cleanup_loop(app: App) {
    let mut shutdown = app.host.shutdown_signal();
    let mut tick = tokio::time::interval(CLEANUP_INTERVAL);
    loop {
        tokio::select! {
            _ = tick.tick() => {
                app.rate_limiter.cleanup();
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    break;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(tag: &str) -> AppConfig {
        AppConfig {
            rendezvous: format!("app-tests-{tag}"),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn empty_nickname_rejected() {
        let result = App::new("\u{200b}\u{0000}", test_config("nick"));
        assert!(matches!(
            result,
            Err(LanchatError::InvalidInput { .. })
        ));
    }

    #[tokio::test]
    async fn nickname_is_sanitized_and_bounded() {
        let raw = format!("al\u{0000}ice{}", "x".repeat(60));
        let (app, _events) = App::new(&raw, test_config("bound")).unwrap();
        assert!(app.user().nickname.starts_with("alice"));
        assert_eq!(app.user().nickname.len(), MAX_NICKNAME_LEN);
        app.close().await;
    }

    #[tokio::test]
    async fn send_outside_room_is_not_in_room() {
        let (app, _events) = App::new("tester", test_config("outside")).unwrap();
        let result = app.send_message("hello").await;
        assert!(matches!(result, Err(LanchatError::NotInRoom)));
        app.close().await;
    }

    #[tokio::test]
    async fn empty_room_name_rejected() {
        let (app, _events) = App::new("tester", test_config("emptyroom")).unwrap();
        let result = app.join_room("\u{0000}", "").await;
        assert!(matches!(result, Err(LanchatError::InvalidInput { .. })));
        app.close().await;
    }

    #[tokio::test]
    async fn empty_message_rejected() {
        let (app, _events) = App::new("tester", test_config("emptymsg")).unwrap();
        app.join_room("lonely", "").await.unwrap();
        let result = app.send_message("\u{0000}\u{200b}").await;
        assert!(matches!(result, Err(LanchatError::InvalidInput { .. })));
        app.close().await;
    }

    #[tokio::test]
    async fn oversized_message_rejected() {
        let (app, _events) = App::new("tester", test_config("oversize")).unwrap();
        app.join_room("lonely", "").await.unwrap();
        let result = app.send_message(&"x".repeat(500)).await;
        assert!(matches!(result, Err(LanchatError::InvalidInput { .. })));
        app.close().await;
    }

    #[tokio::test]
    async fn join_emits_room_joined_then_send_mirrors_locally() {
        let (app, mut events) = App::new("tester", test_config("mirror")).unwrap();

        app.join_room("mirror-room", "").await.unwrap();
        match events.recv().await {
            Some(Event::RoomJoined(info)) => {
                assert_eq!(info.name, "mirror-room");
                assert!(!info.encrypted);
            }
            other => panic!("expected RoomJoined, got {other:?}"),
        }

        app.send_message("Hello World!").await.unwrap();
        match events.recv().await {
            Some(Event::MessageReceived(msg)) => {
                assert_eq!(msg.content, "Hello World!");
                assert_eq!(msg.from, app.local_id());
                assert_eq!(msg.nickname, "tester");
                assert_eq!(msg.kind, MessageKind::Text);
            }
            other => panic!("expected MessageReceived, got {other:?}"),
        }

        // The mirror also lands in the room log.
        assert_eq!(app.room_messages().len(), 1);

        app.close().await;
        assert!(events.recv().await.is_none(), "event stream must end cleanly");
    }

    #[tokio::test]
    async fn encrypted_room_is_marked_in_listing() {
        let (app, _events) = App::new("tester", test_config("enclist")).unwrap();
        app.join_room("vault", "hunter2").await.unwrap();

        let rooms = app.get_room_list();
        assert!(rooms.contains(&"vault (encrypted)".to_string()));
        assert_eq!(app.current_room().map(|r| r.encrypted), Some(true));

        app.close().await;
    }

    #[tokio::test]
    async fn rejoin_replaces_current_room() {
        let (app, _events) = App::new("tester", test_config("rejoin")).unwrap();
        app.join_room("first", "").await.unwrap();
        app.join_room("second", "").await.unwrap();

        assert_eq!(app.current_room().map(|r| r.name), Some("second".into()));
        let rooms = app.get_room_list();
        assert!(!rooms.contains(&"first".to_string()));

        app.close().await;
    }

    #[tokio::test]
    async fn leave_when_not_in_room_is_noop() {
        let (app, _events) = App::new("tester", test_config("noroom")).unwrap();
        assert!(app.leave_room().await.is_ok());
        app.close().await;
    }
}
