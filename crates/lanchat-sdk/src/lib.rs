//! Stable surface for lanchat consumers: UIs, bots, SDK clients.
//!
//! [`Lanchat`] wraps the application core and multiplexes the single
//! event stream to an [`EventHandler`] and any registered [`Bot`]s,
//! in registration order, inside [`Lanchat::handle_events`]. All
//! identifiers cross this boundary in stable string form.
//!
//! Bots receive a cloneable [`ChatHandle`] so their callbacks can
//! send messages or switch rooms while the dispatcher owns the
//! `Lanchat` itself.

mod bot;

pub use bot::{Bot, BotRunner};

use lanchat_app::App;
use lanchat_types::config::AppConfig;
use lanchat_types::{ChatMessage, Event, PeerInfo, Result, RoomInfo};
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// EventHandler
// ---------------------------------------------------------------------------

/// Synchronous consumer callbacks, invoked from the dispatcher.
///
/// All methods default to no-ops so implementors only override what
/// they care about.
pub trait EventHandler: Send {
    /// A message arrived in the current room (including the local
    /// mirror of our own sends).
    fn on_message(&mut self, _message: &ChatMessage) {}
    /// A peer completed discovery.
    fn on_peer_joined(&mut self, _peer: &PeerInfo) {}
    /// A peer disconnected or went stale.
    fn on_peer_left(&mut self, _peer: &PeerInfo) {}
    /// The local node joined a room.
    fn on_room_joined(&mut self, _room: &RoomInfo) {}
    /// A peer's status changed.
    fn on_status_change(&mut self, _status: &str) {}
    /// Free-form system notice.
    fn on_system_message(&mut self, _text: &str) {}
}

/// Handler that ignores every event.
pub struct BaseEventHandler;

impl EventHandler for BaseEventHandler {}

// ---------------------------------------------------------------------------
// ChatHandle
// ---------------------------------------------------------------------------

/// Cloneable command surface passed into bot callbacks.
#[derive(Clone)]
pub struct ChatHandle {
    app: App,
}

impl ChatHandle {
    /// Joins a room, leaving any current one first. Empty password
    /// means a plaintext room.
    pub async fn join_room(&self, name: &str, password: &str) -> Result<()> {
        self.app.join_room(name, password).await
    }

    /// Leaves the current room; a no-op outside one.
    pub async fn leave_room(&self) -> Result<()> {
        self.app.leave_room().await
    }

    /// Sends message text to the current room.
    pub async fn send_message(&self, text: &str) -> Result<()> {
        self.app.send_message(text).await
    }

    /// Rendered peer list (`"<nickname> (In room: <room>)"` form).
    pub fn get_peer_list(&self) -> Vec<String> {
        self.app.get_peer_list()
    }

    /// Rendered, de-duplicated room list.
    pub fn get_room_list(&self) -> Vec<String> {
        self.app.get_room_list()
    }

    /// Snapshot of all known peers.
    pub fn get_peers(&self) -> Vec<PeerInfo> {
        self.app.get_peers()
    }

    /// Description of the current room, if any.
    pub fn current_room(&self) -> Option<RoomInfo> {
        self.app.current_room()
    }

    /// The local nickname.
    pub fn nickname(&self) -> &str {
        &self.app.user().nickname
    }

    /// The local peer id in string form.
    pub fn local_id(&self) -> String {
        self.app.local_id()
    }

    /// The local display identity, e.g. `@brave-otter-42`.
    pub fn local_identity(&self) -> String {
        self.app.local_identity()
    }

    /// Shuts the node down; the event stream ends cleanly.
    pub async fn close(&self) {
        self.app.close().await
    }
}

// ---------------------------------------------------------------------------
// Lanchat
// ---------------------------------------------------------------------------

/// The SDK facade: owns the node, the event stream, the handler, and
/// the registered bots.
pub struct Lanchat {
    handle: ChatHandle,
    events: Option<mpsc::Receiver<Event>>,
    handler: Box<dyn EventHandler>,
    bots: Vec<Box<dyn Bot>>,
}

impl Lanchat {
    /// Starts a node with the given nickname on the given discovery
    /// domain (empty domain falls back to the default rendezvous).
    pub fn new(
        nickname: &str,
        domain: &str,
        handler: Box<dyn EventHandler>,
    ) -> Result<Self> {
        let config = AppConfig {
            rendezvous: domain.split_whitespace().collect(),
            ..AppConfig::default()
        };
        Self::with_config(nickname, config, handler)
    }

    /// Starts a node with full configuration control.
    pub fn with_config(
        nickname: &str,
        config: AppConfig,
        handler: Box<dyn EventHandler>,
    ) -> Result<Self> {
        let (app, events) = App::new(nickname, config)?;
        Ok(Self {
            handle: ChatHandle { app },
            events: Some(events),
            handler,
            bots: Vec::new(),
        })
    }

    /// A cloneable command handle, usable from other tasks while
    /// [`handle_events`](Self::handle_events) runs.
    pub fn handle(&self) -> ChatHandle {
        self.handle.clone()
    }

    /// Registers a bot and runs its `initialize` callback.
    ///
    /// Bots are invoked in registration order on every dispatched
    /// event; their errors are logged, never fatal.
    pub async fn register_bot(&mut self, mut bot: Box<dyn Bot>) -> Result<()> {
        bot.initialize(&self.handle).await?;
        self.bots.push(bot);
        Ok(())
    }

    /// Blocking dispatcher: drains the event stream, invoking the
    /// handler and then each bot per event. Returns when the node is
    /// closed (the stream ends).
    pub async fn handle_events(&mut self) {
        let Some(mut events) = self.events.take() else {
            tracing::warn!("event stream already consumed; handle_events called twice");
            return;
        };

        while let Some(event) = events.recv().await {
            self.dispatch(event).await;
        }
    }

    async fn dispatch(&mut self, event: Event) {
        match event {
            Event::MessageReceived(message) => {
                self.handler.on_message(&message);
                for bot in &mut self.bots {
                    if let Err(e) = bot.on_message(message.clone(), &self.handle).await {
                        tracing::warn!(%e, "bot error");
                    }
                }
            }
            Event::PeerJoined(peer) => {
                self.handler.on_peer_joined(&peer);
                for bot in &mut self.bots {
                    if let Err(e) = bot.on_peer_joined(peer.clone(), &self.handle).await {
                        tracing::warn!(%e, "bot error");
                    }
                }
            }
            Event::PeerLeft(peer) => {
                self.handler.on_peer_left(&peer);
            }
            Event::RoomJoined(room) => {
                self.handler.on_room_joined(&room);
                for bot in &mut self.bots {
                    if let Err(e) = bot.on_room_joined(room.clone(), &self.handle).await {
                        tracing::warn!(%e, "bot error");
                    }
                }
            }
            Event::StatusChange(status) => {
                self.handler.on_status_change(&status);
            }
            Event::SystemMessage(text) => {
                self.handler.on_system_message(&text);
            }
        }
    }

    // Delegates, so simple consumers never need a separate handle.

    /// See [`ChatHandle::join_room`].
    pub async fn join_room(&self, name: &str, password: &str) -> Result<()> {
        self.handle.join_room(name, password).await
    }

    /// See [`ChatHandle::leave_room`].
    pub async fn leave_room(&self) -> Result<()> {
        self.handle.leave_room().await
    }

    /// See [`ChatHandle::send_message`].
    pub async fn send_message(&self, text: &str) -> Result<()> {
        self.handle.send_message(text).await
    }

    /// See [`ChatHandle::get_peer_list`].
    pub fn get_peer_list(&self) -> Vec<String> {
        self.handle.get_peer_list()
    }

    /// See [`ChatHandle::get_room_list`].
    pub fn get_room_list(&self) -> Vec<String> {
        self.handle.get_room_list()
    }

    /// See [`ChatHandle::close`].
    pub async fn close(&self) {
        self.handle.close().await
    }
}
