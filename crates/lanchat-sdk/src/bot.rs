//! Bot plug-in contract and the standalone runner.
//!
//! A bot is a consumer with four callbacks, all invoked from the
//! dispatcher in registration order. Every method defaults to a
//! no-op so a bot only implements what it reacts to.

use async_trait::async_trait;

use lanchat_types::{ChatMessage, PeerInfo, Result, RoomInfo};

use crate::{BaseEventHandler, ChatHandle, Lanchat};

/// Plug-in contract for bots.
#[async_trait]
pub trait Bot: Send {
    /// Called once at registration. Typical bots join their room here.
    async fn initialize(&mut self, _chat: &ChatHandle) -> Result<()> {
        Ok(())
    }

    /// Called for every message in the current room, including join
    /// and leave notices.
    async fn on_message(&mut self, _message: ChatMessage, _chat: &ChatHandle) -> Result<()> {
        Ok(())
    }

    /// Called when a peer completes discovery.
    async fn on_peer_joined(&mut self, _peer: PeerInfo, _chat: &ChatHandle) -> Result<()> {
        Ok(())
    }

    /// Called when the local node joins a room.
    async fn on_room_joined(&mut self, _room: RoomInfo, _chat: &ChatHandle) -> Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// BotRunner
// ---------------------------------------------------------------------------

/// Runs a single bot as a standalone node until Ctrl-C.
pub struct BotRunner<B: Bot + 'static> {
    bot: B,
}

impl<B: Bot + 'static> BotRunner<B> {
    /// Wraps a bot for standalone execution.
    pub fn new(bot: B) -> Self {
        Self { bot }
    }

    /// Starts a node, registers the bot, and dispatches events until
    /// Ctrl-C, then shuts down cleanly.
    pub async fn run(self, nickname: &str, domain: &str) -> Result<()> {
        let mut chat = Lanchat::new(nickname, domain, Box::new(BaseEventHandler))?;
        chat.register_bot(Box::new(self.bot)).await?;

        let handle = chat.handle();
        let dispatcher = tokio::spawn(async move {
            chat.handle_events().await;
        });

        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(%e, "failed to wait for interrupt signal");
        }

        handle.close().await;
        let _ = dispatcher.await;
        Ok(())
    }
}
