//! Inbound chat message pipeline.
//!
//! [`ChatHandler`] is registered for `"chat"` envelopes when a room
//! is joined and runs on a fresh task per message. Processing order:
//!
//! 1. Drop everything while not in a room.
//! 2. Extract the sender peer id from the envelope.
//! 3. Rate-limiter gate (silent drop with a warn log).
//! 4. Decode the chat payload; missing `type` means text.
//! 5. Resolve the nickname: registry → envelope field → `"Unknown"`.
//! 6. For text: decrypt if the room is keyed (failure empties the
//!    content, which the next step then drops), sanitize, drop empty,
//!    truncate oversized.
//! 7. Append to the room log and emit `MessageReceived`.
//!
//! Join/leave payloads mutate the room member set and render a
//! notice message instead.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use lanchat_crypto::decrypt_text;
use lanchat_p2p::{ChatPayload, Envelope, EnvelopeHandler, PeerId};
use lanchat_types::{ChatMessage, Event, LanchatError, MessageKind, Result};

use crate::events::EventSink;
use crate::identity::display_identity;
use crate::peers::{PeerRegistry, UNKNOWN_NICKNAME};
use crate::rate_limiter::RateLimiter;
use crate::room::Room;
use crate::sanitize::{sanitize, sanitize_bounded, truncate, MAX_MESSAGE_LEN, MAX_NICKNAME_LEN};

// ---------------------------------------------------------------------------
// ChatHandler
// ---------------------------------------------------------------------------

/// Stateful handler for inbound `"chat"` envelopes.
pub(crate) struct ChatHandler {
    room: Arc<RwLock<Option<Room>>>,
    peers: Arc<PeerRegistry>,
    rate_limiter: Arc<RateLimiter>,
    events: EventSink,
}

impl ChatHandler {
    pub fn new(
        room: Arc<RwLock<Option<Room>>>,
        peers: Arc<PeerRegistry>,
        rate_limiter: Arc<RateLimiter>,
        events: EventSink,
    ) -> Self {
        Self {
            room,
            peers,
            rate_limiter,
            events,
        }
    }

    /// Resolves the display nickname for a message.
    ///
    /// The registry entry wins; otherwise the envelope's own claim is
    /// sanitized and bounded; `"Unknown"` as the last resort.
    fn resolve_nickname(&self, peer_id: &PeerId, payload: &ChatPayload) -> String {
        if let Some(info) = self.peers.get(peer_id) {
            return info.nickname;
        }
        payload
            .nickname
            .as_deref()
            .map(|n| sanitize_bounded(n, MAX_NICKNAME_LEN))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_NICKNAME.to_string())
    }

    /// Appends a message to the room log (if still in a room) and
    /// emits it. The membership mutation for join/leave happens under
    /// the same lock as the append.
    async fn deliver(
        &self,
        message: ChatMessage,
        peer_id: &PeerId,
        membership: Membership,
    ) {
        {
            let mut guard = match self.room.write() {
                Ok(guard) => guard,
                Err(_) => return,
            };
            let Some(room) = guard.as_mut() else {
                return;
            };
            match membership {
                Membership::Joins => {
                    // Only track members the registry can render.
                    if self.peers.contains(peer_id) {
                        room.members.insert(*peer_id);
                    }
                }
                Membership::Leaves => {
                    room.members.remove(peer_id);
                }
                Membership::Unchanged => {}
            }
            room.append(message.clone());
        }
        self.events.emit(Event::MessageReceived(message)).await;
    }
}

enum Membership {
    Joins,
    Leaves,
    Unchanged,
}

#[async_trait]
impl EnvelopeHandler for ChatHandler {
    async fn handle(&self, envelope: Envelope) -> Result<()> {
        // Drop anything arriving while not in a room.
        let in_room = self
            .room
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false);
        if !in_room {
            return Ok(());
        }

        let peer_id: PeerId =
            envelope
                .from
                .parse()
                .map_err(|e| LanchatError::ParseError {
                    reason: format!("invalid peer id in envelope: {e}"),
                })?;

        if !self.rate_limiter.allow(&peer_id) {
            tracing::warn!(peer = %envelope.from, "rate limit exceeded; dropping message");
            return Ok(());
        }

        let payload: ChatPayload =
            serde_json::from_value(envelope.data).map_err(|e| LanchatError::ParseError {
                reason: format!("malformed chat payload: {e}"),
            })?;

        let nickname = self.resolve_nickname(&peer_id, &payload);

        match payload.kind {
            MessageKind::Join => {
                tracing::debug!(%nickname, "peer joined the room");
                let message = notice(
                    &peer_id,
                    &nickname,
                    format!("{nickname} joined the room"),
                    envelope.timestamp,
                    MessageKind::Join,
                );
                self.deliver(message, &peer_id, Membership::Joins).await;
            }

            MessageKind::Leave => {
                tracing::debug!(%nickname, "peer left the room");
                let message = notice(
                    &peer_id,
                    &nickname,
                    format!("{nickname} left the room"),
                    envelope.timestamp,
                    MessageKind::Leave,
                );
                self.deliver(message, &peer_id, Membership::Leaves).await;
            }

            MessageKind::Text => {
                let Some(raw) = payload.text else {
                    return Ok(());
                };

                let text = {
                    let guard = match self.room.read() {
                        Ok(guard) => guard,
                        Err(_) => return Ok(()),
                    };
                    let Some(room) = guard.as_ref() else {
                        return Ok(());
                    };
                    match &room.key {
                        Some(key) => match decrypt_text(&raw, key) {
                            Ok(cleartext) => cleartext,
                            Err(e) => {
                                tracing::warn!(
                                    %nickname, %e,
                                    "failed to decrypt message (wrong password?)"
                                );
                                // Never surface ciphertext; the empty
                                // check below drops the message.
                                String::new()
                            }
                        },
                        None => raw,
                    }
                };

                let text = sanitize(&text);
                if text.is_empty() {
                    tracing::debug!(%nickname, "dropped empty message after sanitization");
                    return Ok(());
                }
                let text = if text.len() > MAX_MESSAGE_LEN {
                    tracing::debug!(%nickname, "truncated oversized message");
                    truncate(text, MAX_MESSAGE_LEN)
                } else {
                    text
                };

                let message = ChatMessage {
                    id: next_message_id(),
                    from: peer_id.to_string(),
                    identity: display_identity(&peer_id.to_string()),
                    nickname,
                    content: text,
                    timestamp: envelope.timestamp,
                    kind: MessageKind::Text,
                };
                self.deliver(message, &peer_id, Membership::Unchanged).await;
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Builds a join/leave notice message.
fn notice(
    peer_id: &PeerId,
    nickname: &str,
    content: String,
    timestamp: DateTime<Utc>,
    kind: MessageKind,
) -> ChatMessage {
    ChatMessage {
        id: next_message_id(),
        from: peer_id.to_string(),
        identity: display_identity(&peer_id.to_string()),
        nickname: nickname.to_string(),
        content,
        timestamp,
        kind,
    }
}

/// Locally-assigned message id: arrival time in nanoseconds.
pub(crate) fn next_message_id() -> String {
    Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default()
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
