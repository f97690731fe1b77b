//! lanchat application core.
//!
//! Sits between the network layer (`lanchat-p2p`) and the consumer
//! surface (`lanchat-sdk`): owns the peer registry, the one active
//! room, the rate limiter, and the event bus.
//!
//! # Modules
//!
//! - [`sanitize`] — whitelist text filter and length bounds
//! - [`rate_limiter`] — per-peer sliding-window admission
//! - [`identity`] — `@adjective-animal-n` display identities
//! - [`peers`] — registry of discovered peers
//! - [`room`] — active room state
//! - [`chat`] — inbound chat message pipeline
//! - [`events`] — bounded event bus
//! - [`app`] — the `App` handle tying it all together

pub mod app;
mod chat;
mod events;
pub mod identity;
pub mod peers;
pub mod rate_limiter;
pub mod room;
pub mod sanitize;

pub use app::App;
pub use identity::display_identity;
pub use peers::PeerRegistry;
pub use rate_limiter::RateLimiter;
pub use room::Room;
pub use sanitize::sanitize;
