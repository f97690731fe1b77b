//! Per-peer sliding-window rate limiter.
//!
//! Each remote peer gets a list of admission timestamps. [`allow`]
//! prunes stamps older than the window and admits the call only if
//! fewer than `limit` remain. A periodic [`cleanup`] removes peers
//! whose newest stamp is older than twice the window so churning
//! peers cannot grow the map without bound.
//!
//! Locally-originated messages never pass through the limiter.
//!
//! [`allow`]: RateLimiter::allow
//! [`cleanup`]: RateLimiter::cleanup

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lanchat_p2p::PeerId;

/// Interval at which the owning task should run [`RateLimiter::cleanup`].
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Thread-safe sliding-window limiter keyed by peer id.
pub struct RateLimiter {
    messages: Mutex<HashMap<PeerId, Vec<Instant>>>,
    limit: usize,
    window: Duration,
}

impl RateLimiter {
    /// Creates a limiter admitting `limit` messages per `window`.
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            messages: Mutex::new(HashMap::new()),
            limit,
            window,
        }
    }

    /// Admits or rejects one message from `peer_id`.
    ///
    /// Returns `true` and records the admission if the peer has sent
    /// fewer than `limit` messages within the window.
    pub fn allow(&self, peer_id: &PeerId) -> bool {
        let mut map = match self.messages.lock() {
            Ok(guard) => guard,
            Err(_) => return false,
        };

        let now = Instant::now();
        let cutoff = now.checked_sub(self.window);

        let stamps = map.entry(*peer_id).or_default();
        if let Some(cutoff) = cutoff {
            stamps.retain(|t| *t > cutoff);
        }

        if stamps.len() >= self.limit {
            return false;
        }

        stamps.push(now);
        true
    }

    /// Removes peers whose newest admission is older than twice the
    /// window. Bounds memory in the face of churning peers.
    pub fn cleanup(&self) {
        let Ok(mut map) = self.messages.lock() else {
            return;
        };

        let Some(cutoff) = Instant::now().checked_sub(self.window * 2) else {
            return;
        };
        map.retain(|_, stamps| matches!(stamps.last(), Some(newest) if *newest > cutoff));
    }

    /// Number of peers currently tracked. Useful for tests.
    pub fn tracked_peers(&self) -> usize {
        self.messages.lock().map(|map| map.len()).unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
