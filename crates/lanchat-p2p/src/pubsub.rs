//! Handle for a joined pubsub topic.
//!
//! Obtained from [`Host::join_topic`] together with the envelope
//! receiver. The handle only frames and forwards; the subscription
//! itself lives in the swarm task.

use chrono::Utc;
use serde::Serialize;

use lanchat_types::{LanchatError, Result};

use crate::envelope::{Envelope, EnvelopeKind};
use crate::host::Host;

/// Publishing handle for one topic.
#[derive(Clone)]
pub struct Topic {
    name: String,
    host: Host,
}

impl Topic {
    pub(crate) fn new(name: String, host: Host) -> Self {
        Self { name, host }
    }

    /// The full topic name, e.g. `chat/rooms/general`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Frames `payload` in an [`Envelope`] and publishes it.
    ///
    /// The envelope carries this host's peer id and the current time.
    pub async fn publish<T: Serialize>(&self, kind: EnvelopeKind, payload: &T) -> Result<()> {
        let data = serde_json::to_value(payload).map_err(|e| LanchatError::ParseError {
            reason: format!("failed to serialize payload: {e}"),
        })?;

        let envelope = Envelope {
            kind,
            from: self.host.local_peer_id().to_string(),
            timestamp: Utc::now(),
            data,
        };

        self.host.publish_raw(&self.name, envelope.encode()?).await
    }

    /// Cancels the subscription and closes the topic. The paired
    /// envelope receiver observes end-of-stream.
    pub async fn close(&self) -> Result<()> {
        self.host.leave_topic(&self.name).await
    }
}
