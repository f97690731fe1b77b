//! Handler registry for parsed envelopes.
//!
//! Maps an [`EnvelopeKind`] to a handler object. Registration is
//! mutating but rare (once per room join), so a plain `RwLock` around
//! the map is sufficient. The swarm task spawns a fresh task per
//! envelope to invoke the matching handler; handler errors are logged
//! by the dispatcher and never reach the subscription loop.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use lanchat_types::Result;

use crate::envelope::{Envelope, EnvelopeKind};

/// Callback invoked for every parsed envelope of a registered kind.
#[async_trait]
pub trait EnvelopeHandler: Send + Sync {
    /// Processes one envelope. Errors are logged by the dispatcher.
    async fn handle(&self, envelope: Envelope) -> Result<()>;
}

/// Kind → handler mapping shared between the host handle and the
/// swarm task.
#[derive(Default)]
pub(crate) struct HandlerRegistry {
    inner: RwLock<HashMap<EnvelopeKind, Arc<dyn EnvelopeHandler>>>,
}

impl HandlerRegistry {
    /// Registers (or replaces) the handler for a kind.
    pub fn register(&self, kind: EnvelopeKind, handler: Arc<dyn EnvelopeHandler>) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(kind, handler);
        }
    }

    /// Returns the handler for a kind, if any.
    pub fn get(&self, kind: &EnvelopeKind) -> Option<Arc<dyn EnvelopeHandler>> {
        self.inner
            .read()
            .ok()
            .and_then(|map| map.get(kind).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter(AtomicUsize);

    #[async_trait]
    impl EnvelopeHandler for Counter {
        async fn handle(&self, _envelope: Envelope) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn register_and_dispatch() {
        let registry = HandlerRegistry::default();
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        registry.register(EnvelopeKind::Chat, counter.clone());

        let handler = registry.get(&EnvelopeKind::Chat).unwrap();
        let envelope = Envelope::new(EnvelopeKind::Chat, "p".into(), serde_json::Value::Null);
        handler.handle(envelope).await.unwrap();
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unregistered_kind_is_none() {
        let registry = HandlerRegistry::default();
        assert!(registry.get(&EnvelopeKind::Status).is_none());
    }

    #[test]
    fn registration_replaces_previous() {
        let registry = HandlerRegistry::default();
        let a = Arc::new(Counter(AtomicUsize::new(0)));
        let b = Arc::new(Counter(AtomicUsize::new(0)));
        registry.register(EnvelopeKind::Chat, a);
        let b_dyn: Arc<dyn EnvelopeHandler> = b;
        registry.register(EnvelopeKind::Chat, b_dyn.clone());

        // Only one handler per kind; the latest registration wins.
        let got = registry.get(&EnvelopeKind::Chat).unwrap();
        assert!(Arc::ptr_eq(&got, &b_dyn));
    }
}
