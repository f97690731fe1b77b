//! The bounded event bus feeding consumers.
//!
//! A single FIFO queue (capacity set by `AppConfig::event_queue_size`)
//! shared by all producers: the discovery path, the room controller,
//! and the inbound chat handler. Producers block when the queue is
//! full; events are never dropped. Closing the sink ends the stream
//! so consumers observe a clean end-of-events.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use lanchat_types::Event;

/// Cloneable producer half of the event bus.
///
/// All clones share one underlying sender, so [`close`](Self::close)
/// on any clone ends the stream for the consumer once in-flight sends
/// finish.
#[derive(Clone)]
pub(crate) struct EventSink {
    tx: Arc<Mutex<Option<mpsc::Sender<Event>>>>,
}

impl EventSink {
    /// Creates the sink and its consumer receiver.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            Self {
                tx: Arc::new(Mutex::new(Some(tx))),
            },
            rx,
        )
    }

    /// Enqueues one event, blocking while the queue is full.
    ///
    /// After [`close`](Self::close) this is a no-op.
    pub async fn emit(&self, event: Event) {
        let tx = match self.tx.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => None,
        };
        if let Some(tx) = tx {
            if tx.send(event).await.is_err() {
                tracing::debug!("event receiver dropped; event discarded");
            }
        }
    }

    /// Ends the event stream.
    pub fn close(&self) {
        if let Ok(mut guard) = self.tx.lock() {
            guard.take();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_arrive_in_fifo_order() {
        let (sink, mut rx) = EventSink::new(100);

        for i in 0..10 {
            sink.emit(Event::SystemMessage(format!("msg {i}"))).await;
        }

        for i in 0..10 {
            match rx.recv().await {
                Some(Event::SystemMessage(text)) => assert_eq!(text, format!("msg {i}")),
                other => panic!("unexpected event: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn fifo_holds_across_producers() {
        let (sink, mut rx) = EventSink::new(100);

        // Two producers taking strict turns; arrival order is the
        // emission order regardless of which clone sent what.
        let a = sink.clone();
        let b = sink.clone();
        for i in 0..5 {
            a.emit(Event::SystemMessage(format!("a{i}"))).await;
            b.emit(Event::SystemMessage(format!("b{i}"))).await;
        }

        let mut received = Vec::new();
        for _ in 0..10 {
            if let Some(Event::SystemMessage(text)) = rx.recv().await {
                received.push(text);
            }
        }
        let expected: Vec<String> = (0..5)
            .flat_map(|i| [format!("a{i}"), format!("b{i}")])
            .collect();
        assert_eq!(received, expected);
    }

    #[tokio::test]
    async fn close_ends_the_stream() {
        let (sink, mut rx) = EventSink::new(4);

        sink.emit(Event::SystemMessage("last".into())).await;
        sink.close();

        assert!(matches!(rx.recv().await, Some(Event::SystemMessage(_))));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn emit_after_close_is_noop() {
        let (sink, mut rx) = EventSink::new(4);
        sink.close();
        sink.emit(Event::SystemMessage("late".into())).await;
        assert!(rx.recv().await.is_none());
    }
}
