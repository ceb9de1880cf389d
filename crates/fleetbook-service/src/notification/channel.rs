//! In-process event fan-out over an unbounded channel.

use tokio::sync::mpsc;
use tracing::warn;

use fleetbook_core::events::DomainEvent;
use fleetbook_core::traits::EventSink;

/// Event sink backed by a tokio mpsc channel.
///
/// Producers never block and never fail: if the receiving side has gone
/// away the event is logged and dropped. Booking state transitions must
/// not depend on delivery.
pub struct ChannelEventSink {
    tx: mpsc::UnboundedSender<DomainEvent>,
}

impl ChannelEventSink {
    /// Creates a sink and the receiver that drains it.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DomainEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait::async_trait]
impl EventSink for ChannelEventSink {
    async fn emit(&self, event: DomainEvent) {
        if let Err(e) = self.tx.send(event) {
            warn!(event_id = %e.0.id, "Event receiver is gone, dropping event");
        }
    }
}
