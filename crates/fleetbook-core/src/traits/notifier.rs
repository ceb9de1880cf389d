//! Outbound event emission seam.

use async_trait::async_trait;

use crate::events::DomainEvent;

/// Sink for domain events headed to asynchronous delivery (email
/// notifications, compensation workflow).
///
/// Events are emitted after the corresponding state transition has
/// committed. Implementations must absorb their own delivery failures:
/// emission is fire-and-forget from the caller's side and can never roll
/// back or fail a booking operation.
#[async_trait]
pub trait EventSink: Send + Sync + 'static {
    /// Hand off an event for asynchronous delivery.
    async fn emit(&self, event: DomainEvent);
}
