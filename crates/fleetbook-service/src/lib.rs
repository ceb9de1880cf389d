//! # fleetbook-service
//!
//! Business logic for Fleetbook: the reservation engine (holds, direct
//! confirmations, cancellation, availability), the payment reconciler,
//! and the outbound event sink.

pub mod notification;
pub mod reconcile;
pub mod reservation;

#[cfg(test)]
pub(crate) mod test_support;

pub use notification::ChannelEventSink;
pub use reconcile::ReconciliationService;
pub use reservation::ReservationService;
