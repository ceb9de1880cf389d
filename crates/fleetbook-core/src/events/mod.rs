//! Domain events emitted by Fleetbook operations.
//!
//! Events are handed to an [`crate::traits::EventSink`] after a state
//! transition commits and consumed asynchronously by the notification
//! collaborator (email delivery) and the compensation workflow. Emission is
//! decoupled from the commit: a delivery failure can never roll back a
//! booking state transition.

pub mod booking;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use booking::BookingEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The event payload.
    pub payload: BookingEvent,
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(payload: BookingEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            payload,
        }
    }
}
