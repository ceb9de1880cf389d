//! Booking-related domain events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AssetId, BookingId, CorrelationId, HolderId};

/// Events related to booking lifecycle transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BookingEvent {
    /// A booking was confirmed by a verified payment (or a direct
    /// non-payment confirmation).
    BookingConfirmed {
        /// The booking ID.
        booking_id: BookingId,
        /// The holder the slot belongs to.
        holder_id: HolderId,
        /// The reserved asset.
        asset_id: AssetId,
        /// Start of the reserved window.
        start_at: DateTime<Utc>,
        /// End of the reserved window.
        end_at: DateTime<Utc>,
        /// Payment provider reference, when payment backed the confirmation.
        payment_ref: Option<String>,
    },
    /// A booking was cancelled by its holder.
    BookingCancelled {
        /// The booking ID.
        booking_id: BookingId,
        /// The holder who cancelled.
        holder_id: HolderId,
        /// The freed asset.
        asset_id: AssetId,
        /// Start of the freed window.
        start_at: DateTime<Utc>,
        /// End of the freed window.
        end_at: DateTime<Utc>,
    },
    /// Payment succeeded but the slot is now occupied by another holder.
    /// Consumed by the compensation workflow (refund initiation); a paid
    /// reservation that lost its slot is escalated here, never dropped.
    ReconciliationFailed {
        /// The correlation token from the payment notification, if any.
        correlation_id: Option<CorrelationId>,
        /// The holder who paid.
        holder_id: HolderId,
        /// The contested asset.
        asset_id: AssetId,
        /// Start of the paid-for window.
        start_at: DateTime<Utc>,
        /// End of the paid-for window.
        end_at: DateTime<Utc>,
        /// Payment provider reference for the refund.
        payment_ref: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_event_tag_serialization() {
        let event = BookingEvent::BookingCancelled {
            booking_id: BookingId::new(),
            holder_id: HolderId::new(),
            asset_id: AssetId::new(),
            start_at: Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap(),
            end_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["event"], "booking_cancelled");
    }
}
