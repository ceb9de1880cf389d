//! Booking entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use fleetbook_core::types::{AssetId, BookingId, CorrelationId, HolderId};

use super::state::BookingState;

/// A booking: one time interval reserving one asset for one holder.
///
/// Created `pending` by the reservation engine while payment is in flight
/// (or created directly `confirmed` by the reconciler when no hold preceded
/// the payment), then moved exactly once to a terminal-or-confirmed state.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    /// Unique booking identifier, immutable.
    pub id: BookingId,
    /// The rentable asset this interval reserves.
    pub asset_id: AssetId,
    /// The party who requested the interval.
    pub holder_id: HolderId,
    /// Start of the reserved window (inclusive).
    pub start_at: DateTime<Utc>,
    /// End of the reserved window (exclusive).
    pub end_at: DateTime<Utc>,
    /// Lifecycle state.
    pub state: BookingState,
    /// Token handed to the payment provider and echoed back in its
    /// notification. Present for hold-path bookings, absent for bookings
    /// created directly from a confirmed payment.
    pub correlation_id: Option<CorrelationId>,
    /// Payment provider reference, set once payment is confirmed.
    pub payment_ref: Option<String>,
    /// Instant after which a pending hold is no longer honored. Cleared on
    /// confirmation; confirmed bookings never expire.
    pub expires_at: Option<DateTime<Utc>>,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
    /// When the booking was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Whether this booking currently blocks its slot.
    pub fn blocks_slot(&self) -> bool {
        self.state.blocks_slot()
    }

    /// Whether this booking is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Half-open interval overlap: `[self.start_at, self.end_at)`
    /// intersects `[start, end)`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_at < end && start < self.end_at
    }

    /// Whether a pending hold's expiry has passed at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.state, BookingState::Pending)
            && self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Data required to insert a new booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    /// The asset to reserve.
    pub asset_id: AssetId,
    /// The requesting holder.
    pub holder_id: HolderId,
    /// Start of the window (inclusive).
    pub start_at: DateTime<Utc>,
    /// End of the window (exclusive).
    pub end_at: DateTime<Utc>,
    /// Initial state: `pending` for holds, `confirmed` for direct
    /// confirmations.
    pub state: BookingState,
    /// Correlation token for the payment round-trip (hold path only).
    pub correlation_id: Option<CorrelationId>,
    /// Payment reference (direct confirmation path only).
    pub payment_ref: Option<String>,
    /// Hold expiry (pending holds only).
    pub expires_at: Option<DateTime<Utc>>,
}

/// Field updates applied together with a conditional state transition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateChange {
    /// Payment reference to record, if any.
    pub payment_ref: Option<String>,
    /// Clear the hold expiry (set on confirmation: confirmed bookings are
    /// never reaped).
    pub clear_expiry: bool,
}

impl StateChange {
    /// No field changes beyond the state itself.
    pub fn none() -> Self {
        Self::default()
    }

    /// The confirmation change: record the payment and stop the expiry
    /// clock.
    pub fn confirm(payment_ref: impl Into<String>) -> Self {
        Self {
            payment_ref: Some(payment_ref.into()),
            clear_expiry: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn booking(start_h: u32, end_h: u32, state: BookingState) -> Booking {
        let start_at = Utc.with_ymd_and_hms(2026, 3, 1, start_h, 0, 0).unwrap();
        let end_at = Utc.with_ymd_and_hms(2026, 3, 1, end_h, 0, 0).unwrap();
        Booking {
            id: BookingId::new(),
            asset_id: AssetId::new(),
            holder_id: HolderId::new(),
            start_at,
            end_at,
            state,
            correlation_id: Some(CorrelationId::new()),
            payment_ref: None,
            expires_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_overlap_half_open() {
        let b = booking(10, 12, BookingState::Pending);
        let day = |h| Utc.with_ymd_and_hms(2026, 3, 1, h, 0, 0).unwrap();

        // Back-to-back intervals share an endpoint but do not overlap.
        assert!(!b.overlaps(day(12), day(14)));
        assert!(!b.overlaps(day(8), day(10)));

        assert!(b.overlaps(day(11), day(13)));
        assert!(b.overlaps(day(9), day(11)));
        assert!(b.overlaps(day(10), day(12)));
        assert!(b.overlaps(day(9), day(14)));
    }

    #[test]
    fn test_expiry_check_only_applies_to_pending() {
        let now = Utc::now();
        let mut b = booking(10, 12, BookingState::Pending);
        b.expires_at = Some(now - chrono::Duration::seconds(1));
        assert!(b.is_expired_at(now));

        b.state = BookingState::Confirmed;
        assert!(!b.is_expired_at(now));
    }

    #[test]
    fn test_confirm_change_clears_expiry() {
        let change = StateChange::confirm("pay_123");
        assert_eq!(change.payment_ref.as_deref(), Some("pay_123"));
        assert!(change.clear_expiry);
        assert!(!StateChange::none().clear_expiry);
    }
}
