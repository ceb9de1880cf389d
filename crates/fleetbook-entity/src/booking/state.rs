//! Booking lifecycle states.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a booking interval.
///
/// `pending → confirmed | cancelled | expired`, `confirmed → cancelled`;
/// `cancelled` and `expired` are terminal and nothing ever returns to
/// `pending`. Terminal rows are kept as immutable audit records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "booking_state", rename_all = "lowercase")]
pub enum BookingState {
    /// A hold: the slot is blocked while payment is in flight.
    Pending,
    /// Payment verified (or staff-confirmed); the slot is booked.
    Confirmed,
    /// Withdrawn by the holder; the slot is freed.
    Cancelled,
    /// Reclaimed by the reaper after the hold's expiry passed unpaid.
    Expired,
}

impl BookingState {
    /// States that participate in the non-overlap constraint. Bookings in
    /// any other state have freed their slot.
    pub const BLOCKING: [BookingState; 2] = [BookingState::Pending, BookingState::Confirmed];

    /// Whether a booking in this state blocks its time slot.
    pub fn blocks_slot(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Whether this state is terminal (the record is immutable).
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Expired)
    }

    /// Whether the state machine allows a transition to `to`.
    pub fn can_transition_to(self, to: BookingState) -> bool {
        match (self, to) {
            (Self::Pending, Self::Confirmed)
            | (Self::Pending, Self::Cancelled)
            | (Self::Pending, Self::Expired)
            | (Self::Confirmed, Self::Cancelled) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for BookingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_transitions() {
        assert!(BookingState::Pending.can_transition_to(BookingState::Confirmed));
        assert!(BookingState::Pending.can_transition_to(BookingState::Cancelled));
        assert!(BookingState::Pending.can_transition_to(BookingState::Expired));
    }

    #[test]
    fn test_confirmed_only_cancellable() {
        assert!(BookingState::Confirmed.can_transition_to(BookingState::Cancelled));
        assert!(!BookingState::Confirmed.can_transition_to(BookingState::Expired));
        assert!(!BookingState::Confirmed.can_transition_to(BookingState::Pending));
    }

    #[test]
    fn test_terminal_states_immutable() {
        for terminal in [BookingState::Cancelled, BookingState::Expired] {
            for to in [
                BookingState::Pending,
                BookingState::Confirmed,
                BookingState::Cancelled,
                BookingState::Expired,
            ] {
                assert!(!terminal.can_transition_to(to));
            }
            assert!(terminal.is_terminal());
            assert!(!terminal.blocks_slot());
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&BookingState::Confirmed).expect("serialize");
        assert_eq!(json, "\"confirmed\"");
    }
}
