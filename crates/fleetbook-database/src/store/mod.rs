//! The booking store: durable interval records with an overlap-query
//! primitive and conditional writes.
//!
//! The engine, reconciler, and reaper run as independent concurrent
//! writers with no shared in-process lock; every correctness guarantee
//! lives behind this trait. Two operations carry the weight:
//!
//! - [`BookingStore::insert`] executes the overlap check and the insert as
//!   one atomic unit per asset, so two simultaneous holds on overlapping
//!   windows can never both commit.
//! - [`BookingStore::transition`] is a compare-and-swap on the stored
//!   state, which makes racing writers (reaper vs. reconciler) commutative:
//!   whichever commits first wins and the loser observes `StaleState`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use fleetbook_core::result::AppResult;
use fleetbook_core::types::{AssetId, BookingId, CorrelationId, HolderId};
use fleetbook_entity::booking::{Booking, BookingState, NewBooking, StateChange};

pub use memory::MemoryBookingStore;
pub use postgres::PgBookingStore;

/// Storage abstraction for booking intervals.
#[async_trait]
pub trait BookingStore: Send + Sync + 'static {
    /// Find a booking by its primary key.
    async fn find_by_id(&self, id: BookingId) -> AppResult<Option<Booking>>;

    /// Find the booking carrying the given correlation token. At most one
    /// booking ever holds a token.
    async fn find_by_correlation(&self, token: CorrelationId) -> AppResult<Option<Booking>>;

    /// Find the booking recorded against a payment reference, in any
    /// state. The reconciler's duplicate-notification guard: a row
    /// carrying the reference means the notice was applied once already,
    /// even if the holder has since cancelled the booking.
    async fn find_by_payment_ref(&self, payment_ref: &str) -> AppResult<Option<Booking>>;

    /// List a holder's bookings, newest first.
    async fn find_by_holder(&self, holder_id: HolderId) -> AppResult<Vec<Booking>>;

    /// Bookings for `asset_id` whose `[start_at, end_at)` intersects the
    /// query window and whose state is one of `states`.
    async fn find_overlapping(
        &self,
        asset_id: AssetId,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        states: &[BookingState],
    ) -> AppResult<Vec<Booking>>;

    /// Atomically check for blocking overlaps and insert.
    ///
    /// Fails with `SlotUnavailable` when a pending or confirmed booking
    /// already intersects the window. `ignore_correlation` excludes the
    /// caller's own pending hold from the check, so a late confirmation
    /// can rebook the slot its expired-or-stale hold still occupies.
    async fn insert(
        &self,
        booking: NewBooking,
        ignore_correlation: Option<CorrelationId>,
    ) -> AppResult<Booking>;

    /// Conditionally transition `id` from `from` to `to`, applying
    /// `change` in the same write.
    ///
    /// Fails with `NotFound` when the booking does not exist and with
    /// `StaleState` when its stored state is not `from` (the optimistic
    /// guard against double-processing).
    async fn transition(
        &self,
        id: BookingId,
        from: BookingState,
        to: BookingState,
        change: StateChange,
    ) -> AppResult<Booking>;

    /// Pending holds whose expiry has passed at `now`, oldest expiry
    /// first, capped at `limit`. The reaper's scan.
    async fn find_expired_pending(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<Booking>>;
}
