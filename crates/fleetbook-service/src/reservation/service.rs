//! Reservation engine.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use fleetbook_core::config::booking::BookingConfig;
use fleetbook_core::error::AppError;
use fleetbook_core::events::{BookingEvent, DomainEvent};
use fleetbook_core::result::AppResult;
use fleetbook_core::traits::EventSink;
use fleetbook_core::types::{AssetId, BookingId, CorrelationId, HolderId};
use fleetbook_database::store::BookingStore;
use fleetbook_entity::booking::{Booking, BookingState, NewBooking, StateChange};

/// Creates and cancels holds, enforces the non-overlap invariant, and
/// assigns hold expiries.
///
/// Never locks in-process: atomicity for the overlap-check-then-insert
/// sequence lives in the store, so any number of engine instances can run
/// against the same store concurrently.
#[derive(Clone)]
pub struct ReservationService {
    /// Booking store.
    store: Arc<dyn BookingStore>,
    /// Outbound event sink.
    events: Arc<dyn EventSink>,
    /// Engine settings.
    config: BookingConfig,
}

impl ReservationService {
    /// Creates a new reservation service.
    pub fn new(
        store: Arc<dyn BookingStore>,
        events: Arc<dyn EventSink>,
        config: BookingConfig,
    ) -> Self {
        Self {
            store,
            events,
            config,
        }
    }

    fn validate_window(&self, start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> AppResult<()> {
        if start_at >= end_at {
            return Err(AppError::validation(
                "Booking window must start before it ends",
            ));
        }
        if end_at - start_at > Duration::days(self.config.max_window_days) {
            return Err(AppError::validation(format!(
                "Booking window exceeds the {} day maximum",
                self.config.max_window_days
            )));
        }
        Ok(())
    }

    /// Place a provisional hold on a slot while the holder completes
    /// payment.
    ///
    /// Returns the created pending booking; callers attach its
    /// `correlation_id` to the payment request they raise next, so the
    /// provider's notification can find its way back.
    pub async fn create_hold(
        &self,
        asset_id: AssetId,
        holder_id: HolderId,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        ttl: Duration,
    ) -> AppResult<Booking> {
        self.validate_window(start_at, end_at)?;
        if ttl <= Duration::zero() {
            return Err(AppError::validation("Hold TTL must be positive"));
        }

        let booking = self
            .store
            .insert(
                NewBooking {
                    asset_id,
                    holder_id,
                    start_at,
                    end_at,
                    state: BookingState::Pending,
                    correlation_id: Some(CorrelationId::new()),
                    payment_ref: None,
                    expires_at: Some(Utc::now() + ttl),
                },
                None,
            )
            .await?;

        info!(
            booking_id = %booking.id,
            asset_id = %asset_id,
            holder_id = %holder_id,
            expires_at = ?booking.expires_at,
            "Created pending hold"
        );
        Ok(booking)
    }

    /// Commit a booking directly in the confirmed state, bypassing the
    /// hold phase.
    ///
    /// Used for staff-created bookings and by the reconciler when a
    /// payment notification arrives with no usable hold. Runs the same
    /// atomic overlap check as `create_hold`; `ignore_correlation`
    /// excludes the notification's own leftover hold from the check. A
    /// `SlotUnavailable` here is a genuine business conflict, not a
    /// retryable error.
    pub async fn confirm_direct(
        &self,
        asset_id: AssetId,
        holder_id: HolderId,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        payment_ref: Option<String>,
        ignore_correlation: Option<CorrelationId>,
    ) -> AppResult<Booking> {
        self.validate_window(start_at, end_at)?;

        let booking = self
            .store
            .insert(
                NewBooking {
                    asset_id,
                    holder_id,
                    start_at,
                    end_at,
                    state: BookingState::Confirmed,
                    correlation_id: None,
                    payment_ref: payment_ref.clone(),
                    expires_at: None,
                },
                ignore_correlation,
            )
            .await?;

        info!(
            booking_id = %booking.id,
            asset_id = %asset_id,
            holder_id = %holder_id,
            "Created confirmed booking"
        );

        self.events
            .emit(DomainEvent::new(BookingEvent::BookingConfirmed {
                booking_id: booking.id,
                holder_id,
                asset_id,
                start_at,
                end_at,
                payment_ref,
            }))
            .await;

        Ok(booking)
    }

    /// Confirm an existing pending hold in place.
    ///
    /// The conditional transition is the race arbiter against the reaper:
    /// exactly one of confirm and expire can win.
    pub async fn confirm_hold(
        &self,
        booking_id: BookingId,
        payment_ref: &str,
    ) -> AppResult<Booking> {
        let booking = self
            .store
            .transition(
                booking_id,
                BookingState::Pending,
                BookingState::Confirmed,
                StateChange::confirm(payment_ref),
            )
            .await?;

        info!(booking_id = %booking.id, "Confirmed pending hold");

        self.events
            .emit(DomainEvent::new(BookingEvent::BookingConfirmed {
                booking_id: booking.id,
                holder_id: booking.holder_id,
                asset_id: booking.asset_id,
                start_at: booking.start_at,
                end_at: booking.end_at,
                payment_ref: booking.payment_ref.clone(),
            }))
            .await;

        Ok(booking)
    }

    /// Cancel a pending or confirmed booking, freeing its slot.
    ///
    /// Only the booking's own holder may cancel it.
    pub async fn cancel(&self, booking_id: BookingId, holder_id: HolderId) -> AppResult<Booking> {
        let booking = self
            .store
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {booking_id} not found")))?;

        if booking.holder_id != holder_id {
            return Err(AppError::forbidden(
                "Booking belongs to a different holder",
            ));
        }
        if booking.is_terminal() {
            return Err(AppError::validation(format!(
                "Booking {booking_id} is already {}",
                booking.state
            )));
        }

        let cancelled = match self
            .store
            .transition(
                booking_id,
                booking.state,
                BookingState::Cancelled,
                StateChange::none(),
            )
            .await
        {
            Ok(b) => b,
            // Lost a race with the reaper or reconciler between the read
            // and the write; report whatever the booking became.
            Err(e) if e.is_kind(fleetbook_core::error::ErrorKind::StaleState) => {
                let current = self.store.find_by_id(booking_id).await?.ok_or_else(|| {
                    AppError::not_found(format!("Booking {booking_id} not found"))
                })?;
                return Err(AppError::validation(format!(
                    "Booking {booking_id} is already {}",
                    current.state
                )));
            }
            Err(e) => return Err(e),
        };

        info!(booking_id = %booking_id, holder_id = %holder_id, "Cancelled booking");

        self.events
            .emit(DomainEvent::new(BookingEvent::BookingCancelled {
                booking_id: cancelled.id,
                holder_id: cancelled.holder_id,
                asset_id: cancelled.asset_id,
                start_at: cancelled.start_at,
                end_at: cancelled.end_at,
            }))
            .await;

        Ok(cancelled)
    }

    /// Bookings currently blocking the queried window. Empty means the
    /// slot is free.
    pub async fn availability(
        &self,
        asset_id: AssetId,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>> {
        self.validate_window(start_at, end_at)?;
        let conflicts = self
            .store
            .find_overlapping(asset_id, start_at, end_at, &BookingState::BLOCKING)
            .await?;
        debug!(
            asset_id = %asset_id,
            conflicts = conflicts.len(),
            "Availability query"
        );
        Ok(conflicts)
    }

    /// List a holder's bookings, newest first.
    pub async fn holder_bookings(&self, holder_id: HolderId) -> AppResult<Vec<Booking>> {
        self.store.find_by_holder(holder_id).await
    }
}

impl std::fmt::Debug for ReservationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationService").finish()
    }
}
