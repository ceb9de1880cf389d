//! The reconciliation state machine.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use fleetbook_core::error::{AppError, ErrorKind};
use fleetbook_core::events::{BookingEvent, DomainEvent};
use fleetbook_core::result::AppResult;
use fleetbook_core::traits::EventSink;
use fleetbook_database::store::BookingStore;
use fleetbook_entity::booking::{Booking, BookingState};
use fleetbook_entity::payment::PaymentNotice;

use crate::reservation::ReservationService;

/// Applies verified payment notifications to the booking store.
///
/// Notices arrive at-least-once and in any order relative to hold expiry,
/// so every path here must be safe to replay. The decision ladder:
///
/// 1. A booking already carries this payment reference — the notice was
///    applied once before, so this delivery is a duplicate and nothing
///    happens. This holds in every state: a holder who cancelled after
///    the confirmation freed the window on purpose, and a replayed
///    notice must not re-book it.
/// 2. The correlation token resolves to a live pending hold — confirm it
///    in place with a conditional transition.
/// 3. Otherwise the hold is gone (expired, cancelled, or never existed) —
///    the payment is still real money, so rebook the window directly,
///    ignoring the dead hold's own interval in the overlap check.
/// 4. Rebooking loses to a competing confirmed booking — escalate: emit a
///    compensation event and surface a reconciliation failure.
#[derive(Clone)]
pub struct ReconciliationService {
    store: Arc<dyn BookingStore>,
    reservations: ReservationService,
    events: Arc<dyn EventSink>,
}

impl ReconciliationService {
    /// Creates a new reconciliation service.
    pub fn new(
        store: Arc<dyn BookingStore>,
        reservations: ReservationService,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            store,
            reservations,
            events,
        }
    }

    /// Apply one payment notice. Idempotent under redelivery.
    pub async fn apply(&self, notice: PaymentNotice) -> AppResult<Booking> {
        // Duplicate guard: a replayed notice whose first delivery already
        // landed on a booking (on the hold or via rebooking). Any state
        // counts; payment_ref survives cancellation.
        if let Some(existing) = self.store.find_by_payment_ref(&notice.payment_ref).await? {
            debug!(
                booking_id = %existing.id,
                payment_ref = %notice.payment_ref,
                "Duplicate payment notice, already reconciled"
            );
            return Ok(existing);
        }

        if let Some(token) = notice.correlation_id {
            if let Some(hold) = self.store.find_by_correlation(token).await? {
                match hold.state {
                    BookingState::Pending => {
                        match self
                            .reservations
                            .confirm_hold(hold.id, &notice.payment_ref)
                            .await
                        {
                            Ok(confirmed) => {
                                info!(
                                    booking_id = %confirmed.id,
                                    payment_ref = %notice.payment_ref,
                                    "Reconciled payment onto pending hold"
                                );
                                return Ok(confirmed);
                            }
                            // The hold moved between our read and the
                            // write; re-read and re-decide.
                            Err(e) if e.is_kind(ErrorKind::StaleState) => {
                                let current =
                                    self.store.find_by_id(hold.id).await?.ok_or_else(|| {
                                        AppError::internal(format!(
                                            "Booking {} vanished during reconciliation",
                                            hold.id
                                        ))
                                    })?;
                                if current.state == BookingState::Confirmed {
                                    return Ok(current);
                                }
                                // Lost to the reaper or a cancellation.
                            }
                            Err(e) => return Err(e),
                        }
                    }
                    // Replay of a notice that already confirmed this hold.
                    BookingState::Confirmed => return Ok(hold),
                    BookingState::Cancelled | BookingState::Expired => {
                        debug!(
                            booking_id = %hold.id,
                            state = %hold.state,
                            "Hold is dead, attempting direct rebooking"
                        );
                    }
                }
            } else {
                warn!(
                    correlation_id = %token,
                    "Payment notice carries an unknown correlation token"
                );
            }
        }

        self.rebook(&notice).await
    }

    /// The hold is unusable but the payment succeeded: book the window
    /// fresh, or escalate if the slot was taken in the meantime.
    async fn rebook(&self, notice: &PaymentNotice) -> AppResult<Booking> {
        match self
            .reservations
            .confirm_direct(
                notice.asset_id,
                notice.holder_id,
                notice.start_at,
                notice.end_at,
                Some(notice.payment_ref.clone()),
                notice.correlation_id,
            )
            .await
        {
            Ok(booking) => {
                info!(
                    booking_id = %booking.id,
                    payment_ref = %notice.payment_ref,
                    "Rebooked paid window after hold loss"
                );
                Ok(booking)
            }
            Err(e) if e.is_kind(ErrorKind::SlotUnavailable) => {
                // Two deliveries of the same notice can both pass the
                // duplicate guard before either inserts; the loser must
                // recognize its twin's booking instead of escalating.
                if let Some(twin) = self.store.find_by_payment_ref(&notice.payment_ref).await? {
                    debug!(
                        booking_id = %twin.id,
                        payment_ref = %notice.payment_ref,
                        "Concurrent delivery already rebooked this payment"
                    );
                    return Ok(twin);
                }
                error!(
                    asset_id = %notice.asset_id,
                    holder_id = %notice.holder_id,
                    payment_ref = %notice.payment_ref,
                    amount_minor = notice.amount_minor,
                    currency = %notice.currency,
                    "Paid reservation lost its slot, escalating for compensation"
                );
                self.events
                    .emit(DomainEvent::new(BookingEvent::ReconciliationFailed {
                        correlation_id: notice.correlation_id,
                        holder_id: notice.holder_id,
                        asset_id: notice.asset_id,
                        start_at: notice.start_at,
                        end_at: notice.end_at,
                        payment_ref: notice.payment_ref.clone(),
                    }))
                    .await;
                Err(AppError::reconciliation_failure(format!(
                    "Payment {} succeeded but the slot is no longer available",
                    notice.payment_ref
                )))
            }
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for ReconciliationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconciliationService").finish()
    }
}
