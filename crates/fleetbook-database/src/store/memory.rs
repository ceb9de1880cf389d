//! In-memory booking store for single-node deployments and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use fleetbook_core::error::AppError;
use fleetbook_core::result::AppResult;
use fleetbook_core::types::{AssetId, BookingId, CorrelationId, HolderId};
use fleetbook_entity::booking::{Booking, BookingState, NewBooking, StateChange};

use super::BookingStore;

/// In-memory booking store.
///
/// One mutex guards the whole map, so the overlap check and the insert
/// execute inside a single critical section — the same atomicity the
/// PostgreSQL store gets from its per-asset advisory lock.
#[derive(Debug, Default)]
pub struct MemoryBookingStore {
    bookings: Mutex<HashMap<BookingId, Booking>>,
}

impl MemoryBookingStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn find_by_id(&self, id: BookingId) -> AppResult<Option<Booking>> {
        Ok(self.bookings.lock().await.get(&id).cloned())
    }

    async fn find_by_correlation(&self, token: CorrelationId) -> AppResult<Option<Booking>> {
        Ok(self
            .bookings
            .lock()
            .await
            .values()
            .find(|b| b.correlation_id == Some(token))
            .cloned())
    }

    async fn find_by_payment_ref(&self, payment_ref: &str) -> AppResult<Option<Booking>> {
        Ok(self
            .bookings
            .lock()
            .await
            .values()
            .find(|b| b.payment_ref.as_deref() == Some(payment_ref))
            .cloned())
    }

    async fn find_by_holder(&self, holder_id: HolderId) -> AppResult<Vec<Booking>> {
        let mut rows: Vec<Booking> = self
            .bookings
            .lock()
            .await
            .values()
            .filter(|b| b.holder_id == holder_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find_overlapping(
        &self,
        asset_id: AssetId,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        states: &[BookingState],
    ) -> AppResult<Vec<Booking>> {
        let mut rows: Vec<Booking> = self
            .bookings
            .lock()
            .await
            .values()
            .filter(|b| {
                b.asset_id == asset_id
                    && b.overlaps(start_at, end_at)
                    && states.contains(&b.state)
            })
            .cloned()
            .collect();
        rows.sort_by_key(|b| b.start_at);
        Ok(rows)
    }

    async fn insert(
        &self,
        booking: NewBooking,
        ignore_correlation: Option<CorrelationId>,
    ) -> AppResult<Booking> {
        let mut bookings = self.bookings.lock().await;

        let conflict = bookings.values().find(|b| {
            b.asset_id == booking.asset_id
                && b.blocks_slot()
                && b.overlaps(booking.start_at, booking.end_at)
                && (ignore_correlation.is_none() || b.correlation_id != ignore_correlation)
        });

        if let Some(existing) = conflict {
            return Err(AppError::slot_unavailable(format!(
                "Asset {} already {} for an overlapping window",
                booking.asset_id, existing.state
            )));
        }

        let now = Utc::now();
        let created = Booking {
            id: BookingId::new(),
            asset_id: booking.asset_id,
            holder_id: booking.holder_id,
            start_at: booking.start_at,
            end_at: booking.end_at,
            state: booking.state,
            correlation_id: booking.correlation_id,
            payment_ref: booking.payment_ref,
            expires_at: booking.expires_at,
            created_at: now,
            updated_at: now,
        };
        bookings.insert(created.id, created.clone());
        Ok(created)
    }

    async fn transition(
        &self,
        id: BookingId,
        from: BookingState,
        to: BookingState,
        change: StateChange,
    ) -> AppResult<Booking> {
        if !from.can_transition_to(to) {
            return Err(AppError::validation(format!(
                "Illegal booking transition {from} -> {to}"
            )));
        }

        let mut bookings = self.bookings.lock().await;
        let booking = bookings
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Booking {id} not found")))?;

        if booking.state != from {
            return Err(AppError::stale_state(format!(
                "Booking {id} is {}, expected {from}",
                booking.state
            )));
        }

        booking.state = to;
        if change.payment_ref.is_some() {
            booking.payment_ref = change.payment_ref;
        }
        if change.clear_expiry {
            booking.expires_at = None;
        }
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }

    async fn find_expired_pending(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<Booking>> {
        let mut rows: Vec<Booking> = self
            .bookings
            .lock()
            .await
            .values()
            .filter(|b| b.is_expired_at(now))
            .cloned()
            .collect();
        rows.sort_by_key(|b| b.expires_at);
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use fleetbook_core::error::ErrorKind;

    fn window(start_h: u32, end_h: u32) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2026, 3, 1, start_h, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 1, end_h, 0, 0).unwrap(),
        )
    }

    fn pending_hold(asset_id: AssetId, start_h: u32, end_h: u32) -> NewBooking {
        let (start_at, end_at) = window(start_h, end_h);
        NewBooking {
            asset_id,
            holder_id: HolderId::new(),
            start_at,
            end_at,
            state: BookingState::Pending,
            correlation_id: Some(CorrelationId::new()),
            payment_ref: None,
            expires_at: Some(Utc::now() + Duration::minutes(30)),
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_overlap() {
        let store = MemoryBookingStore::new();
        let asset = AssetId::new();

        store.insert(pending_hold(asset, 10, 12), None).await.unwrap();
        let err = store
            .insert(pending_hold(asset, 11, 13), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::SlotUnavailable);
    }

    #[tokio::test]
    async fn test_insert_allows_adjacent_and_other_assets() {
        let store = MemoryBookingStore::new();
        let asset = AssetId::new();

        store.insert(pending_hold(asset, 10, 12), None).await.unwrap();
        // Half-open: a window starting exactly at the previous end is free.
        store.insert(pending_hold(asset, 12, 14), None).await.unwrap();
        store
            .insert(pending_hold(AssetId::new(), 10, 12), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_insert_ignores_own_correlation() {
        let store = MemoryBookingStore::new();
        let asset = AssetId::new();

        let hold = store.insert(pending_hold(asset, 10, 12), None).await.unwrap();
        let token = hold.correlation_id.unwrap();

        // Same window again: blocked by the hold unless the hold's own
        // correlation is excluded.
        let mut rebook = pending_hold(asset, 10, 12);
        rebook.state = BookingState::Confirmed;
        rebook.correlation_id = None;
        rebook.expires_at = None;
        rebook.payment_ref = Some("pay_1".to_string());

        let err = store.insert(rebook.clone(), None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::SlotUnavailable);

        let confirmed = store.insert(rebook, Some(token)).await.unwrap();
        assert_eq!(confirmed.state, BookingState::Confirmed);
    }

    #[tokio::test]
    async fn test_transition_conditional() {
        let store = MemoryBookingStore::new();
        let hold = store
            .insert(pending_hold(AssetId::new(), 10, 12), None)
            .await
            .unwrap();

        let confirmed = store
            .transition(
                hold.id,
                BookingState::Pending,
                BookingState::Confirmed,
                StateChange::confirm("pay_9"),
            )
            .await
            .unwrap();
        assert_eq!(confirmed.state, BookingState::Confirmed);
        assert_eq!(confirmed.payment_ref.as_deref(), Some("pay_9"));
        assert!(confirmed.expires_at.is_none());

        // Second identical transition observes the stale prior state.
        let err = store
            .transition(
                hold.id,
                BookingState::Pending,
                BookingState::Confirmed,
                StateChange::confirm("pay_9"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::StaleState);
    }

    #[tokio::test]
    async fn test_transition_missing_booking() {
        let store = MemoryBookingStore::new();
        let err = store
            .transition(
                BookingId::new(),
                BookingState::Pending,
                BookingState::Cancelled,
                StateChange::none(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_expired_scan_limit_and_order() {
        let store = MemoryBookingStore::new();
        let asset = AssetId::new();
        let now = Utc::now();

        for (i, hours) in [(0u32, (1u32, 2u32)), (1, (3, 4)), (2, (5, 6))] {
            let mut hold = pending_hold(asset, hours.0, hours.1);
            hold.expires_at = Some(now - Duration::minutes(10 - i as i64));
            store.insert(hold, None).await.unwrap();
        }
        // A live hold must not be scanned.
        let mut live = pending_hold(asset, 7, 8);
        live.expires_at = Some(now + Duration::minutes(30));
        store.insert(live, None).await.unwrap();

        let expired = store.find_expired_pending(now, 2).await.unwrap();
        assert_eq!(expired.len(), 2);
        assert!(expired[0].expires_at <= expired[1].expires_at);

        let all = store.find_expired_pending(now, 100).await.unwrap();
        assert_eq!(all.len(), 3);
    }
}
