//! PostgreSQL booking store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use fleetbook_core::error::{AppError, ErrorKind};
use fleetbook_core::result::AppResult;
use fleetbook_core::types::{AssetId, BookingId, CorrelationId, HolderId};
use fleetbook_entity::booking::{Booking, BookingState, NewBooking, StateChange};

use super::BookingStore;

/// Booking store backed by PostgreSQL.
///
/// `insert` serializes writers per asset with a transaction-scoped
/// advisory lock taken before the overlap check, making
/// check-then-insert a single atomic unit without locking unrelated
/// assets against each other. `transition` is a conditional `UPDATE`
/// keyed on the expected prior state.
#[derive(Debug, Clone)]
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    /// Create a new PostgreSQL booking store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx error, surfacing pool exhaustion as a retryable failure.
fn map_db_err(context: &str, e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::PoolTimedOut => AppError::with_source(
            ErrorKind::Unavailable,
            format!("{context}: store timed out"),
            e,
        ),
        e => AppError::with_source(ErrorKind::Database, context.to_string(), e),
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn find_by_id(&self, id: BookingId) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_err("Failed to find booking", e))
    }

    async fn find_by_correlation(&self, token: CorrelationId) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE correlation_id = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_err("Failed to find booking by correlation token", e))
    }

    async fn find_by_payment_ref(&self, payment_ref: &str) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE payment_ref = $1 LIMIT 1",
        )
        .bind(payment_ref)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_err("Failed to find booking by payment reference", e))
    }

    async fn find_by_holder(&self, holder_id: HolderId) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE holder_id = $1 ORDER BY created_at DESC",
        )
        .bind(holder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_err("Failed to list holder bookings", e))
    }

    async fn find_overlapping(
        &self,
        asset_id: AssetId,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        states: &[BookingState],
    ) -> AppResult<Vec<Booking>> {
        let states: Vec<String> = states.iter().map(|s| s.to_string()).collect();

        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings \
             WHERE asset_id = $1 AND start_at < $3 AND end_at > $2 \
             AND state::text = ANY($4) \
             ORDER BY start_at ASC",
        )
        .bind(asset_id)
        .bind(start_at)
        .bind(end_at)
        .bind(&states)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_err("Failed to query overlapping bookings", e))
    }

    async fn insert(
        &self,
        booking: NewBooking,
        ignore_correlation: Option<CorrelationId>,
    ) -> AppResult<Booking> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_db_err("Failed to begin booking transaction", e))?;

        // Serialize all writers for this asset until commit; holds for
        // other assets proceed in parallel.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
            .bind(booking.asset_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_err("Failed to acquire asset lock", e))?;

        let conflict = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings \
             WHERE asset_id = $1 AND start_at < $3 AND end_at > $2 \
             AND state IN ('pending', 'confirmed') \
             AND ($4::uuid IS NULL OR correlation_id IS DISTINCT FROM $4) \
             LIMIT 1",
        )
        .bind(booking.asset_id)
        .bind(booking.start_at)
        .bind(booking.end_at)
        .bind(ignore_correlation)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_db_err("Failed to check for overlapping bookings", e))?;

        if let Some(existing) = conflict {
            return Err(AppError::slot_unavailable(format!(
                "Asset {} already {} for an overlapping window",
                booking.asset_id, existing.state
            )));
        }

        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings \
             (id, asset_id, holder_id, start_at, end_at, state, correlation_id, payment_ref, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(BookingId::new())
        .bind(booking.asset_id)
        .bind(booking.holder_id)
        .bind(booking.start_at)
        .bind(booking.end_at)
        .bind(booking.state)
        .bind(booking.correlation_id)
        .bind(booking.payment_ref)
        .bind(booking.expires_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_db_err("Failed to insert booking", e))?;

        tx.commit()
            .await
            .map_err(|e| map_db_err("Failed to commit booking", e))?;

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

        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET \
             state = $3, \
             payment_ref = COALESCE($4, payment_ref), \
             expires_at = CASE WHEN $5 THEN NULL ELSE expires_at END, \
             updated_at = NOW() \
             WHERE id = $1 AND state = $2 \
             RETURNING *",
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(change.payment_ref)
        .bind(change.clear_expiry)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_err("Failed to transition booking", e))?;

        match updated {
            Some(booking) => Ok(booking),
            None => match self.find_by_id(id).await? {
                Some(current) => Err(AppError::stale_state(format!(
                    "Booking {id} is {}, expected {from}",
                    current.state
                ))),
                None => Err(AppError::not_found(format!("Booking {id} not found"))),
            },
        }
    }

    async fn find_expired_pending(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings \
             WHERE state = 'pending' AND expires_at IS NOT NULL AND expires_at <= $1 \
             ORDER BY expires_at ASC LIMIT $2",
        )
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_err("Failed to scan expired holds", e))
    }
}
