//! Database migration runner.
//!
//! Embeds the migration set from `migrations/` at the workspace root:
//! the `booking_state` enum, the `bookings` interval table with its
//! window-validity check and unique correlation token, and the partial
//! indexes behind overlap queries, payment-reference lookups, and the
//! reaper's expiry scan.

use sqlx::PgPool;
use tracing::info;

use fleetbook_core::error::{AppError, ErrorKind};

/// Run all pending database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Running database migrations...");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Database migrations completed successfully");
    Ok(())
}
