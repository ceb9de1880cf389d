//! Expiry reaper — sweeps overdue pending holds into the expired state.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time;
use tracing;

use fleetbook_core::config::worker::WorkerConfig;
use fleetbook_core::error::ErrorKind;
use fleetbook_core::result::AppResult;
use fleetbook_database::store::BookingStore;
use fleetbook_entity::booking::{BookingState, StateChange};

/// Periodically scans for pending holds whose expiry has passed and
/// transitions them to expired, releasing their slots.
///
/// Every write is a conditional transition, so the reaper is safe to run
/// alongside the reconciler: a hold confirmed between the scan and the
/// write is simply skipped. Sweeps are a liveness optimization, never a
/// correctness requirement — the overlap check treats an overdue hold as
/// blocking until the sweep lands, which only ever errs on the safe side.
pub struct ExpiryReaper {
    /// Booking store to sweep.
    store: Arc<dyn BookingStore>,
    /// Reaper configuration.
    config: WorkerConfig,
}

impl ExpiryReaper {
    /// Create a new expiry reaper.
    pub fn new(store: Arc<dyn BookingStore>, config: WorkerConfig) -> Self {
        Self { store, config }
    }

    /// Run the sweep loop until the cancel signal is received.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        tracing::info!(
            "Expiry reaper started with interval={}s, batch_size={}",
            self.config.sweep_interval_seconds,
            self.config.sweep_batch_size
        );

        let interval = Duration::from_secs(self.config.sweep_interval_seconds);

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    // A dropped sender means the server is gone; treat
                    // it the same as an explicit shutdown signal.
                    if changed.is_err() || *cancel.borrow() {
                        tracing::info!("Expiry reaper received shutdown signal");
                        break;
                    }
                }
                _ = time::sleep(interval) => {
                    match self.sweep_once(Utc::now()).await {
                        Ok(0) => tracing::trace!("Sweep found no expired holds"),
                        Ok(n) => tracing::info!("Sweep expired {} overdue holds", n),
                        Err(e) => tracing::error!("Sweep failed: {}", e),
                    }
                }
            }
        }

        tracing::info!("Expiry reaper shut down complete");
    }

    /// Run a single sweep at `now`. Returns the number of holds expired.
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let overdue = self
            .store
            .find_expired_pending(now, self.config.sweep_batch_size)
            .await?;

        let mut expired = 0u64;
        for hold in overdue {
            match self
                .store
                .transition(
                    hold.id,
                    BookingState::Pending,
                    BookingState::Expired,
                    StateChange::none(),
                )
                .await
            {
                Ok(_) => {
                    tracing::debug!(
                        booking_id = %hold.id,
                        asset_id = %hold.asset_id,
                        "Expired overdue hold"
                    );
                    expired += 1;
                }
                // Confirmed or cancelled between scan and write.
                Err(e) if e.is_kind(ErrorKind::StaleState) || e.is_kind(ErrorKind::NotFound) => {
                    tracing::debug!(
                        booking_id = %hold.id,
                        "Hold changed state before sweep write, skipping"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Ok(expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone};
    use fleetbook_core::types::{AssetId, CorrelationId, HolderId};
    use fleetbook_database::store::MemoryBookingStore;
    use fleetbook_entity::booking::NewBooking;

    fn reaper_over(store: Arc<MemoryBookingStore>) -> ExpiryReaper {
        ExpiryReaper::new(store, WorkerConfig::default())
    }

    async fn seed_hold(
        store: &MemoryBookingStore,
        expires_at: DateTime<Utc>,
    ) -> fleetbook_entity::booking::Booking {
        let start = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        store
            .insert(
                NewBooking {
                    asset_id: AssetId::new(),
                    holder_id: HolderId::new(),
                    start_at: start,
                    end_at: start + ChronoDuration::days(2),
                    state: BookingState::Pending,
                    correlation_id: Some(CorrelationId::new()),
                    payment_ref: None,
                    expires_at: Some(expires_at),
                },
                None,
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_sweep_expires_overdue_holds_only() {
        let store = Arc::new(MemoryBookingStore::new());
        let now = Utc::now();

        let overdue = seed_hold(&store, now - ChronoDuration::minutes(5)).await;
        let live = seed_hold(&store, now + ChronoDuration::minutes(25)).await;

        let reaper = reaper_over(Arc::clone(&store));
        let n = reaper.sweep_once(now).await.unwrap();
        assert_eq!(n, 1);

        let overdue = store.find_by_id(overdue.id).await.unwrap().unwrap();
        assert_eq!(overdue.state, BookingState::Expired);

        let live = store.find_by_id(live.id).await.unwrap().unwrap();
        assert_eq!(live.state, BookingState::Pending);
    }

    #[tokio::test]
    async fn test_sweep_skips_holds_confirmed_after_scan() {
        let store = Arc::new(MemoryBookingStore::new());
        let now = Utc::now();
        let hold = seed_hold(&store, now - ChronoDuration::minutes(5)).await;

        // Confirm it out from under the reaper.
        store
            .transition(
                hold.id,
                BookingState::Pending,
                BookingState::Confirmed,
                StateChange::confirm("pay_1"),
            )
            .await
            .unwrap();

        let reaper = reaper_over(Arc::clone(&store));
        let n = reaper.sweep_once(now).await.unwrap();
        assert_eq!(n, 0);

        let booking = store.find_by_id(hold.id).await.unwrap().unwrap();
        assert_eq!(booking.state, BookingState::Confirmed);
    }

    #[tokio::test]
    async fn test_run_stops_when_cancel_sender_dropped() {
        let store = Arc::new(MemoryBookingStore::new());
        let reaper = reaper_over(store);

        let (tx, rx) = watch::channel(false);
        drop(tx);

        // Must exit on its own rather than spin on the closed channel.
        time::timeout(Duration::from_secs(1), reaper.run(rx))
            .await
            .expect("reaper should stop once the sender is gone");
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown_signal() {
        let store = Arc::new(MemoryBookingStore::new());
        let reaper = reaper_over(store);

        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        time::timeout(Duration::from_secs(1), reaper.run(rx))
            .await
            .expect("reaper should stop on the shutdown signal");
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent() {
        let store = Arc::new(MemoryBookingStore::new());
        let now = Utc::now();
        seed_hold(&store, now - ChronoDuration::minutes(5)).await;

        let reaper = reaper_over(Arc::clone(&store));
        assert_eq!(reaper.sweep_once(now).await.unwrap(), 1);
        assert_eq!(reaper.sweep_once(now).await.unwrap(), 0);
    }
}
