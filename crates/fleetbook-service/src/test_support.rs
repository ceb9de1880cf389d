//! Shared fixtures for service tests.

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Mutex;

use fleetbook_core::events::DomainEvent;
use fleetbook_core::traits::EventSink;

/// Event sink that records everything it is handed.
#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<DomainEvent>>,
}

impl CollectingSink {
    pub async fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl EventSink for CollectingSink {
    async fn emit(&self, event: DomainEvent) {
        self.events.lock().await.push(event);
    }
}

/// A [start, end) window on fixed days in March 2026, 09:00 UTC.
pub fn day_window(start_day: u32, end_day: u32) -> (DateTime<Utc>, DateTime<Utc>) {
    (
        Utc.with_ymd_and_hms(2026, 3, start_day, 9, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 3, end_day, 9, 0, 0).unwrap(),
    )
}
