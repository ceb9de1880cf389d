//! Application state shared across all handlers.

use std::sync::Arc;

use fleetbook_core::config::AppConfig;
use fleetbook_service::{ReconciliationService, ReservationService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Reservation engine
    pub reservations: ReservationService,
    /// Payment reconciler
    pub reconciler: ReconciliationService,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        config: Arc<AppConfig>,
        reservations: ReservationService,
        reconciler: ReconciliationService,
    ) -> Self {
        Self {
            config,
            reservations,
            reconciler,
        }
    }
}
