//! Booking engine configuration.

use serde::{Deserialize, Serialize};

/// Reservation engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Minutes an unpaid hold blocks its slot before the reaper may
    /// reclaim it.
    #[serde(default = "default_hold_ttl_minutes")]
    pub hold_ttl_minutes: i64,
    /// Longest rental window a single booking may cover, in days.
    #[serde(default = "default_max_window_days")]
    pub max_window_days: i64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            hold_ttl_minutes: default_hold_ttl_minutes(),
            max_window_days: default_max_window_days(),
        }
    }
}

fn default_hold_ttl_minutes() -> i64 {
    30
}

fn default_max_window_days() -> i64 {
    90
}
