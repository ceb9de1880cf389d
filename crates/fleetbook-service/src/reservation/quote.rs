//! Per-day rental pricing.

use chrono::{DateTime, Utc};

use fleetbook_core::error::AppError;
use fleetbook_core::result::AppResult;

/// A priced rental window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Quote {
    /// Billable days, partial days rounded up.
    pub days: i64,
    /// Total amount in minor currency units.
    pub amount_minor: i64,
}

/// Price a rental window at a per-day rate.
///
/// Days are counted by rounding the window up to whole days, so any
/// window shorter than 24 hours bills one day.
pub fn rental_quote(
    rate_per_day_minor: i64,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
) -> AppResult<Quote> {
    if start_at >= end_at {
        return Err(AppError::validation("Rental window must start before it ends"));
    }
    if rate_per_day_minor < 0 {
        return Err(AppError::validation("Per-day rate cannot be negative"));
    }

    let seconds = (end_at - start_at).num_seconds();
    let days = (seconds + 86_399) / 86_400;
    Ok(Quote {
        days,
        amount_minor: rate_per_day_minor * days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_exact_days() {
        let q = rental_quote(150_000, at(1, 9), at(4, 9)).unwrap();
        assert_eq!(q.days, 3);
        assert_eq!(q.amount_minor, 450_000);
    }

    #[test]
    fn test_partial_day_rounds_up() {
        let q = rental_quote(150_000, at(1, 9), at(2, 15)).unwrap();
        assert_eq!(q.days, 2);

        let q = rental_quote(150_000, at(1, 9), at(1, 11)).unwrap();
        assert_eq!(q.days, 1);
    }

    #[test]
    fn test_invalid_window() {
        assert!(rental_quote(150_000, at(2, 9), at(1, 9)).is_err());
        assert!(rental_quote(150_000, at(1, 9), at(1, 9)).is_err());
    }
}
