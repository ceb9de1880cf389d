//! Request DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fleetbook_core::types::{AssetId, CorrelationId, HolderId};

/// POST /api/bookings/hold request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHoldRequest {
    /// The asset to reserve.
    pub asset_id: AssetId,
    /// The requesting holder.
    pub holder_id: HolderId,
    /// Start of the window (inclusive).
    pub start_at: DateTime<Utc>,
    /// End of the window (exclusive).
    pub end_at: DateTime<Utc>,
    /// Per-day rate in minor currency units. When present the response
    /// includes a quote for the held window.
    #[serde(default)]
    pub rate_per_day_minor: Option<i64>,
}

/// POST /api/bookings request body — staff-created confirmed booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    /// The asset to reserve.
    pub asset_id: AssetId,
    /// The holder the booking is for.
    pub holder_id: HolderId,
    /// Start of the window (inclusive).
    pub start_at: DateTime<Utc>,
    /// End of the window (exclusive).
    pub end_at: DateTime<Utc>,
    /// Payment reference, when payment was taken out of band.
    #[serde(default)]
    pub payment_ref: Option<String>,
}

/// POST /api/bookings/{id}/cancel request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelBookingRequest {
    /// The holder requesting the cancellation; must own the booking.
    pub holder_id: HolderId,
}

/// GET /api/bookings query parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListBookingsQuery {
    /// The holder whose bookings to list.
    pub holder_id: HolderId,
}

/// GET /api/assets/{id}/availability query parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    /// Start of the queried window (inclusive).
    pub start_at: DateTime<Utc>,
    /// End of the queried window (exclusive).
    pub end_at: DateTime<Utc>,
}

/// POST /api/webhooks/payment request body.
///
/// The provider-agnostic shape of a payment-success notification. The
/// booking metadata travels with the payment and is echoed back here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentWebhookRequest {
    /// Correlation token issued at hold creation, absent for payments
    /// raised without a hold.
    #[serde(default)]
    pub correlation_id: Option<CorrelationId>,
    /// The asset the payment books.
    pub asset_id: AssetId,
    /// The paying holder.
    pub holder_id: HolderId,
    /// Start of the paid-for window (inclusive).
    pub start_at: DateTime<Utc>,
    /// End of the paid-for window (exclusive).
    pub end_at: DateTime<Utc>,
    /// Provider-side payment reference.
    pub payment_ref: String,
    /// Amount charged, in minor currency units.
    pub amount_minor: i64,
    /// ISO currency code; the configured default applies when absent.
    #[serde(default)]
    pub currency: Option<String>,
}
