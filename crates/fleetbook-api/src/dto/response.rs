//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fleetbook_core::types::{AssetId, BookingId, CorrelationId, HolderId};
use fleetbook_entity::booking::{Booking, BookingState};
use fleetbook_service::reservation::Quote;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Booking summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    /// Booking ID.
    pub id: BookingId,
    /// Reserved asset.
    pub asset_id: AssetId,
    /// Booking holder.
    pub holder_id: HolderId,
    /// Window start (inclusive).
    pub start_at: DateTime<Utc>,
    /// Window end (exclusive).
    pub end_at: DateTime<Utc>,
    /// Lifecycle state.
    pub state: BookingState,
    /// Token to attach to the payment request (hold-path bookings only).
    pub correlation_id: Option<CorrelationId>,
    /// Payment reference, once confirmed.
    pub payment_ref: Option<String>,
    /// When a pending hold lapses.
    pub expires_at: Option<DateTime<Utc>>,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            asset_id: b.asset_id,
            holder_id: b.holder_id,
            start_at: b.start_at,
            end_at: b.end_at,
            state: b.state,
            correlation_id: b.correlation_id,
            payment_ref: b.payment_ref,
            expires_at: b.expires_at,
            created_at: b.created_at,
        }
    }
}

/// Hold creation response: the pending booking plus an optional quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldResponse {
    /// The created pending hold.
    pub booking: BookingResponse,
    /// Priced window, present when the request carried a per-day rate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<Quote>,
}

/// Availability query response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    /// Whether the queried window is free.
    pub available: bool,
    /// Bookings blocking the window, empty when available.
    pub conflicts: Vec<BookingResponse>,
}

/// Webhook acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAckResponse {
    /// What reconciliation did with the notice.
    pub outcome: String,
    /// The booking the notice resolved to, absent when escalated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<BookingResponse>,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}
