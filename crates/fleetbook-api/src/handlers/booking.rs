//! Booking endpoints: holds, staff bookings, cancellation, listing, and
//! availability.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Duration;

use fleetbook_core::types::{AssetId, BookingId};
use fleetbook_service::reservation::rental_quote;

use crate::dto::request::{
    AvailabilityQuery, CancelBookingRequest, CreateBookingRequest, CreateHoldRequest,
    ListBookingsQuery,
};
use crate::dto::response::{ApiResponse, AvailabilityResponse, BookingResponse, HoldResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/bookings/hold
///
/// Places a provisional hold. The response carries the correlation token
/// the client must attach to its payment request.
pub async fn create_hold(
    State(state): State<AppState>,
    Json(req): Json<CreateHoldRequest>,
) -> Result<(StatusCode, Json<ApiResponse<HoldResponse>>), ApiError> {
    let ttl = Duration::minutes(state.config.booking.hold_ttl_minutes);
    let booking = state
        .reservations
        .create_hold(req.asset_id, req.holder_id, req.start_at, req.end_at, ttl)
        .await?;

    let quote = match req.rate_per_day_minor {
        Some(rate) => Some(rental_quote(rate, req.start_at, req.end_at)?),
        None => None,
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(HoldResponse {
            booking: booking.into(),
            quote,
        })),
    ))
}

/// POST /api/bookings
///
/// Staff path: creates a booking directly in the confirmed state, for
/// walk-ins and phone reservations paid out of band.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingResponse>>), ApiError> {
    let booking = state
        .reservations
        .confirm_direct(
            req.asset_id,
            req.holder_id,
            req.start_at,
            req.end_at,
            req.payment_ref,
            None,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(booking.into())),
    ))
}

/// POST /api/bookings/{id}/cancel
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<BookingId>,
    Json(req): Json<CancelBookingRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, ApiError> {
    let booking = state.reservations.cancel(id, req.holder_id).await?;
    Ok(Json(ApiResponse::ok(booking.into())))
}

/// GET /api/bookings?holder_id=…
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<ApiResponse<Vec<BookingResponse>>>, ApiError> {
    let bookings = state.reservations.holder_bookings(query.holder_id).await?;
    Ok(Json(ApiResponse::ok(
        bookings.into_iter().map(BookingResponse::from).collect(),
    )))
}

/// GET /api/assets/{id}/availability?start_at=…&end_at=…
pub async fn availability(
    State(state): State<AppState>,
    Path(asset_id): Path<AssetId>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ApiResponse<AvailabilityResponse>>, ApiError> {
    let conflicts = state
        .reservations
        .availability(asset_id, query.start_at, query.end_at)
        .await?;

    Ok(Json(ApiResponse::ok(AvailabilityResponse {
        available: conflicts.is_empty(),
        conflicts: conflicts.into_iter().map(BookingResponse::from).collect(),
    })))
}
