//! Payment webhook collaborator.
//!
//! Receives provider notifications, authenticates them with the shared
//! webhook secret, translates them into verified [`PaymentNotice`]s, and
//! hands them to the reconciler. The reconciler owns all state decisions;
//! this handler only verifies and translates.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use subtle::ConstantTimeEq;
use tracing::{error, warn};

use fleetbook_core::error::{AppError, ErrorKind};
use fleetbook_entity::payment::PaymentNotice;

use crate::dto::request::PaymentWebhookRequest;
use crate::dto::response::{ApiResponse, WebhookAckResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the shared webhook secret.
pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// POST /api/webhooks/payment
///
/// Returns 200 for every notice the reconciler handled, including the
/// lost-slot escalation: the provider's job ends at delivery, and
/// retrying an escalated notice cannot change the outcome. Transient
/// errors (store unavailable) surface as 5xx so the provider redelivers.
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<PaymentWebhookRequest>,
) -> Result<Json<ApiResponse<WebhookAckResponse>>, ApiError> {
    verify_secret(&state, &headers)?;

    let notice = PaymentNotice {
        correlation_id: req.correlation_id,
        asset_id: req.asset_id,
        holder_id: req.holder_id,
        start_at: req.start_at,
        end_at: req.end_at,
        payment_ref: req.payment_ref,
        amount_minor: req.amount_minor,
        currency: req
            .currency
            .unwrap_or_else(|| state.config.payment.default_currency.clone()),
    };

    match state.reconciler.apply(notice).await {
        Ok(booking) => Ok(Json(ApiResponse::ok(WebhookAckResponse {
            outcome: "applied".to_string(),
            booking: Some(booking.into()),
        }))),
        // Handled terminally: the compensation event is already emitted
        // and redelivery would only replay the same escalation.
        Err(e) if e.is_kind(ErrorKind::ReconciliationFailure) => {
            Ok(Json(ApiResponse::ok(WebhookAckResponse {
                outcome: "escalated".to_string(),
                booking: None,
            })))
        }
        Err(e) => Err(e.into()),
    }
}

/// Shared-secret check. Fails closed: an unconfigured secret rejects all
/// deliveries rather than accepting unauthenticated ones.
fn verify_secret(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let expected = state.config.payment.webhook_secret.as_str();
    if expected.is_empty() {
        error!("Webhook secret is not configured, rejecting delivery");
        return Err(AppError::forbidden("Webhook endpoint is not configured").into());
    }

    let presented = headers
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|v| v.to_str().ok());

    // Constant-time comparison so the check leaks no prefix timing.
    match presented {
        Some(value) if bool::from(value.as_bytes().ct_eq(expected.as_bytes())) => Ok(()),
        Some(_) => {
            warn!("Webhook delivery with wrong secret");
            Err(AppError::forbidden("Invalid webhook secret").into())
        }
        None => {
            warn!("Webhook delivery without secret header");
            Err(AppError::forbidden("Missing webhook secret").into())
        }
    }
}
