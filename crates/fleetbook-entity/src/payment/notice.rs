//! Verified payment-success notification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fleetbook_core::types::{AssetId, CorrelationId, HolderId};

/// A payment-success notification, already verified and parsed by the
/// webhook collaborator.
///
/// Delivery is at-least-once: the same notice may arrive delayed,
/// duplicated, or after its hold has already expired. The reconciler owns
/// making its application exactly-once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentNotice {
    /// Token issued at hold creation and echoed back by the provider.
    /// Absent when the payment was raised without a prior hold.
    pub correlation_id: Option<CorrelationId>,
    /// The asset the payment books.
    pub asset_id: AssetId,
    /// The paying holder.
    pub holder_id: HolderId,
    /// Start of the paid-for window.
    pub start_at: DateTime<Utc>,
    /// End of the paid-for window.
    pub end_at: DateTime<Utc>,
    /// Provider-side payment reference (checkout session id).
    pub payment_ref: String,
    /// Amount charged, in minor currency units.
    pub amount_minor: i64,
    /// ISO currency code.
    pub currency: String,
}
