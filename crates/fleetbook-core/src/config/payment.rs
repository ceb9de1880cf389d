//! Payment webhook collaborator configuration.

use serde::{Deserialize, Serialize};

/// Settings for the inbound payment-provider webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Shared secret the provider includes with every notification.
    /// Requests without it are rejected before the reconciler runs.
    #[serde(default)]
    pub webhook_secret: String,
    /// ISO currency code used when a notification omits one.
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            webhook_secret: String::new(),
            default_currency: default_currency(),
        }
    }
}

fn default_currency() -> String {
    "inr".to_string()
}
