//! Unified application error types for Fleetbook.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested time window collides with an existing pending or
    /// confirmed booking. A business conflict: the caller must pick another
    /// window or trigger compensation, retrying as-is cannot succeed.
    SlotUnavailable,
    /// A conditional state transition found a different stored state than
    /// expected. An expected concurrency race, recovered internally where
    /// it occurs and never surfaced to end users.
    StaleState,
    /// The requested resource was not found.
    NotFound,
    /// The caller does not own the resource it tried to act on.
    Forbidden,
    /// Input validation failed.
    Validation,
    /// A transient store or timeout failure; safe to retry, every write is
    /// conditioned or idempotent.
    Unavailable,
    /// Payment succeeded but the slot was lost to another holder. Always
    /// escalated for compensating action, never silently dropped.
    ReconciliationFailure,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal server error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SlotUnavailable => write!(f, "SLOT_UNAVAILABLE"),
            Self::StaleState => write!(f, "STALE_STATE"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::ReconciliationFailure => write!(f, "RECONCILIATION_FAILURE"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout Fleetbook.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a slot-unavailable error.
    pub fn slot_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SlotUnavailable, message)
    }

    /// Create a stale-state error.
    pub fn stale_state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StaleState, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unavailable, message)
    }

    /// Create a reconciliation-failure error.
    pub fn reconciliation_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ReconciliationFailure, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error is the given kind.
    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display_codes() {
        assert_eq!(ErrorKind::SlotUnavailable.to_string(), "SLOT_UNAVAILABLE");
        assert_eq!(ErrorKind::StaleState.to_string(), "STALE_STATE");
        assert_eq!(
            ErrorKind::ReconciliationFailure.to_string(),
            "RECONCILIATION_FAILURE"
        );
    }

    #[test]
    fn test_error_message_includes_kind() {
        let err = AppError::slot_unavailable("window already booked");
        assert_eq!(
            err.to_string(),
            "SLOT_UNAVAILABLE: window already booked"
        );
        assert!(err.is_kind(ErrorKind::SlotUnavailable));
    }
}
