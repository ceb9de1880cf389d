//! Payment reconciliation: folds at-least-once provider notifications
//! into the booking store exactly once.

pub mod service;

pub use service::ReconciliationService;
