//! Shared typed identifiers.

pub mod id;

pub use id::{AssetId, BookingId, CorrelationId, HolderId};
