//! # fleetbook-api
//!
//! HTTP API layer for Fleetbook built on Axum.
//!
//! Provides the booking endpoints, the payment webhook collaborator,
//! DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
