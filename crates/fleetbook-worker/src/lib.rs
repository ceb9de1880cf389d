//! # fleetbook-worker
//!
//! Background maintenance loops. The one resident worker is the
//! [`ExpiryReaper`], which sweeps overdue pending holds into the expired
//! state so their slots come back on the market.

pub mod reaper;

pub use reaper::ExpiryReaper;
