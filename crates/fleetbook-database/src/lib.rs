//! # fleetbook-database
//!
//! The booking store: PostgreSQL connection management, migrations, and
//! the two [`store::BookingStore`] implementations (PostgreSQL for
//! production, in-memory for single-node development and tests).

pub mod connection;
pub mod migration;
pub mod store;

pub use connection::DatabasePool;
pub use store::{BookingStore, MemoryBookingStore, PgBookingStore};
