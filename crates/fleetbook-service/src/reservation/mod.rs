//! Reservation engine: holds, direct confirmations, cancellation,
//! availability, and rental quotes.

pub mod quote;
pub mod service;

pub use quote::{rental_quote, Quote};
pub use service::ReservationService;
