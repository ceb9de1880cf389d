//! # fleetbook-entity
//!
//! Domain entity models for Fleetbook: the booking interval record, its
//! state machine, and the payment notification shape consumed by the
//! reconciler.

pub mod booking;
pub mod payment;

pub use booking::{Booking, BookingState, NewBooking, StateChange};
pub use payment::PaymentNotice;
