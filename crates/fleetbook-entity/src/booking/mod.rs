//! Booking entity: model, state machine, and write payloads.

pub mod model;
pub mod state;

pub use model::{Booking, NewBooking, StateChange};
pub use state::BookingState;
