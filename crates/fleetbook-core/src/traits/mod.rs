//! Core traits defined in `fleetbook-core` and implemented by other crates.

pub mod notifier;

pub use notifier::EventSink;
