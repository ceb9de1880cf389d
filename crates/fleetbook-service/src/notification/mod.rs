//! Outbound event delivery.

pub mod channel;

pub use channel::ChannelEventSink;
