//! Payment notification payloads.

pub mod notice;

pub use notice::PaymentNotice;
