//! Paybridge payment gateway driver service
//!
//! Hosts payment-gateway drivers behind one plugin contract and implements
//! the signed webhook round-trip protocol: sign outbound payment-initiation
//! requests, round-trip an opaque correlation token through the provider,
//! and verify the asynchronous callback fail-closed before completing a
//! payment.

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use modules::gateways;
pub use modules::payments;
pub use modules::signing;
pub use modules::webhooks;
