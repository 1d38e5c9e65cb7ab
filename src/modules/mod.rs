pub mod gateways;
pub mod payments;
pub mod signing;
pub mod webhooks;
