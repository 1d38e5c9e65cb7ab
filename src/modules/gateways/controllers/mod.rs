pub mod gateway_controller;
pub mod payment_controller;

pub use gateway_controller::GatewayController;
pub use payment_controller::PaymentController;
