pub mod example;
pub mod gateway_trait;
pub mod pay_by_link;
pub mod registry;

pub use example::ExampleDriver;
pub use gateway_trait::{CallbackOutcome, CallbackParams, CheckoutRedirect, GatewayDriver};
pub use pay_by_link::{PayByLinkConfig, PayByLinkDriver};
pub use registry::DriverRegistry;
