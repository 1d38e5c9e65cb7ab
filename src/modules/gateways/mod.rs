pub mod controllers;
pub mod models;
pub mod services;

pub use models::{CallbackRoutes, DriverDescriptor, FlowType};
pub use services::{DriverRegistry, ExampleDriver, GatewayDriver, PayByLinkConfig, PayByLinkDriver};
