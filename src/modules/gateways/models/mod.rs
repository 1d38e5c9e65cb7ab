pub mod driver;

pub use driver::{CallbackRoutes, DriverDescriptor, FlowType};
