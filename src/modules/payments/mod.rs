pub mod models;
pub mod repositories;

pub use models::{PaymentIntent, PaymentStatus};
pub use repositories::{MemoryPaymentRepository, PaymentRepository};
