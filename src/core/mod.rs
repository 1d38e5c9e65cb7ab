pub mod currency;
pub mod error;

pub use currency::{format_amount, Currency};
pub use error::{AppError, Result};
