pub mod secret_store;
pub mod signature;
pub mod token;

pub use secret_store::{FileSecretStore, MemorySecretStore, SecretStore, WebhookSecret};
pub use token::{CorrelationToken, DecodeError};
