pub mod services;

pub use services::signature;
pub use services::{
    CorrelationToken, DecodeError, FileSecretStore, MemorySecretStore, SecretStore, WebhookSecret,
};
