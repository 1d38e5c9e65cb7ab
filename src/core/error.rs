use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
///
/// The first five variants form the payment-flow taxonomy: `Transport` and
/// `ProviderRejected` cover the outbound initiation path, the remaining
/// three cover inbound callback verification and are always fail-closed.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Network fault or timeout while talking to the payment provider.
    /// Never retried automatically: re-issuing a payment-creation call
    /// risks duplicate charges.
    #[error("Provider unreachable: {0}")]
    Transport(String),

    /// Provider accepted the request transport but declined it
    #[error("Provider rejected the request ({code}): {message}")]
    ProviderRejected { code: String, message: String },

    /// Inbound callback payload could not be parsed
    #[error("Malformed callback: {0}")]
    MalformedCallback(String),

    /// Callback correlation token decoded to a payment id with no matching
    /// intent; possible replay or stale link
    #[error("Unknown payment: {0}")]
    UnknownPayment(String),

    /// Callback fingerprint does not match the current webhook secret;
    /// treated as a forgery attempt
    #[error("Webhook signature mismatch")]
    SignatureMismatch,

    /// Validation errors for business rules
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        HttpResponse::build(status_code).json(serde_json::json!({
            "error": {
                "message": error_message,
                "code": status_code.as_u16(),
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Transport(_) => StatusCode::BAD_GATEWAY,
            AppError::ProviderRejected { .. } => StatusCode::BAD_GATEWAY,
            AppError::MalformedCallback(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownPayment(_) => StatusCode::NOT_FOUND,
            AppError::SignatureMismatch => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn transport(msg: impl Into<String>) -> Self {
        AppError::Transport(msg.into())
    }

    pub fn provider_rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::ProviderRejected {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn malformed_callback(msg: impl Into<String>) -> Self {
        AppError::MalformedCallback(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
