use std::sync::Arc;

use subtle::ConstantTimeEq;
use tracing::{info, warn};

use crate::core::{AppError, Result};
use crate::modules::payments::{PaymentIntent, PaymentRepository};
use crate::modules::signing::{CorrelationToken, SecretStore};

/// Validates inbound provider callbacks and drives payments to completion
///
/// The verification ladder is strictly fail-closed: every rung rejects by
/// default and only an exact fingerprint match reaches completion.
/// `Received -> Accepted` requires decode, lookup, and fingerprint match in
/// that order; anything else is `Received -> Rejected` with a logged reason.
pub struct CallbackVerifier {
    payments: Arc<dyn PaymentRepository>,
    secrets: Arc<dyn SecretStore>,
}

impl CallbackVerifier {
    pub fn new(payments: Arc<dyn PaymentRepository>, secrets: Arc<dyn SecretStore>) -> Self {
        Self { payments, secrets }
    }

    /// Verifies one callback and completes the matching intent.
    ///
    /// # Arguments
    /// * `raw_token` - Correlation token exactly as the provider returned it
    /// * `transaction_ref` - Provider-supplied transaction identifier
    /// * `raw_payload` - Full inbound payload, recorded for audit
    pub async fn verify(
        &self,
        raw_token: &str,
        transaction_ref: &str,
        raw_payload: serde_json::Value,
    ) -> Result<PaymentIntent> {
        let token = CorrelationToken::decode(raw_token).map_err(|e| {
            warn!(error = %e, "Rejected callback: token did not decode");
            AppError::malformed_callback(e.to_string())
        })?;

        let intent = self
            .payments
            .find(&token.payment_id)
            .await?
            .ok_or_else(|| {
                warn!(
                    payment_id = %token.payment_id,
                    "Rejected callback: no matching intent (replay or stale link?)"
                );
                AppError::UnknownPayment(token.payment_id.clone())
            })?;

        // Same-secret invariant: the fingerprint minted at sign time must
        // match the secret live right now, or the callback is untrusted.
        let secret = self.secrets.get_or_create().await?;
        let expected = secret.fingerprint();
        let matches: bool = expected
            .as_bytes()
            .ct_eq(token.secret_fingerprint.as_bytes())
            .into();
        if !matches {
            warn!(
                payment_id = %intent.id,
                "Rejected callback: secret fingerprint mismatch (possible forgery)"
            );
            return Err(AppError::SignatureMismatch);
        }

        let completed = self
            .payments
            .complete(&intent.id, transaction_ref, raw_payload)
            .await?;

        info!(
            payment_id = %completed.id,
            transaction_ref = transaction_ref,
            "Callback verified, payment completed"
        );
        Ok(completed)
    }
}
