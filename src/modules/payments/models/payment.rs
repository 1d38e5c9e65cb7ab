use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{AppError, Currency, Result};

/// Payment intent status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Awaiting completion via the callback verifier
    Pending,

    /// Callback verified, payment confirmed by the provider
    Completed,

    /// Flow abandoned or declined at the provider
    Cancelled,

    /// Terminal failure
    Failed,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Completed => write!(f, "completed"),
            PaymentStatus::Cancelled => write!(f, "cancelled"),
            PaymentStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A payment awaiting its round trip through an external provider
///
/// Created pending before the flow starts. Only the callback verifier moves
/// it to `Completed` or `Cancelled`; the initiation flow never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Unique payment id (UUID)
    pub id: String,

    /// Amount in major currency units; rounded to the currency scale when
    /// formatted for the wire
    pub amount: Decimal,

    /// Payment currency
    pub currency: Currency,

    /// Human-readable description shown at the provider
    pub description: String,

    /// Payer email forwarded to the provider
    pub payer_email: String,

    /// Current status
    pub status: PaymentStatus,

    /// Provider-supplied transaction identifier, set on completion
    pub transaction_ref: Option<String>,

    /// Full inbound callback payload, recorded for audit on completion
    pub gateway_response: Option<serde_json::Value>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentIntent {
    /// Creates a new pending intent with a validated amount
    pub fn new(
        amount: Decimal,
        currency: Currency,
        description: impl Into<String>,
        payer_email: impl Into<String>,
    ) -> Result<Self> {
        currency
            .validate_amount(amount)
            .map_err(AppError::Validation)?;

        let payer_email = payer_email.into();
        if !payer_email.contains('@') {
            return Err(AppError::validation("Invalid payer email"));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            amount,
            currency,
            description: description.into(),
            payer_email,
            status: PaymentStatus::Pending,
            transaction_ref: None,
            gateway_response: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.status == PaymentStatus::Pending
    }

    /// Marks the intent completed with the provider transaction reference
    /// and the raw callback payload. Only valid from `Pending`.
    pub fn mark_completed(
        &mut self,
        transaction_ref: impl Into<String>,
        raw_payload: serde_json::Value,
    ) -> Result<()> {
        self.ensure_pending("complete")?;
        self.status = PaymentStatus::Completed;
        self.transaction_ref = Some(transaction_ref.into());
        self.gateway_response = Some(raw_payload);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Marks the intent cancelled. Only valid from `Pending`.
    pub fn mark_cancelled(&mut self) -> Result<()> {
        self.ensure_pending("cancel")?;
        self.status = PaymentStatus::Cancelled;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Marks the intent failed. Only valid from `Pending`.
    pub fn mark_failed(&mut self) -> Result<()> {
        self.ensure_pending("fail")?;
        self.status = PaymentStatus::Failed;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn ensure_pending(&self, action: &str) -> Result<()> {
        if !self.is_pending() {
            return Err(AppError::validation(format!(
                "Cannot {} payment {}: status is {}",
                action, self.id, self.status
            )));
        }
        Ok(())
    }
}
