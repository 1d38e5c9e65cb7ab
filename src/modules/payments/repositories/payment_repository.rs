use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::{AppError, Result};
use crate::modules::payments::models::PaymentIntent;

/// Storage seam for payment intents
///
/// The host application owns durable payment persistence; this service only
/// needs lookup and the two terminal transitions, so storage stays behind a
/// trait and ships with an in-memory implementation.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Stores a new intent
    async fn create(&self, intent: PaymentIntent) -> Result<PaymentIntent>;

    /// Looks up an intent by id
    async fn find(&self, id: &str) -> Result<Option<PaymentIntent>>;

    /// Completes a pending intent with the provider transaction reference
    /// and the full raw callback payload
    async fn complete(
        &self,
        id: &str,
        transaction_ref: &str,
        raw_payload: serde_json::Value,
    ) -> Result<PaymentIntent>;

    /// Cancels a pending intent
    async fn cancel(&self, id: &str) -> Result<PaymentIntent>;

    /// Fails a pending intent
    async fn fail(&self, id: &str) -> Result<PaymentIntent>;
}

/// In-memory payment repository
#[derive(Default)]
pub struct MemoryPaymentRepository {
    records: RwLock<HashMap<String, PaymentIntent>>,
}

impl MemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryPaymentRepository {
    async fn update<F>(&self, id: &str, apply: F) -> Result<PaymentIntent>
    where
        F: FnOnce(&mut PaymentIntent) -> Result<()>,
    {
        let mut records = self.records.write().await;
        let intent = records
            .get_mut(id)
            .ok_or_else(|| AppError::not_found(format!("Payment {}", id)))?;
        apply(intent)?;
        Ok(intent.clone())
    }
}

#[async_trait]
impl PaymentRepository for MemoryPaymentRepository {
    async fn create(&self, intent: PaymentIntent) -> Result<PaymentIntent> {
        let mut records = self.records.write().await;
        if records.contains_key(&intent.id) {
            return Err(AppError::validation(format!(
                "Payment {} already exists",
                intent.id
            )));
        }
        records.insert(intent.id.clone(), intent.clone());
        Ok(intent)
    }

    async fn find(&self, id: &str) -> Result<Option<PaymentIntent>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn complete(
        &self,
        id: &str,
        transaction_ref: &str,
        raw_payload: serde_json::Value,
    ) -> Result<PaymentIntent> {
        self.update(id, |intent| intent.mark_completed(transaction_ref, raw_payload))
            .await
    }

    async fn cancel(&self, id: &str) -> Result<PaymentIntent> {
        self.update(id, |intent| intent.mark_cancelled()).await
    }

    async fn fail(&self, id: &str) -> Result<PaymentIntent> {
        self.update(id, |intent| intent.mark_failed()).await
    }
}
