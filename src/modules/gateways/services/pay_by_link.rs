use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::{format_amount, AppError, Result};
use crate::modules::gateways::models::{CallbackRoutes, DriverDescriptor, FlowType};
use crate::modules::gateways::services::{
    CallbackOutcome, CallbackParams, CheckoutRedirect, GatewayDriver,
};
use crate::modules::payments::PaymentIntent;
use crate::modules::signing::{signature, CorrelationToken, SecretStore};
use crate::modules::webhooks::CallbackVerifier;

/// Administrator-provided PayByLink credentials
#[derive(Debug, Clone)]
pub struct PayByLinkConfig {
    /// Numeric shop identifier assigned by the provider
    pub shop_id: i64,

    /// Signing secret shared with the provider
    pub secret_key: String,

    /// Provider API base URL
    pub base_url: String,
}

/// PayByLink transfer-generation driver
///
/// Implements the signed webhook round trip: outbound requests carry a
/// SHA-256 signature over the fields below in the provider's fixed order,
/// plus a correlation token the provider echoes back with the asynchronous
/// notify callback.
///
/// Signed field order (wire contract, fixed by the provider):
/// `secret_key | shop_id | amount | control | description | email |
/// notify_url | return_url_success`
pub struct PayByLinkDriver {
    config: PayByLinkConfig,
    routes: CallbackRoutes,
    client: Client,
    secrets: Arc<dyn SecretStore>,
    verifier: Arc<CallbackVerifier>,
}

/// Outbound transfer-generation request body
#[derive(Debug, Serialize)]
struct TransferRequest<'a> {
    #[serde(rename = "shopId")]
    shop_id: i64,
    price: &'a str,
    control: &'a str,
    description: &'a str,
    email: &'a str,
    #[serde(rename = "notifyURL")]
    notify_url: &'a str,
    #[serde(rename = "returnUrlSuccess")]
    return_url_success: &'a str,
    signature: &'a str,
}

/// Provider response; success carries `url`, failure carries the error pair
#[derive(Debug, Deserialize)]
struct TransferResponse {
    url: Option<String>,
    #[serde(rename = "errorCode")]
    error_code: Option<serde_json::Value>,
    error: Option<String>,
}

impl PayByLinkDriver {
    pub fn new(
        config: PayByLinkConfig,
        routes: CallbackRoutes,
        client: Client,
        secrets: Arc<dyn SecretStore>,
        verifier: Arc<CallbackVerifier>,
    ) -> Self {
        Self {
            config,
            routes,
            client,
            secrets,
            verifier,
        }
    }

    fn transfer_endpoint(&self) -> String {
        format!(
            "{}/api/v1/transfer/generate",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn rejection_from(status: reqwest::StatusCode, body: &str) -> AppError {
        // The provider reports failures as {"errorCode": ..., "error": ...};
        // fall back to the HTTP status when the body is something else
        if let Ok(parsed) = serde_json::from_str::<TransferResponse>(body) {
            if parsed.error_code.is_some() || parsed.error.is_some() {
                let code = parsed
                    .error_code
                    .map(|c| c.to_string().trim_matches('"').to_string())
                    .unwrap_or_else(|| status.as_u16().to_string());
                let message = parsed
                    .error
                    .unwrap_or_else(|| "Provider returned an error".to_string());
                return AppError::provider_rejected(code, message);
            }
        }
        AppError::provider_rejected(
            status.as_u16().to_string(),
            format!("Unexpected provider response: {}", body),
        )
    }
}

#[async_trait]
impl GatewayDriver for PayByLinkDriver {
    fn descriptor(&self) -> DriverDescriptor {
        DriverDescriptor {
            driver: "paybylink",
            flow: FlowType::Once,
            endpoint: "paybylink",
            refund_support: false,
        }
    }

    fn config_template(&self) -> BTreeMap<&'static str, &'static str> {
        BTreeMap::from([("shop_id", ""), ("secret_key", "")])
    }

    async fn process_gateway(&self, payment: &PaymentIntent) -> Result<CheckoutRedirect> {
        // The webhook secret is fetched once per flow, before anything is signed
        let webhook_secret = self.secrets.get_or_create().await?;
        let control =
            CorrelationToken::new(payment.id.clone(), webhook_secret.fingerprint()).encode()?;

        let amount = format_amount(payment.amount);
        let shop_id = self.config.shop_id.to_string();
        let notify_url = self.routes.notify_url(self.endpoint());
        let return_url_success = self.routes.success_url(&payment.id);

        let signature = signature::sign(
            &self.config.secret_key,
            &[
                &shop_id,
                &amount,
                &control,
                &payment.description,
                &payment.payer_email,
                &notify_url,
                &return_url_success,
            ],
        );

        let request = TransferRequest {
            shop_id: self.config.shop_id,
            price: &amount,
            control: &control,
            description: &payment.description,
            email: &payment.payer_email,
            notify_url: &notify_url,
            return_url_success: &return_url_success,
            signature: &signature,
        };

        info!(
            payment_id = %payment.id,
            amount = %amount,
            "Requesting PayByLink transfer"
        );

        // One bounded-timeout call, never retried automatically
        let response = self
            .client
            .post(self.transfer_endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let kind = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connection failed"
                } else {
                    "request failed"
                };
                AppError::transport(format!("PayByLink {}: {}", kind, e))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::transport(format!("PayByLink response read failed: {}", e)))?;

        if !status.is_success() {
            return Err(Self::rejection_from(status, &body));
        }

        let transfer: TransferResponse = serde_json::from_str(&body).map_err(|e| {
            AppError::provider_rejected(
                status.as_u16().to_string(),
                format!("Unparseable provider response: {}", e),
            )
        })?;

        match transfer.url {
            Some(url) => {
                info!(payment_id = %payment.id, "PayByLink transfer created");
                Ok(CheckoutRedirect { url })
            }
            None => Err(AppError::provider_rejected(
                "NO_URL",
                "Gateway did not return a payment URL",
            )),
        }
    }

    async fn return_gateway(&self, params: CallbackParams) -> Result<CallbackOutcome> {
        let control = params
            .get("control")
            .ok_or_else(|| AppError::malformed_callback("Missing control parameter"))?;
        let transaction_ref = params
            .get("transactionId")
            .ok_or_else(|| AppError::malformed_callback("Missing transactionId parameter"))?;

        let raw_payload = serde_json::to_value(&params)
            .map_err(|e| AppError::internal(format!("Failed to record callback payload: {}", e)))?;

        let completed = self
            .verifier
            .verify(control, transaction_ref, raw_payload)
            .await
            .inspect_err(|e| {
                warn!(error = %e, "PayByLink callback rejected");
            })?;

        Ok(CallbackOutcome::Completed {
            payment_id: completed.id,
        })
    }
}
