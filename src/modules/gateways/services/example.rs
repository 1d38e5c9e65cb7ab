use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use tracing::info;

use crate::core::{format_amount, AppError, Result};
use crate::modules::gateways::models::{CallbackRoutes, DriverDescriptor, FlowType};
use crate::modules::gateways::services::{
    CallbackOutcome, CallbackParams, CheckoutRedirect, GatewayDriver,
};
use crate::modules::payments::{PaymentIntent, PaymentRepository};

/// Minimal hosted-checkout reference driver
///
/// Shows the plugin contract with the least possible provider machinery:
/// the payer is redirected to a hosted checkout page carrying the payment
/// id, and the provider's return call reports an approval state. Real
/// drivers with an asynchronous notify channel should follow
/// `PayByLinkDriver` and the correlation-token protocol instead.
pub struct ExampleDriver {
    checkout_url: String,
    routes: CallbackRoutes,
    payments: Arc<dyn PaymentRepository>,
}

impl ExampleDriver {
    pub fn new(
        checkout_url: impl Into<String>,
        routes: CallbackRoutes,
        payments: Arc<dyn PaymentRepository>,
    ) -> Self {
        Self {
            checkout_url: checkout_url.into(),
            routes,
            payments,
        }
    }
}

#[async_trait]
impl GatewayDriver for ExampleDriver {
    fn descriptor(&self) -> DriverDescriptor {
        DriverDescriptor {
            driver: "example",
            flow: FlowType::Once,
            endpoint: "example-endpoint",
            refund_support: false,
        }
    }

    fn config_template(&self) -> BTreeMap<&'static str, &'static str> {
        BTreeMap::from([("api_key", "")])
    }

    async fn process_gateway(&self, payment: &PaymentIntent) -> Result<CheckoutRedirect> {
        let url = Url::parse_with_params(
            &self.checkout_url,
            &[
                ("payment_id", payment.id.as_str()),
                ("amount", &format_amount(payment.amount)),
                ("currency", &payment.currency.to_string()),
                ("description", &payment.description),
                ("returnUrl", &self.routes.notify_url(self.endpoint())),
                ("cancelUrl", &self.routes.cancel_url(&payment.id)),
            ],
        )
        .map_err(|e| AppError::Configuration(format!("Invalid checkout URL: {}", e)))?;

        Ok(CheckoutRedirect {
            url: url.to_string(),
        })
    }

    async fn return_gateway(&self, params: CallbackParams) -> Result<CallbackOutcome> {
        let payment_id = params
            .get("payment_id")
            .ok_or_else(|| AppError::malformed_callback("Missing payment_id parameter"))?;

        let intent = self
            .payments
            .find(payment_id)
            .await?
            .ok_or_else(|| AppError::UnknownPayment(payment_id.clone()))?;

        let state = params.get("state").map(String::as_str).unwrap_or("");
        let raw_payload = serde_json::to_value(&params)
            .map_err(|e| AppError::internal(format!("Failed to record callback payload: {}", e)))?;

        match state {
            "approved" | "completed" => {
                let transaction_ref = params
                    .get("transactionId")
                    .ok_or_else(|| AppError::malformed_callback("Missing transactionId parameter"))?;
                let completed = self
                    .payments
                    .complete(&intent.id, transaction_ref, raw_payload)
                    .await?;
                info!(payment_id = %completed.id, "Example gateway payment completed");
                Ok(CallbackOutcome::Completed {
                    payment_id: completed.id,
                })
            }
            // Anything the provider does not positively approve is a cancel
            _ => {
                let cancelled = self.payments.cancel(&intent.id).await?;
                info!(payment_id = %cancelled.id, state = state, "Example gateway payment cancelled");
                Ok(CallbackOutcome::Cancelled {
                    payment_id: cancelled.id,
                })
            }
        }
    }
}
