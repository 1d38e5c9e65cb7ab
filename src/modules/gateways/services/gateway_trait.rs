use std::collections::BTreeMap;
use std::collections::HashMap;

use async_trait::async_trait;

use crate::core::Result;
use crate::modules::gateways::models::DriverDescriptor;
use crate::modules::payments::PaymentIntent;

/// Raw inbound callback parameters (merged query string and form body)
pub type CallbackParams = HashMap<String, String>;

/// Successful initiation outcome: send the payer here
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRedirect {
    pub url: String,
}

/// Acknowledged callback outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Payment verified and completed with the provider transaction ref
    Completed { payment_id: String },
    /// Provider reported the flow as abandoned or declined
    Cancelled { payment_id: String },
}

/// The plugin contract every gateway driver satisfies
///
/// Drivers are a closed set of trait objects behind the registry; each one
/// adapts a provider's checkout/webhook API to these operations.
#[async_trait]
pub trait GatewayDriver: Send + Sync {
    /// Static driver metadata
    fn descriptor(&self) -> DriverDescriptor;

    /// Callback endpoint slug, used to route `payment/return/{endpoint}`
    fn endpoint(&self) -> &'static str {
        self.descriptor().endpoint
    }

    /// Administrator-facing configuration keys with their defaults.
    /// Credentials are opaque strings with no usable default.
    fn config_template(&self) -> BTreeMap<&'static str, &'static str>;

    /// Initiation flow: build and sign the outbound payment-creation
    /// request, issue it, and map the response to a redirect.
    ///
    /// Never mutates the intent; completion only happens via
    /// `return_gateway`.
    async fn process_gateway(&self, payment: &PaymentIntent) -> Result<CheckoutRedirect>;

    /// Callback verifier: validate the inbound webhook and drive the
    /// payment to a terminal state.
    async fn return_gateway(&self, params: CallbackParams) -> Result<CallbackOutcome>;

    /// Optional refund hook. Capability, not required behavior: drivers
    /// without refund support report refusal.
    async fn process_refund(&self, _payment: &PaymentIntent, _data: &serde_json::Value) -> bool {
        false
    }

    /// Optional subscription-status hook; defaults to unsupported.
    async fn check_subscription(&self, _subscription_id: &str) -> bool {
        false
    }
}
