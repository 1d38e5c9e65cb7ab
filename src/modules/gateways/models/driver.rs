use serde::{Deserialize, Serialize};

/// Payment flow kind a driver supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowType {
    /// One-off checkout
    Once,
    /// Recurring subscription
    Subscription,
}

/// Static driver metadata, the registry's view of one gateway module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverDescriptor {
    /// Unique driver name
    pub driver: &'static str,

    /// Flow kind
    pub flow: FlowType,

    /// Callback endpoint slug; the host routes
    /// `payment/return/{endpoint}` to this driver
    pub endpoint: &'static str,

    /// Whether `process_refund` does anything beyond reporting refusal
    pub refund_support: bool,
}

/// Host-side routes a driver hands to the external provider
///
/// The provider calls the notify URL asynchronously and sends the payer's
/// browser back through the success/cancel URLs.
#[derive(Debug, Clone)]
pub struct CallbackRoutes {
    base_url: String,
}

impl CallbackRoutes {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        let mut base_url: String = public_base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Asynchronous webhook URL for a driver's endpoint slug
    pub fn notify_url(&self, endpoint: &str) -> String {
        format!("{}/payment/return/{}", self.base_url, endpoint)
    }

    /// Browser return URL after a successful payment
    pub fn success_url(&self, payment_id: &str) -> String {
        format!("{}/payment/success/{}", self.base_url, payment_id)
    }

    /// Browser return URL after an abandoned or declined payment
    pub fn cancel_url(&self, payment_id: &str) -> String {
        format!("{}/payment/cancel/{}", self.base_url, payment_id)
    }
}
