use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};
use serde_json::json;
use tracing::{error, info, warn};

use crate::modules::gateways::services::{CallbackOutcome, DriverRegistry};
use crate::modules::payments::PaymentRepository;

/// Webhook and browser-return controller
///
/// Hosts the endpoints the external providers and the payer's browser call
/// back into:
/// - `POST /payment/return/{endpoint}` - asynchronous provider webhook
/// - `GET /payment/success/{payment}` - browser landing after payment
/// - `GET /payment/cancel/{payment}` - browser landing after abandonment
pub struct WebhookController;

impl WebhookController {
    pub fn configure(
        cfg: &mut web::ServiceConfig,
        registry: Arc<DriverRegistry>,
        payments: Arc<dyn PaymentRepository>,
    ) {
        cfg.service(
            web::scope("/payment")
                .app_data(web::Data::new(registry))
                .app_data(web::Data::new(payments))
                .service(payment_return)
                .service(payment_success)
                .service(payment_cancel),
        );
    }
}

/// Generic rejection acknowledgement
///
/// Every rejection answers the same way so the response neither leaks the
/// rejection reason to the caller nor suppresses the provider's own retry
/// and alerting logic. The reason goes to the logs only.
fn rejected() -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({"success": false}))
}

/// Process an asynchronous provider callback
///
/// The handler returns `HttpResponse` directly rather than `Result`: no
/// verification failure may propagate past this boundary as a fault.
/// Acceptance is a plain `OK` with no payment-identifying data in the body.
#[post("/return/{endpoint}")]
async fn payment_return(
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
    form: Option<web::Form<HashMap<String, String>>>,
    registry: web::Data<Arc<DriverRegistry>>,
) -> HttpResponse {
    let endpoint = path.into_inner();

    // Providers differ on whether callbacks arrive as form fields or query
    // parameters; merge both, with the body taking precedence
    let mut params = query.into_inner();
    if let Some(form) = form {
        params.extend(form.into_inner());
    }

    let driver = match registry.by_endpoint(&endpoint) {
        Ok(driver) => driver,
        Err(_) => {
            warn!(endpoint = %endpoint, "Callback for unknown gateway endpoint");
            return rejected();
        }
    };

    match driver.return_gateway(params).await {
        Ok(CallbackOutcome::Completed { payment_id }) => {
            info!(endpoint = %endpoint, payment_id = %payment_id, "Callback accepted");
            HttpResponse::Ok().content_type("text/plain").body("OK")
        }
        Ok(CallbackOutcome::Cancelled { payment_id }) => {
            info!(endpoint = %endpoint, payment_id = %payment_id, "Callback acknowledged, payment cancelled");
            HttpResponse::Ok().content_type("text/plain").body("OK")
        }
        Err(e) => {
            error!(endpoint = %endpoint, error = %e, "Callback rejected");
            rejected()
        }
    }
}

/// Browser landing page after a successful payment
#[get("/success/{payment}")]
async fn payment_success(
    path: web::Path<String>,
    payments: web::Data<Arc<dyn PaymentRepository>>,
) -> HttpResponse {
    let payment_id = path.into_inner();
    match payments.find(&payment_id).await {
        Ok(Some(intent)) => HttpResponse::Ok().json(json!({
            "payment": intent.id,
            "status": intent.status,
        })),
        Ok(None) => HttpResponse::NotFound().json(json!({"error": "Payment not found"})),
        Err(e) => {
            error!(payment_id = %payment_id, error = %e, "Success landing lookup failed");
            HttpResponse::InternalServerError().json(json!({"error": "Lookup failed"}))
        }
    }
}

/// Browser landing page after an abandoned or declined payment
///
/// Lands the payer only; the status itself moves through the callback
/// verifier, not here.
#[get("/cancel/{payment}")]
async fn payment_cancel(
    path: web::Path<String>,
    payments: web::Data<Arc<dyn PaymentRepository>>,
) -> HttpResponse {
    let payment_id = path.into_inner();
    match payments.find(&payment_id).await {
        Ok(Some(intent)) => HttpResponse::Ok().json(json!({
            "payment": intent.id,
            "status": intent.status,
            "cancelled": true,
        })),
        Ok(None) => HttpResponse::NotFound().json(json!({"error": "Payment not found"})),
        Err(e) => {
            error!(payment_id = %payment_id, error = %e, "Cancel landing lookup failed");
            HttpResponse::InternalServerError().json(json!({"error": "Lookup failed"}))
        }
    }
}
