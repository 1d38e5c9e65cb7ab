use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::core::{AppError, Currency, Result};
use crate::modules::gateways::services::DriverRegistry;
use crate::modules::payments::{PaymentIntent, PaymentRepository};

/// Payment intent controller
///
/// - `POST /payments` - create a pending intent
/// - `GET /payments/{id}` - fetch an intent
/// - `POST /payments/{id}/checkout/{gateway}` - run the initiation flow
/// - `POST /payments/{id}/refund/{gateway}` - refund capability call
pub struct PaymentController;

impl PaymentController {
    pub fn configure(
        cfg: &mut web::ServiceConfig,
        registry: Arc<DriverRegistry>,
        payments: Arc<dyn PaymentRepository>,
    ) {
        cfg.service(
            web::scope("/payments")
                .app_data(web::Data::new(registry))
                .app_data(web::Data::new(payments))
                .service(create_payment)
                .service(get_payment)
                .service(checkout)
                .service(refund),
        );
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub amount: Decimal,
    pub currency: Currency,
    pub description: String,
    pub payer_email: String,
}

#[derive(Debug, Deserialize)]
pub struct RefundRequest {
    #[serde(default)]
    pub data: serde_json::Value,
}

#[post("")]
async fn create_payment(
    body: web::Json<CreatePaymentRequest>,
    payments: web::Data<Arc<dyn PaymentRepository>>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    let intent = PaymentIntent::new(
        request.amount,
        request.currency,
        request.description,
        request.payer_email,
    )?;
    let created = payments.create(intent).await?;

    info!(payment_id = %created.id, amount = %created.amount, "Payment intent created");
    Ok(HttpResponse::Created().json(created))
}

#[get("/{id}")]
async fn get_payment(
    path: web::Path<String>,
    payments: web::Data<Arc<dyn PaymentRepository>>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let intent = payments
        .find(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Payment {}", id)))?;
    Ok(HttpResponse::Ok().json(intent))
}

/// Run the initiation flow for a pending intent
///
/// On success the caller redirects the payer to the returned URL. The
/// intent itself stays pending; only the callback verifier completes it.
#[post("/{id}/checkout/{gateway}")]
async fn checkout(
    path: web::Path<(String, String)>,
    registry: web::Data<Arc<DriverRegistry>>,
    payments: web::Data<Arc<dyn PaymentRepository>>,
) -> Result<HttpResponse> {
    let (id, gateway) = path.into_inner();

    let intent = payments
        .find(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Payment {}", id)))?;
    if !intent.is_pending() {
        return Err(AppError::validation(format!(
            "Payment {} is {}, not pending",
            intent.id, intent.status
        )));
    }

    let driver = registry.get(&gateway)?;
    let redirect = driver.process_gateway(&intent).await?;

    info!(payment_id = %intent.id, gateway = %gateway, "Checkout redirect issued");
    Ok(HttpResponse::Ok().json(json!({ "url": redirect.url })))
}

/// Refund capability call; drivers without refund support report refusal
#[post("/{id}/refund/{gateway}")]
async fn refund(
    path: web::Path<(String, String)>,
    body: Option<web::Json<RefundRequest>>,
    registry: web::Data<Arc<DriverRegistry>>,
    payments: web::Data<Arc<dyn PaymentRepository>>,
) -> Result<HttpResponse> {
    let (id, gateway) = path.into_inner();

    let intent = payments
        .find(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Payment {}", id)))?;
    let driver = registry.get(&gateway)?;

    let data = body.map(|b| b.into_inner().data).unwrap_or_default();
    let refunded = driver.process_refund(&intent, &data).await;

    Ok(HttpResponse::Ok().json(json!({ "refunded": refunded })))
}
