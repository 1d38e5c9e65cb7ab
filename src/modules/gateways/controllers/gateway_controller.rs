use std::sync::Arc;

use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::core::Result;
use crate::modules::gateways::services::DriverRegistry;

/// Gateway metadata controller
///
/// - `GET /gateways` - registered driver table
/// - `GET /gateways/{name}/config` - admin-facing configuration template
/// - `GET /gateways/{name}/subscriptions/{id}` - subscription capability call
pub struct GatewayController;

impl GatewayController {
    pub fn configure(cfg: &mut web::ServiceConfig, registry: Arc<DriverRegistry>) {
        cfg.service(
            web::scope("/gateways")
                .app_data(web::Data::new(registry))
                .service(list_gateways)
                .service(config_template)
                .service(check_subscription),
        );
    }
}

#[get("")]
async fn list_gateways(registry: web::Data<Arc<DriverRegistry>>) -> HttpResponse {
    HttpResponse::Ok().json(registry.descriptors())
}

#[get("/{name}/config")]
async fn config_template(
    path: web::Path<String>,
    registry: web::Data<Arc<DriverRegistry>>,
) -> Result<HttpResponse> {
    let driver = registry.get(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(driver.config_template()))
}

#[get("/{name}/subscriptions/{subscription_id}")]
async fn check_subscription(
    path: web::Path<(String, String)>,
    registry: web::Data<Arc<DriverRegistry>>,
) -> Result<HttpResponse> {
    let (name, subscription_id) = path.into_inner();
    let driver = registry.get(&name)?;
    let active = driver.check_subscription(&subscription_id).await;
    Ok(HttpResponse::Ok().json(json!({ "active": active })))
}
