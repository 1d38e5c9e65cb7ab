use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpResponse, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paybridge::config::Config;
use paybridge::modules::gateways::controllers::{GatewayController, PaymentController};
use paybridge::modules::gateways::models::CallbackRoutes;
use paybridge::modules::gateways::services::{
    DriverRegistry, ExampleDriver, PayByLinkConfig, PayByLinkDriver,
};
use paybridge::modules::payments::{MemoryPaymentRepository, PaymentRepository};
use paybridge::modules::signing::{FileSecretStore, SecretStore};
use paybridge::modules::webhooks::{CallbackVerifier, WebhookController};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paybridge=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    config.validate().expect("Configuration validation failed");

    tracing::info!("Starting Paybridge gateway driver service");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Shared HTTP client with a bounded per-call timeout; a hung provider
    // surfaces as a transport error, never as a hung request
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.webhook.provider_timeout_secs))
        .build()
        .expect("Failed to build HTTP client");

    let secrets: Arc<dyn SecretStore> =
        Arc::new(FileSecretStore::new(config.webhook.secret_path.clone()));
    let payments: Arc<dyn PaymentRepository> = Arc::new(MemoryPaymentRepository::new());
    let verifier = Arc::new(CallbackVerifier::new(payments.clone(), secrets.clone()));
    let routes = CallbackRoutes::new(config.app.public_base_url.clone());

    let mut registry = DriverRegistry::new();
    registry
        .register(Arc::new(PayByLinkDriver::new(
            PayByLinkConfig {
                shop_id: config.paybylink.shop_id,
                secret_key: config.paybylink.secret_key.clone(),
                base_url: config.paybylink.base_url.clone(),
            },
            routes.clone(),
            http_client.clone(),
            secrets.clone(),
            verifier.clone(),
        )))
        .expect("Failed to register PayByLink driver");
    registry
        .register(Arc::new(ExampleDriver::new(
            config.example.checkout_url.clone(),
            routes,
            payments.clone(),
        )))
        .expect("Failed to register example driver");
    let registry = Arc::new(registry);

    tracing::info!(
        drivers = ?registry.descriptors().iter().map(|d| d.driver).collect::<Vec<_>>(),
        "Gateway drivers registered"
    );

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        let registry = registry.clone();
        let payments = payments.clone();
        App::new()
            .wrap(TracingLogger::default())
            .configure(|cfg| WebhookController::configure(cfg, registry.clone(), payments.clone()))
            .configure(|cfg| {
                PaymentController::configure(cfg, registry.clone(), payments.clone())
            })
            .configure(|cfg| GatewayController::configure(cfg, registry.clone()))
            .route("/health", web::get().to(health_check))
    })
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "paybridge"
    }))
}
