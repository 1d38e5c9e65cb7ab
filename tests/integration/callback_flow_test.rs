// Integration tests for the inbound callback path
//
// Exercises the full HTTP surface of `POST /payment/return/{endpoint}`:
// acceptance acknowledges with a bare `OK`, every rejection answers
// `500 {"success": false}` so the provider's retry logic stays alive, and
// nothing about the rejection reason leaks to the caller.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{test, App};
use rust_decimal_macros::dec;

use paybridge::core::Currency;
use paybridge::modules::gateways::models::CallbackRoutes;
use paybridge::modules::gateways::services::{
    DriverRegistry, ExampleDriver, PayByLinkConfig, PayByLinkDriver,
};
use paybridge::modules::payments::{
    MemoryPaymentRepository, PaymentIntent, PaymentRepository, PaymentStatus,
};
use paybridge::modules::signing::{CorrelationToken, MemorySecretStore, SecretStore, WebhookSecret};
use paybridge::modules::webhooks::{CallbackVerifier, WebhookController};

struct Stack {
    payments: Arc<MemoryPaymentRepository>,
    secrets: Arc<MemorySecretStore>,
    registry: Arc<DriverRegistry>,
}

fn stack() -> Stack {
    let payments = Arc::new(MemoryPaymentRepository::new());
    let secrets = Arc::new(MemorySecretStore::new());
    let verifier = Arc::new(CallbackVerifier::new(payments.clone(), secrets.clone()));
    let routes = CallbackRoutes::new("https://shop.example.com");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
        .expect("client");

    let mut registry = DriverRegistry::new();
    registry
        .register(Arc::new(PayByLinkDriver::new(
            PayByLinkConfig {
                shop_id: 1000,
                secret_key: "test-secret-key".to_string(),
                // The callback path never calls out; nothing listens here
                base_url: "http://127.0.0.1:9".to_string(),
            },
            routes.clone(),
            client,
            secrets.clone(),
            verifier,
        )))
        .expect("register paybylink");
    registry
        .register(Arc::new(ExampleDriver::new(
            "https://checkout.example.com/pay",
            routes,
            payments.clone(),
        )))
        .expect("register example");

    Stack {
        payments,
        secrets,
        registry: Arc::new(registry),
    }
}

async fn seed_intent(payments: &MemoryPaymentRepository) -> PaymentIntent {
    let intent =
        PaymentIntent::new(dec!(20.00), Currency::PLN, "Order #42", "payer@example.com")
            .expect("intent");
    payments.create(intent.clone()).await.expect("create");
    intent
}

macro_rules! webhook_app {
    ($stack:expr) => {
        test::init_service(App::new().configure(|cfg| {
            WebhookController::configure(
                cfg,
                $stack.registry.clone(),
                $stack.payments.clone() as Arc<dyn PaymentRepository>,
            )
        }))
        .await
    };
}

#[actix_web::test]
async fn test_valid_callback_completes_payment_and_acks_ok() {
    let stack = stack();
    let app = webhook_app!(stack);
    let intent = seed_intent(&stack.payments).await;

    let fingerprint = stack.secrets.get_or_create().await.unwrap().fingerprint();
    let control = CorrelationToken::new(intent.id.clone(), fingerprint)
        .encode()
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/payment/return/paybylink")
        .set_form([
            ("control", control.as_str()),
            ("transactionId", "tx-abc"),
        ])
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), 200);
    let body = test::read_body(res).await;
    // Bare acknowledgement: no payment data, no token echo
    assert_eq!(body, "OK");

    let stored = stack.payments.find(&intent.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PaymentStatus::Completed);
    assert_eq!(stored.transaction_ref.as_deref(), Some("tx-abc"));
    // Full inbound payload recorded for audit
    let audit = stored.gateway_response.expect("audit payload");
    assert_eq!(audit["transactionId"], "tx-abc");
}

#[actix_web::test]
async fn test_stale_secret_callback_is_rejected_and_payment_stays_pending() {
    let stack = stack();
    let app = webhook_app!(stack);
    let intent = seed_intent(&stack.payments).await;

    // Token minted under an older secret, then the secret rotates
    let old_fingerprint = stack.secrets.get_or_create().await.unwrap().fingerprint();
    stack.secrets.set(WebhookSecret::generate()).await;
    let control = CorrelationToken::new(intent.id.clone(), old_fingerprint)
        .encode()
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/payment/return/paybylink")
        .set_form([("control", control.as_str()), ("transactionId", "tx-abc")])
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), 500);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body, serde_json::json!({"success": false}));

    let stored = stack.payments.find(&intent.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PaymentStatus::Pending);
}

#[actix_web::test]
async fn test_malformed_token_is_rejected_generically() {
    let stack = stack();
    let app = webhook_app!(stack);
    seed_intent(&stack.payments).await;

    let req = test::TestRequest::post()
        .uri("/payment/return/paybylink")
        .set_form([("control", "{definitely-not-json"), ("transactionId", "tx")])
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), 500);
    let body = test::read_body(res).await;
    // Generic acknowledgement only; the reason stays in the logs
    assert_eq!(body, r#"{"success":false}"#.as_bytes());
}

#[actix_web::test]
async fn test_unknown_payment_is_rejected() {
    let stack = stack();
    let app = webhook_app!(stack);

    let fingerprint = stack.secrets.get_or_create().await.unwrap().fingerprint();
    let control = CorrelationToken::new("no-such-payment", fingerprint)
        .encode()
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/payment/return/paybylink")
        .set_form([("control", control.as_str()), ("transactionId", "tx")])
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), 500);
}

#[actix_web::test]
async fn test_missing_parameters_are_rejected() {
    let stack = stack();
    let app = webhook_app!(stack);
    let intent = seed_intent(&stack.payments).await;

    let fingerprint = stack.secrets.get_or_create().await.unwrap().fingerprint();
    let control = CorrelationToken::new(intent.id.clone(), fingerprint)
        .encode()
        .unwrap();

    // No transactionId
    let req = test::TestRequest::post()
        .uri("/payment/return/paybylink")
        .set_form([("control", control.as_str())])
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 500);

    // No control
    let req = test::TestRequest::post()
        .uri("/payment/return/paybylink")
        .set_form([("transactionId", "tx-abc")])
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 500);

    let stored = stack.payments.find(&intent.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PaymentStatus::Pending);
}

#[actix_web::test]
async fn test_unknown_endpoint_slug_is_rejected() {
    let stack = stack();
    let app = webhook_app!(stack);

    let req = test::TestRequest::post()
        .uri("/payment/return/no-such-gateway")
        .set_form([("control", "x"), ("transactionId", "tx")])
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), 500);
}

#[actix_web::test]
async fn test_replayed_callback_does_not_overwrite_completion() {
    let stack = stack();
    let app = webhook_app!(stack);
    let intent = seed_intent(&stack.payments).await;

    let fingerprint = stack.secrets.get_or_create().await.unwrap().fingerprint();
    let control = CorrelationToken::new(intent.id.clone(), fingerprint)
        .encode()
        .unwrap();

    let first = test::TestRequest::post()
        .uri("/payment/return/paybylink")
        .set_form([("control", control.as_str()), ("transactionId", "tx-1")])
        .to_request();
    assert_eq!(test::call_service(&app, first).await.status(), 200);

    // Same callback again with a different transaction id
    let replay = test::TestRequest::post()
        .uri("/payment/return/paybylink")
        .set_form([("control", control.as_str()), ("transactionId", "tx-2")])
        .to_request();
    assert_eq!(test::call_service(&app, replay).await.status(), 500);

    let stored = stack.payments.find(&intent.id).await.unwrap().unwrap();
    assert_eq!(stored.transaction_ref.as_deref(), Some("tx-1"));
}

#[actix_web::test]
async fn test_example_driver_return_completes_via_same_endpoint_router() {
    let stack = stack();
    let app = webhook_app!(stack);
    let intent = seed_intent(&stack.payments).await;

    let req = test::TestRequest::post()
        .uri("/payment/return/example-endpoint")
        .set_form([
            ("payment_id", intent.id.as_str()),
            ("state", "approved"),
            ("transactionId", "ex-tx-9"),
        ])
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), 200);
    let stored = stack.payments.find(&intent.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PaymentStatus::Completed);
}

#[actix_web::test]
async fn test_success_and_cancel_landing_pages() {
    let stack = stack();
    let app = webhook_app!(stack);
    let intent = seed_intent(&stack.payments).await;

    let req = test::TestRequest::get()
        .uri(&format!("/payment/success/{}", intent.id))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["payment"], intent.id.as_str());

    let req = test::TestRequest::get()
        .uri(&format!("/payment/cancel/{}", intent.id))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 200);

    // Landing pages never mutate status
    let stored = stack.payments.find(&intent.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PaymentStatus::Pending);

    let req = test::TestRequest::get()
        .uri("/payment/success/missing")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}
