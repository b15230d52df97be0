use std::sync::Arc;

use actix_web::{body::to_bytes, http::StatusCode, test, web, App};
use async_trait::async_trait;
use blockwatch_domain::services::telemetry::{init_telemetry, TelemetryConfig, TelemetryGuard};
use blockwatch_domain::{Registry, Transaction};
use blockwatch_monitor::{poll_once, BlockSource, MonitorError};

use crate::handlers::{
    metrics_handler, subscribe::SubscribeRequest, subscribe_handler, transactions_handler,
};
use crate::state::AppState;

fn telemetry() -> TelemetryGuard {
    let config = TelemetryConfig::from_env("API_TEST");
    init_telemetry(&config).expect("telemetry inits")
}

fn state_with(registry: Arc<Registry>) -> AppState {
    AppState::new(registry, telemetry())
}

struct FixedSource(u64);

#[async_trait]
impl BlockSource for FixedSource {
    async fn latest_block_height(&self) -> Result<u64, MonitorError> {
        Ok(self.0)
    }
}

#[actix_web::test]
async fn subscribe_returns_success_body() {
    let state = state_with(Arc::new(Registry::new()));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::resource("/subscribe").route(web::post().to(subscribe_handler))),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/subscribe")
        .set_json(&SubscribeRequest {
            address: "0xabc".into(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body()).await.unwrap();
    assert_eq!(&body[..], b"Successfully subscribed to address: 0xabc\n");
}

#[actix_web::test]
async fn duplicate_subscription_conflicts() {
    let state = state_with(Arc::new(Registry::new()));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::resource("/subscribe").route(web::post().to(subscribe_handler))),
    )
    .await;

    for expected in [StatusCode::OK, StatusCode::CONFLICT] {
        let req = test::TestRequest::post()
            .uri("/subscribe")
            .set_json(&SubscribeRequest {
                address: "0xabc".into(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);
    }
}

#[actix_web::test]
async fn malformed_subscribe_payload_is_rejected() {
    let registry = Arc::new(Registry::new());
    let state = state_with(Arc::clone(&registry));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::resource("/subscribe").route(web::post().to(subscribe_handler))),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/subscribe")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"address\":")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(registry.subscribed_addresses().is_empty());
}

#[actix_web::test]
async fn wrong_methods_are_rejected() {
    let state = state_with(Arc::new(Registry::new()));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::resource("/subscribe").route(web::post().to(subscribe_handler)))
            .service(
                web::resource("/transactions/{address}")
                    .route(web::get().to(transactions_handler)),
            ),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/subscribe").to_request())
        .await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let resp = test::call_service(
        &app,
        test::TestRequest::post().uri("/transactions/0xabc").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[actix_web::test]
async fn fresh_subscription_lists_empty_array() {
    let registry = Arc::new(Registry::new());
    registry.subscribe("0xabc");
    let state = state_with(registry);
    let app = test::init_service(
        App::new().app_data(web::Data::new(state)).service(
            web::resource("/transactions/{address}").route(web::get().to(transactions_handler)),
        ),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/transactions/0xabc")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body()).await.unwrap();
    let observed: Vec<Transaction> = serde_json::from_slice(&body).unwrap();
    assert!(observed.is_empty());
}

#[actix_web::test]
async fn unknown_address_is_not_found() {
    let state = state_with(Arc::new(Registry::new()));
    let app = test::init_service(
        App::new().app_data(web::Data::new(state)).service(
            web::resource("/transactions/{address}").route(web::get().to(transactions_handler)),
        ),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/transactions/0xnotsubscribed")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn poll_cycle_surfaces_transaction_over_http() {
    let registry = Arc::new(Registry::new());
    let state = state_with(Arc::clone(&registry));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::resource("/subscribe").route(web::post().to(subscribe_handler)))
            .service(
                web::resource("/transactions/{address}")
                    .route(web::get().to(transactions_handler)),
            ),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/subscribe")
        .set_json(&SubscribeRequest {
            address: "0xabc".into(),
        })
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    poll_once(registry.as_ref(), &FixedSource(100)).await;

    let req = test::TestRequest::get()
        .uri("/transactions/0xabc")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body()).await.unwrap();
    let observed: Vec<Transaction> = serde_json::from_slice(&body).unwrap();
    assert_eq!(observed.len(), 1);
    assert_eq!(observed[0].block_number, 100);
    assert_eq!(observed[0].to, "0xabc");
}

#[actix_web::test]
async fn metrics_endpoint_renders() {
    let state = state_with(Arc::new(Registry::new()));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .route("/metrics", web::get().to(metrics_handler)),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/metrics").to_request())
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
}
