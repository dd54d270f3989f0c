use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    server::router(Arc::new(engine))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn seed(app: &Router) {
    let (status, _) = send(
        app,
        "POST",
        "/currencies",
        Some(json!([{"code": "gel", "description": "Georgian lari"}])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        app,
        "POST",
        "/accounts",
        Some(json!([
            {"id": 0, "name": "Cash", "currency_code": "GEL"},
            {"id": 0, "name": "Savings", "currency_code": "GEL"}
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        app,
        "POST",
        "/categories",
        Some(json!([
            {"id": 0, "type": "Income", "name": "Salary"},
            {"id": 0, "type": "Transfer", "name": "Moves"}
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn currencies_round_trip_with_normalized_codes() {
    let app = app().await;
    seed(&app).await;

    let (status, body) = send(&app, "GET", "/currencies", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"code": "GEL", "description": "Georgian lari"}]));

    let (status, body) = send(&app, "POST", "/currencies", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unchanged"], 1);
}

#[tokio::test]
async fn invalid_currency_batch_is_rejected_and_rolled_back() {
    let app = app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/currencies",
        Some(json!([{"code": "USD"}, {"code": "  "}])),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("rolled back"));

    let (_, body) = send(&app, "GET", "/currencies", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn transfers_are_paired_over_http() {
    let app = app().await;
    seed(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/operations",
        Some(json!([
            {
                "entryNo": 0,
                "dateTime": "2024-04-07T00:36",
                "type": "Transfer",
                "amount": -150.25,
                "sourceId": 1,
                "currencyCode": "GEL",
                "categoryId": 2,
                "transactionNo": 0,
                "description": "to savings"
            },
            {
                "entryNo": 0,
                "dateTime": "2024-04-07T00:36",
                "type": "Transfer",
                "amount": "150.25",
                "sourceId": 2,
                "currencyCode": "GEL",
                "categoryId": 2,
                "transactionNo": 0,
                "description": "to savings"
            }
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inserted"], 2);

    let (status, body) = send(&app, "GET", "/operations", None).await;
    assert_eq!(status, StatusCode::OK);
    let operations = body.as_array().unwrap();
    assert_eq!(operations.len(), 2);
    for operation in operations {
        assert_eq!(operation["transactionNo"], 1);
        assert_eq!(operation["dateTime"], "2024-04-07T00:36");
    }

    let (status, body) = send(&app, "GET", "/statistics/accounts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Cash");
    assert_eq!(body[0]["total"], "-150.25");
}

#[tokio::test]
async fn negative_income_is_unprocessable() {
    let app = app().await;
    seed(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/operations",
        Some(json!([{
            "dateTime": "2024-04-07T09:00",
            "type": "Income",
            "amount": "-1",
            "sourceId": 1,
            "currencyCode": "GEL",
            "categoryId": 1
        }])),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unreadable_payload_gets_an_error_body() {
    let app = app().await;
    seed(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/operations",
        Some(json!([{
            "dateTime": "2024-04-07T09:00:30",
            "type": "Income",
            "amount": "1",
            "sourceId": 1,
            "currencyCode": "GEL",
            "categoryId": 1
        }])),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|message| message.contains("dateTime"))
    );

    let (status, body) = send(&app, "DELETE", "/accounts", Some(json!({"id": 1}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());

    let (_, body) = send(&app, "GET", "/operations", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn delete_reports_absent_keys() {
    let app = app().await;
    seed(&app).await;

    let (status, body) = send(
        &app,
        "DELETE",
        "/currencies",
        Some(json!([{"code": "usd"}])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["absent"], 1);
    assert_eq!(body["deleted"], 0);

    let (status, body) = send(&app, "DELETE", "/accounts", Some(json!([{"id": 2}]))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 1);
}
