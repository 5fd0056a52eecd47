//! `WooClient` against a mock WooCommerce REST server.
//!
//! The mock runs on a random local port over plain HTTP, so every request
//! must carry an OAuth 1.0a signature in its query string.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use woo_e2e_core::{
    LocationCode, NON_VIRTUAL_PRODUCT_NAME, ProductId, ShippingMethodKind, ShippingZoneFixture,
    ShippingZoneId, VIRTUAL_PRODUCT_NAME,
};
use woo_e2e_suite::config::RestConfig;
use woo_e2e_suite::fixtures::{setup_shipping_zone, teardown};
use woo_e2e_suite::rest::{ProductQuery, StoreApi, WooClient, WooError, ZoneLocation};

const API: &str = "/wp-json/wc/v3";
const MISSING_PRODUCT: u64 = 404;
const THROTTLED_ZONE: u64 = 429;

#[derive(Debug, Clone)]
struct Recorded {
    method: &'static str,
    path: String,
    query: HashMap<String, String>,
    body: Option<Value>,
}

#[derive(Clone, Default)]
struct Mock {
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Mock {
    fn record(
        &self,
        method: &'static str,
        path: String,
        query: &HashMap<String, String>,
        body: Option<Value>,
    ) -> Option<Response> {
        self.requests.lock().unwrap().push(Recorded {
            method,
            path,
            query: query.clone(),
            body,
        });
        let signed = ["oauth_consumer_key", "oauth_nonce", "oauth_timestamp", "oauth_signature"]
            .iter()
            .all(|k| query.contains_key(*k));
        if !signed || query.get("oauth_consumer_key").map(String::as_str) == Some("ck_revoked") {
            return Some(
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "code": "woocommerce_rest_authentication_error",
                        "message": "Invalid signature - provided signature does not match.",
                        "data": { "status": 401 }
                    })),
                )
                    .into_response(),
            );
        }
        None
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

fn product(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "permalink": format!("http://localhost/product/{id}/"),
        "status": "publish",
        "virtual": false,
        "regular_price": "9.99",
        "type": "simple"
    })
}

async fn list_products(
    State(mock): State<Mock>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(denied) = mock.record("GET", format!("{API}/products"), &query, None) {
        return denied;
    }
    let page: u64 = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let items = match page {
        1 => vec![
            product(11, VIRTUAL_PRODUCT_NAME),
            product(12, "Hoodie"),
            product(MISSING_PRODUCT, NON_VIRTUAL_PRODUCT_NAME),
        ],
        2 => vec![product(21, NON_VIRTUAL_PRODUCT_NAME)],
        _ => Vec::new(),
    };
    let mut headers = HeaderMap::new();
    headers.insert("X-WP-Total", HeaderValue::from_static("4"));
    headers.insert("X-WP-TotalPages", HeaderValue::from_static("2"));
    (headers, Json(Value::Array(items))).into_response()
}

async fn delete_product(
    State(mock): State<Mock>,
    Path(id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(denied) = mock.record("DELETE", format!("{API}/products/{id}"), &query, None) {
        return denied;
    }
    if id == MISSING_PRODUCT {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "code": "woocommerce_rest_product_invalid_id",
                "message": "Invalid ID.",
                "data": { "status": 404 }
            })),
        )
            .into_response();
    }
    Json(product(id, "deleted")).into_response()
}

async fn list_zones(
    State(mock): State<Mock>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(denied) = mock.record("GET", format!("{API}/shipping/zones"), &query, None) {
        return denied;
    }
    Json(json!([
        { "id": 0, "name": "Locations not covered by your other zones", "order": 0 },
        { "id": 7, "name": "Somewhere", "order": 0 }
    ]))
    .into_response()
}

async fn create_zone(
    State(mock): State<Mock>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(denied) = mock.record("POST", format!("{API}/shipping/zones"), &query, Some(body.clone())) {
        return denied;
    }
    (
        StatusCode::CREATED,
        Json(json!({ "id": 7, "name": body["name"], "order": 0 })),
    )
        .into_response()
}

async fn update_locations(
    State(mock): State<Mock>,
    Path(id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(denied) = mock.record(
        "PUT",
        format!("{API}/shipping/zones/{id}/locations"),
        &query,
        Some(body.clone()),
    ) {
        return denied;
    }
    Json(body).into_response()
}

async fn add_method(
    State(mock): State<Mock>,
    Path(id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(denied) = mock.record(
        "POST",
        format!("{API}/shipping/zones/{id}/methods"),
        &query,
        Some(body.clone()),
    ) {
        return denied;
    }
    Json(json!({
        "instance_id": 3,
        "method_id": body["method_id"],
        "title": "Flat rate",
        "enabled": true
    }))
    .into_response()
}

async fn delete_zone(
    State(mock): State<Mock>,
    Path(id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(denied) = mock.record("DELETE", format!("{API}/shipping/zones/{id}"), &query, None) {
        return denied;
    }
    if id == THROTTLED_ZONE {
        let mut headers = HeaderMap::new();
        headers.insert("Retry-After", HeaderValue::from_static("7"));
        return (StatusCode::TOO_MANY_REQUESTS, headers).into_response();
    }
    Json(json!({ "id": id, "name": "Somewhere", "order": 0 })).into_response()
}

/// Start the mock server and return a client for it.
async fn start(consumer_key: &str) -> (WooClient, Mock) {
    let mock = Mock::default();
    let app = Router::new()
        .route(&format!("{API}/products"), get(list_products))
        .route(&format!("{API}/products/{{id}}"), delete(delete_product))
        .route(
            &format!("{API}/shipping/zones"),
            get(list_zones).post(create_zone),
        )
        .route(&format!("{API}/shipping/zones/{{id}}"), delete(delete_zone))
        .route(
            &format!("{API}/shipping/zones/{{id}}/locations"),
            put(update_locations),
        )
        .route(&format!("{API}/shipping/zones/{{id}}/methods"), post(add_method))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = RestConfig::new(
        Url::parse(&format!("http://{addr}/")).unwrap(),
        consumer_key.to_string(),
        SecretString::from("cs_test".to_string()),
    );
    (WooClient::new(&config).unwrap(), mock)
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_plain_http_requests_are_oauth_signed() {
    let (client, mock) = start("ck_test").await;

    client.list_shipping_zones().await.unwrap();

    let request = &mock.requests()[0];
    assert_eq!(request.query["oauth_consumer_key"], "ck_test");
    assert_eq!(request.query["oauth_signature_method"], "HMAC-SHA256");
    assert_eq!(request.query["oauth_version"], "1.0");
    assert!(!request.query["oauth_signature"].is_empty());
}

#[tokio::test]
async fn test_nonce_changes_per_request() {
    let (client, mock) = start("ck_test").await;

    client.list_shipping_zones().await.unwrap();
    client.list_shipping_zones().await.unwrap();

    let requests = mock.requests();
    assert_ne!(
        requests[0].query["oauth_nonce"],
        requests[1].query["oauth_nonce"]
    );
}

#[tokio::test]
async fn test_rejected_credentials_map_to_unauthorized() {
    let (client, _mock) = start("ck_revoked").await;

    let err = client.list_shipping_zones().await.unwrap_err();

    match err {
        WooError::Unauthorized(message) => assert!(message.contains("Invalid signature")),
        other => panic!("unexpected error: {other}"),
    }
}

// ============================================================================
// Shipping zones
// ============================================================================

#[tokio::test]
async fn test_setup_sends_zone_requests() {
    let (client, mock) = start("ck_test").await;

    let zone_id = setup_shipping_zone(&client, &ShippingZoneFixture::default())
        .await
        .unwrap();
    assert_eq!(zone_id, ShippingZoneId::new(7));

    let requests = mock.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].body, Some(json!({ "name": "Somewhere" })));
    assert_eq!(requests[1].method, "PUT");
    assert_eq!(requests[1].path, "/wp-json/wc/v3/shipping/zones/7/locations");
    assert_eq!(
        requests[1].body,
        Some(json!([{ "code": "CN", "type": "country" }]))
    );
    assert_eq!(requests[2].path, "/wp-json/wc/v3/shipping/zones/7/methods");
    assert_eq!(requests[2].body, Some(json!({ "method_id": "flat_rate" })));
}

#[tokio::test]
async fn test_zone_method_response_parsed() {
    let (client, _mock) = start("ck_test").await;

    let locations = client
        .update_shipping_zone_locations(
            ShippingZoneId::new(7),
            &[ZoneLocation::country(LocationCode::parse("cn").unwrap())],
        )
        .await
        .unwrap();
    assert_eq!(locations[0].code.as_str(), "CN");

    let method = client
        .add_shipping_zone_method(ShippingZoneId::new(7), ShippingMethodKind::FlatRate)
        .await
        .unwrap();
    assert_eq!(method.method_id, "flat_rate");
    assert!(method.enabled);
}

#[tokio::test]
async fn test_rate_limit_reads_retry_after() {
    let (client, _mock) = start("ck_test").await;

    let err = client
        .delete_shipping_zone(ShippingZoneId::new(THROTTLED_ZONE), true)
        .await
        .unwrap_err();

    assert!(matches!(err, WooError::RateLimited(7)));
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn test_list_products_reads_total_pages() {
    let (client, mock) = start("ck_test").await;

    let page = client
        .list_products(&ProductQuery::all_statuses(1))
        .await
        .unwrap();

    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items.len(), 3);
    let query = &mock.requests()[0].query;
    assert_eq!(query["per_page"], "100");
    assert_eq!(query["status"], "any");
}

#[tokio::test]
async fn test_list_all_products_follows_pages() {
    let (client, mock) = start("ck_test").await;

    let products = client.list_all_products().await.unwrap();

    assert_eq!(products.len(), 4);
    let pages: Vec<String> = mock
        .requests()
        .iter()
        .map(|r| r.query["page"].clone())
        .collect();
    assert_eq!(pages, vec!["1", "2"]);
}

#[tokio::test]
async fn test_delete_missing_product_is_not_found() {
    let (client, _mock) = start("ck_test").await;

    let err = client
        .delete_product(ProductId::new(MISSING_PRODUCT), true)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().contains("Invalid ID."));
}

#[tokio::test]
async fn test_teardown_over_http() {
    let (client, mock) = start("ck_test").await;

    let report = teardown(&client, Some(ShippingZoneId::new(7))).await;

    assert!(report.is_clean());
    assert!(report.zone_deleted);
    let mut deleted = report.deleted_products.clone();
    deleted.sort();
    assert_eq!(
        deleted,
        vec![
            ProductId::new(11),
            ProductId::new(21),
            ProductId::new(MISSING_PRODUCT)
        ]
    );

    let deletes: Vec<Recorded> = mock
        .requests()
        .into_iter()
        .filter(|r| r.method == "DELETE")
        .collect();
    assert_eq!(deletes.len(), 4);
    assert!(deletes.iter().all(|r| r.query["force"] == "true"));
    assert!(
        !deletes
            .iter()
            .any(|r| r.path == "/wp-json/wc/v3/products/12")
    );
    assert_eq!(
        deletes.last().unwrap().path,
        "/wp-json/wc/v3/shipping/zones/7"
    );
}
