//! Integration tests for `RestStore` using wiremock HTTP mocks.

use catalog_core::ProductRecord;
use catalog_store::{ProductStore, RestStore, StoreError};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn test_store(base_url: &str) -> RestStore {
    RestStore::new(base_url, "test-key", 5).expect("client construction should not fail")
}

fn record(sku: &str, name: &str) -> ProductRecord {
    ProductRecord {
        sku: sku.to_string(),
        name: name.to_string(),
        image_url: format!("https://cdn.example.com/product-images/{sku}.jpg"),
    }
}

#[tokio::test]
async fn upsert_posts_whole_batch_with_conflict_key() {
    let server = MockServer::start().await;
    let batch = vec![record("A1", "Widget"), record("B2", "Gadget")];

    Mock::given(method("POST"))
        .and(path("/rest/v1/products"))
        .and(query_param("on_conflict", "sku"))
        .and(header("apikey", "test-key"))
        .and(header("authorization", "Bearer test-key"))
        .and(|req: &Request| {
            req.headers.get("prefer").and_then(|v| v.to_str().ok())
                == Some("resolution=merge-duplicates,return=representation")
        })
        .and(body_json(&batch))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([
            { "id": 1, "sku": "A1", "name": "Widget", "image_url": "https://cdn.example.com/product-images/A1.jpg" },
            { "id": 2, "sku": "B2", "name": "Gadget", "image_url": "https://cdn.example.com/product-images/B2.jpg" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let store = test_store(&server.uri());
    let persisted = store.upsert_products(&batch).await.expect("upsert");

    assert_eq!(persisted, batch);
}

#[tokio::test]
async fn upsert_surfaces_store_error_message_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/products"))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "code": "21000",
            "details": null,
            "hint": "Ensure that no rows proposed for insertion within the same command have duplicate constrained values.",
            "message": "ON CONFLICT DO UPDATE command cannot affect row a second time"
        })))
        .mount(&server)
        .await;

    let store = test_store(&server.uri());
    let err = store
        .upsert_products(&[record("A1", "One"), record("A1", "Two")])
        .await
        .expect_err("should fail");

    assert!(matches!(err, StoreError::Api { status: 409, .. }));
    assert_eq!(
        err.to_string(),
        "ON CONFLICT DO UPDATE command cannot affect row a second time"
    );
}

#[tokio::test]
async fn upsert_plain_text_error_is_passed_through() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/products"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let store = test_store(&server.uri());
    let err = store
        .upsert_products(&[record("A1", "Widget")])
        .await
        .expect_err("should fail");

    assert_eq!(err.to_string(), "bad gateway");
}

#[tokio::test]
async fn upsert_rejects_unexpected_response_shape() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/products"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({ "ok": true })))
        .mount(&server)
        .await;

    let store = test_store(&server.uri());
    let err = store
        .upsert_products(&[record("A1", "Widget")])
        .await
        .expect_err("should fail");

    assert!(matches!(err, StoreError::Deserialize { .. }));
}

#[tokio::test]
async fn list_products_selects_all_columns() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .and(query_param("select", "*"))
        .and(header("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "sku": "A1", "name": "Widget", "image_url": "u1", "created_at": "2026-01-01T00:00:00Z" }
        ])))
        .mount(&server)
        .await;

    let store = test_store(&server.uri());
    let rows = store.list_products().await.expect("list");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].sku, "A1");
    assert_eq!(rows[0].image_url, "u1");
}

#[tokio::test]
async fn health_check_reads_a_single_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .and(query_param("select", "sku"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let store = test_store(&server.uri());
    store.health_check().await.expect("healthy");
}

#[tokio::test]
async fn health_check_fails_on_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(serde_json::json!({ "message": "Invalid API key" })),
        )
        .mount(&server)
        .await;

    let store = test_store(&server.uri());
    let err = store.health_check().await.expect_err("should fail");
    assert_eq!(err.to_string(), "Invalid API key");
}

#[tokio::test]
async fn upsert_keeps_gateway_json_error_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/products"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "error": "Invalid authentication credentials" })),
        )
        .mount(&server)
        .await;

    let store = test_store(&server.uri());
    let err = store
        .upsert_products(&[record("A1", "Widget")])
        .await
        .expect_err("should fail");

    assert!(matches!(err, StoreError::Api { status: 401, .. }));
    assert!(
        err.to_string().contains("Invalid authentication credentials"),
        "got: {err}"
    );
}
