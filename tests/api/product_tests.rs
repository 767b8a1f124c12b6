//! Product API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{product_body, unique_sku, TestApp};

/// Creating a product returns 201, a Location header and the canonical SKU
#[tokio::test]
async fn test_create_product_normalizes_sku() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/products",
            &json!({
                "name": "Test",
                "sku": "test-001",
                "price": 29.99,
                "quantityInStock": 100,
            }),
        )
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["sku"], "TEST-001");
    assert_eq!(body["price"], 29.99);
    assert_eq!(body["inventoryValue"], 2999.0);
    assert_eq!(
        response.headers()["location"],
        format!("/api/products/{}", body["id"])
    );
}

/// Create then fetch by id returns the same data
#[tokio::test]
async fn test_create_then_get_by_id() {
    let app = TestApp::new();
    let created = app.create_product(product_body(12.5, 3, None)).await;

    let response = app
        .get(&format!("/api/products/{}", created["id"]))
        .await;

    response.assert_status_ok();
    let fetched = response.json::<Value>();
    for field in ["name", "sku", "price", "quantityInStock"] {
        assert_eq!(fetched[field], created[field], "field {}", field);
    }
}

#[tokio::test]
async fn test_get_missing_product_returns_404() {
    let app = TestApp::new();

    let response = app.get("/api/products/9999").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["code"], 10001);
}

#[tokio::test]
async fn test_non_positive_or_malformed_id_returns_400() {
    let app = TestApp::new();

    app.get("/api/products/0")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    app.get("/api/products/-3")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    app.get("/api/products/abc")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_product_rejects_invalid_fields() {
    let app = TestApp::new();

    let bad_sku = app
        .post(
            "/api/products",
            &json!({ "name": "Thing", "sku": "ab_12", "price": 1.0, "quantityInStock": 1 }),
        )
        .await;
    let bad_price = app
        .post(
            "/api/products",
            &json!({ "name": "Thing", "sku": "AB-12", "price": -0.01, "quantityInStock": 1 }),
        )
        .await;
    let too_expensive = app
        .post(
            "/api/products",
            &json!({ "name": "Thing", "sku": "AB-13", "price": 1000000.0, "quantityInStock": 1 }),
        )
        .await;
    let blank_name = app
        .post(
            "/api/products",
            &json!({ "name": "   ", "sku": "AB-14", "price": 1.0, "quantityInStock": 1 }),
        )
        .await;

    bad_sku.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        bad_sku.json::<Value>()["message"],
        "SKU must contain only uppercase letters, numbers, and hyphens"
    );
    bad_price.assert_status(StatusCode::BAD_REQUEST);
    too_expensive.assert_status(StatusCode::BAD_REQUEST);
    blank_name.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_sku_returns_409() {
    let app = TestApp::new();
    let sku = unique_sku();
    let mut body = product_body(5.0, 1, None);
    body["sku"] = json!(sku);
    app.create_product(body.clone()).await;

    body["sku"] = json!(sku.to_lowercase());
    let response = app.post("/api/products", &body).await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_product_with_unknown_category_returns_400() {
    let app = TestApp::new();

    let response = app
        .post("/api/products", &product_body(5.0, 1, Some(42)))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_product() {
    let app = TestApp::new();
    let created = app.create_product(product_body(10.0, 1, None)).await;
    let category_id = app.create_category("Tools").await;

    let response = app
        .put(
            &format!("/api/products/{}", created["id"]),
            &json!({
                "name": "Renamed",
                "description": "Updated",
                "sku": created["sku"],
                "price": 15.25,
                "quantityInStock": 4,
                "categoryId": category_id,
            }),
        )
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["price"], 15.25);
    assert_eq!(body["inventoryValue"], 61.0);
    assert_eq!(body["categoryId"], category_id);
}

#[tokio::test]
async fn test_update_missing_product_returns_404() {
    let app = TestApp::new();

    let response = app
        .put("/api/products/777", &product_body(1.0, 1, None))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_to_taken_sku_returns_409() {
    let app = TestApp::new();
    let first = app.create_product(product_body(1.0, 1, None)).await;
    let second = app.create_product(product_body(2.0, 2, None)).await;

    let mut body = product_body(2.0, 2, None);
    body["sku"] = first["sku"].clone();
    let response = app
        .put(&format!("/api/products/{}", second["id"]), &body)
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

/// Delete then fetch by id yields 404
#[tokio::test]
async fn test_delete_product() {
    let app = TestApp::new();
    let created = app.create_product(product_body(3.0, 3, None)).await;
    let path = format!("/api/products/{}", created["id"]);

    app.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
    app.get(&path).await.assert_status(StatusCode::NOT_FOUND);
    app.delete(&path).await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_by_sku_ignores_case() {
    let app = TestApp::new();
    let created = app.create_product(product_body(3.0, 3, None)).await;
    let sku = created["sku"].as_str().unwrap().to_lowercase();

    let response = app.get(&format!("/api/products/sku/{}", sku)).await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["id"], created["id"]);
    app.get("/api/products/sku/NOPE-1")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_by_name() {
    let app = TestApp::new();
    let mut body = product_body(3.0, 3, None);
    body["name"] = json!("Blue Widget");
    app.create_product(body).await;

    let response = app.get("/api/products/name/blue%20widget").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Vec<Value>>().len(), 1);
}

#[tokio::test]
async fn test_list_and_search_products() {
    let app = TestApp::new();
    let mut hammer = product_body(9.99, 10, None);
    hammer["name"] = json!("Claw Hammer");
    app.create_product(hammer).await;
    app.create_product(product_body(1.0, 1, None)).await;

    let all = app.get("/api/products").await.json::<Vec<Value>>();
    let found = app
        .get("/api/products/search")
        .add_query_param("term", "hammer")
        .await
        .json::<Vec<Value>>();
    let absent = app
        .get("/api/products/search")
        .add_query_param("term", "zzz-not-there")
        .await
        .json::<Vec<Value>>();

    assert_eq!(all.len(), 2);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["name"], "Claw Hammer");
    assert!(absent.is_empty());
}

#[tokio::test]
async fn test_search_term_bounds() {
    let app = TestApp::new();

    app.get("/api/products/search")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    app.get("/api/products/search")
        .add_query_param("term", "x".repeat(101))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_price_range() {
    let app = TestApp::new();
    app.create_product(product_body(5.0, 1, None)).await;
    app.create_product(product_body(15.0, 1, None)).await;
    app.create_product(product_body(25.0, 1, None)).await;

    let in_range = app
        .get("/api/products/price-range")
        .add_query_param("minPrice", "5")
        .add_query_param("maxPrice", "15")
        .await
        .json::<Vec<Value>>();
    let inverted = app
        .get("/api/products/price-range")
        .add_query_param("minPrice", "20")
        .add_query_param("maxPrice", "10")
        .await;
    let missing = app
        .get("/api/products/price-range")
        .add_query_param("minPrice", "1")
        .await;

    assert_eq!(in_range.len(), 2);
    inverted.assert_status(StatusCode::BAD_REQUEST);
    missing.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_padding_does_not_count_towards_length_limits() {
    let app = TestApp::new();
    let name = "a".repeat(200);
    let sku = "P".repeat(50);

    let response = app
        .post(
            "/api/products",
            &json!({
                "name": format!("  {}  ", name),
                "sku": format!("  {}  ", sku),
                "price": 1.0,
                "quantityInStock": 1,
            }),
        )
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["name"], name.as_str());
    assert_eq!(body["sku"], sku.as_str());
}

#[tokio::test]
async fn test_malformed_body_returns_400_envelope() {
    let app = TestApp::new();

    let fractional_quantity = app
        .post(
            "/api/products",
            &json!({ "name": "Thing", "sku": "AB-20", "price": 1.0, "quantityInStock": -1.5 }),
        )
        .await;
    let missing_sku = app
        .post(
            "/api/products",
            &json!({ "name": "Thing", "price": 1.0, "quantityInStock": 1 }),
        )
        .await;

    for response in [fractional_quantity, missing_sku] {
        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["code"], 10002);
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_malformed_query_returns_400_envelope() {
    let app = TestApp::new();

    let response = app
        .get("/api/products/price-range")
        .add_query_param("minPrice", "cheap")
        .add_query_param("maxPrice", "10")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], 10002);
}
