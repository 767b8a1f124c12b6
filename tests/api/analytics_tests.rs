//! Category Analytics API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::common::{product_body, TestApp};

/// Two categories: Tools has 2 products worth 70.00, Garden 1 product worth 200.00
async fn seeded() -> (TestApp, i64, i64) {
    let app = TestApp::new();
    let tools = app.create_category("Tools").await;
    let garden = app.create_category("Garden").await;

    app.create_product(product_body(10.0, 5, Some(tools))).await;
    app.create_product(product_body(20.0, 1, Some(tools))).await;
    app.create_product(product_body(100.0, 2, Some(garden))).await;

    (app, tools, garden)
}

#[tokio::test]
async fn test_single_category_analytics() {
    let (app, tools, _) = seeded().await;

    let response = app
        .get(&format!("/api/categories/analytics/{}", tools))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["categoryName"], "Tools");
    assert_eq!(body["productCount"], 2);
    assert_eq!(body["totalQuantity"], 6);
    assert_eq!(body["totalInventoryValue"], 70.0);
    assert_eq!(body["averagePrice"], 15.0);
    assert_eq!(body["lowStockCount"], 2);
    assert_eq!(body["percentageOfTotalProducts"], 66.67);
}

#[tokio::test]
async fn test_missing_category_analytics_returns_404() {
    let (app, _, _) = seeded().await;

    app.get("/api/categories/analytics/99")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_all_category_analytics() {
    let (app, tools, garden) = seeded().await;

    let body = app
        .get("/api/categories/analytics")
        .await
        .json::<Vec<Value>>();

    let ids: Vec<i64> = body.iter().filter_map(|a| a["categoryId"].as_i64()).collect();
    assert_eq!(ids, vec![tools, garden]);
}

#[tokio::test]
async fn test_overall_metrics() {
    let (app, _, garden) = seeded().await;

    let body = app
        .get("/api/categories/analytics/overall")
        .await
        .json::<Value>();

    assert_eq!(body["totalCategories"], 2);
    assert_eq!(body["totalProducts"], 3);
    assert_eq!(body["totalInventoryValue"], 270.0);
    assert_eq!(body["averageProductsPerCategory"], 1.5);
    assert_eq!(body["mostValuableCategory"]["categoryId"], garden);
}

#[tokio::test]
async fn test_top_categories() {
    let (app, tools, garden) = seeded().await;

    let by_count = app
        .get("/api/categories/analytics/top")
        .add_query_param("count", 1)
        .await
        .json::<Vec<Value>>();
    let by_value = app
        .get("/api/categories/analytics/top")
        .add_query_param("sortBy", "inventoryValue")
        .await
        .json::<Vec<Value>>();

    assert_eq!(by_count.len(), 1);
    assert_eq!(by_count[0]["categoryId"], tools);
    assert_eq!(by_value[0]["categoryId"], garden);
}

#[tokio::test]
async fn test_top_categories_unknown_sort_falls_back_to_count() {
    let (app, tools, _) = seeded().await;

    let response = app
        .get("/api/categories/analytics/top")
        .add_query_param("sortBy", "alphabetical")
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Vec<Value>>()[0]["categoryId"], tools);
}

#[tokio::test]
async fn test_top_categories_count_bounds() {
    let app = TestApp::new();

    for count in [0, 51] {
        app.get("/api/categories/analytics/top")
            .add_query_param("count", count)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_category_trends() {
    let (app, _, _) = seeded().await;

    let response = app
        .get("/api/categories/analytics/trends")
        .add_query_param("days", 7)
        .await;

    response.assert_status_ok();
    let trends = response.json::<Vec<Value>>();
    assert_eq!(trends.len(), 2);
    // Everything was created just now
    for trend in &trends {
        assert_eq!(trend["trendScore"], 100.0);
        assert_eq!(trend["trend"], "growing");
        assert_eq!(trend["periodDays"], 7);
    }
}

#[tokio::test]
async fn test_category_trends_days_bounds() {
    let app = TestApp::new();

    for days in [0, 366] {
        app.get("/api/categories/analytics/trends")
            .add_query_param("days", days)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_create_and_get_category() {
    let app = TestApp::new();
    let id = app.create_category("Kitchen").await;

    let response = app.get(&format!("/api/categories/{}", id)).await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["name"], "Kitchen");
    app.get("/api/categories/404")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.post("/api/categories", &serde_json::json!({ "name": "kitchen" }))
        .await
        .assert_status(StatusCode::CONFLICT);
}
