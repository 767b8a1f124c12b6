//! User API Tests

use axum::http::StatusCode;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{unique_email, unique_username, TestApp};

fn user_body() -> Value {
    let first: String = FirstName().fake();
    let last: String = LastName().fake();
    json!({
        "username": unique_username(),
        "email": unique_email(),
        "firstName": first,
        "lastName": last,
    })
}

#[tokio::test]
async fn test_create_and_fetch_user() {
    let app = TestApp::new();
    let body = user_body();

    let response = app.post("/api/users", &body).await;

    response.assert_status(StatusCode::CREATED);
    let created = response.json::<Value>();
    let username = body["username"].as_str().unwrap().to_lowercase();
    assert_eq!(created["username"], username.as_str());
    assert_eq!(created["isActive"], true);
    assert_eq!(
        created["fullName"],
        format!(
            "{} {}",
            body["firstName"].as_str().unwrap(),
            body["lastName"].as_str().unwrap()
        )
    );

    let by_id = app
        .get(&format!("/api/users/{}", created["id"]))
        .await
        .json::<Value>();
    let by_name = app
        .get(&format!("/api/users/username/{}", username))
        .await
        .json::<Value>();
    assert_eq!(by_id, created);
    assert_eq!(by_name, created);
}

#[tokio::test]
async fn test_duplicate_username_or_email_returns_409() {
    let app = TestApp::new();
    let body = user_body();
    app.post("/api/users", &body)
        .await
        .assert_status(StatusCode::CREATED);

    let mut same_username = user_body();
    same_username["username"] = body["username"].clone();
    let mut same_email = user_body();
    same_email["email"] = body["email"].clone();

    app.post("/api/users", &same_username)
        .await
        .assert_status(StatusCode::CONFLICT);
    app.post("/api/users", &same_email)
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_user_rejects_invalid_input() {
    let app = TestApp::new();

    let mut bad_email = user_body();
    bad_email["email"] = json!("not-an-email");
    let mut bad_username = user_body();
    bad_username["username"] = json!("no spaces allowed");

    app.post("/api/users", &bad_email)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    app.post("/api/users", &bad_username)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_and_delete_user() {
    let app = TestApp::new();
    let created = app
        .post("/api/users", &user_body())
        .await
        .json::<Value>();
    let path = format!("/api/users/{}", created["id"]);

    let updated = app
        .put(&path, &json!({ "firstName": "Ada", "isActive": false }))
        .await;

    updated.assert_status_ok();
    let updated = updated.json::<Value>();
    assert_eq!(updated["firstName"], "Ada");
    assert_eq!(updated["isActive"], false);
    assert_eq!(updated["email"], created["email"]);

    app.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
    app.get(&path).await.assert_status(StatusCode::NOT_FOUND);
    app.put(&path, &json!({ "lastName": "Gone" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_padded_username_and_email_are_trimmed() {
    let app = TestApp::new();
    let username = unique_username();
    let email = unique_email();

    let response = app
        .post(
            "/api/users",
            &json!({ "username": format!("  {}  ", username), "email": format!(" {} ", email) }),
        )
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["username"], username.to_lowercase().as_str());
    assert_eq!(body["email"], email.to_lowercase().as_str());
}

#[tokio::test]
async fn test_type_invalid_user_body_returns_400() {
    let app = TestApp::new();

    let response = app
        .post("/api/users", &json!({ "username": 42, "email": unique_email() }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], 10002);
}
