mod common;

use common::body;
use common::session_cookie;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

async fn create_widget(app: &TestApp, token: &str) -> i64 {
    let response = app
        .post_authenticated("/api/products", token)
        .json(&json!({ "name": "Widget", "quantity": 3, "price": 9.5 }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);
    body(response).await["data"]["id"].as_i64().unwrap()
}

/// Register john, log in, create a product, and have jane try to delete it.
/// Ownership is strict: only the owner may mutate a product.
#[tokio::test]
async fn test_session_to_ownership_scenario() {
    let app = TestApp::spawn().await;

    let registered = app
        .post("/api/user/register")
        .json(&json!({
            "username": "john",
            "email": "j@x.com",
            "password": "password123",
            "role": "user"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(registered.status(), StatusCode::CREATED);
    let john_id = body(registered).await["data"]["id"].as_i64().unwrap();

    let login = app
        .post("/api/user/login")
        .json(&json!({ "email": "j@x.com", "password": "password123" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(login.status(), StatusCode::OK);
    let john_token = session_cookie(&login).unwrap();
    let login_body = body(login).await;
    assert!(!login_body["data"]["token"].as_str().unwrap().is_empty());
    assert_eq!(login_body["data"]["isAdmin"], false);

    let wrong = app
        .post("/api/user/login")
        .json(&json!({ "email": "j@x.com", "password": "wrong" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body(wrong).await["data"]["message"], "Invalid credentials");

    let created = app
        .post_authenticated("/api/products", &john_token)
        .json(&json!({ "name": "Widget", "quantity": 3, "price": 9.5 }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(created.status(), StatusCode::CREATED);
    let product = body(created).await;
    assert_eq!(product["data"]["userId"], john_id);
    let product_id = product["data"]["id"].as_i64().unwrap();

    let (_, jane_token) = app.register_and_login("jane").await;
    let denied = app
        .delete_authenticated(&format!("/api/products/{}", product_id), &jane_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body(denied).await["data"]["message"],
        "You do not own this resource."
    );

    let still_there = app
        .get(&format!("/api/products/{}", product_id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(still_there.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_owner_can_update_and_delete() {
    let app = TestApp::spawn().await;
    let (_, token) = app.register_and_login("john").await;
    let product_id = create_widget(&app, &token).await;
    let path = format!("/api/products/{}", product_id);

    let updated = app
        .patch_authenticated(&path, &token)
        .json(&json!({ "quantity": 7 }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(updated.status(), StatusCode::OK);
    let updated = body(updated).await;
    assert_eq!(updated["data"]["quantity"], 7);
    assert_eq!(updated["data"]["name"], "Widget");

    let deleted = app
        .delete_authenticated(&path, &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(deleted.status(), StatusCode::OK);

    let gone = app
        .get(&path)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_owner_cannot_update() {
    let app = TestApp::spawn().await;
    let (_, john_token) = app.register_and_login("john").await;
    let (_, jane_token) = app.register_and_login("jane").await;
    let product_id = create_widget(&app, &john_token).await;

    let response = app
        .patch_authenticated(&format!("/api/products/{}", product_id), &jane_token)
        .json(&json!({ "name": "Stolen" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let product = body(
        app.get(&format!("/api/products/{}", product_id))
            .send()
            .await
            .expect("Failed to execute request"),
    )
    .await;
    assert_eq!(product["data"]["name"], "Widget");
}

#[tokio::test]
async fn test_admin_has_no_ownership_bypass() {
    let app = TestApp::spawn().await;
    let (_, john_token) = app.register_and_login("john").await;
    let admin_token = app.admin_token().await;
    let product_id = create_widget(&app, &john_token).await;

    let response = app
        .delete_authenticated(&format!("/api/products/{}", product_id), &admin_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_get_product_is_public() {
    let app = TestApp::spawn().await;
    let (_, token) = app.register_and_login("john").await;
    let product_id = create_widget(&app, &token).await;

    let response = app
        .get(&format!("/api/products/{}", product_id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body(response).await["data"]["price"], 9.5);
}

#[tokio::test]
async fn test_product_id_must_be_numeric() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/products/abc")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let missing = app
        .get("/api/products/999")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_product_validation() {
    let app = TestApp::spawn().await;
    let (_, token) = app.register_and_login("john").await;

    let response = app
        .post_authenticated("/api/products", &token)
        .json(&json!({ "name": "ab", "quantity": 0, "price": 0.5 }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let message = body(response).await["data"]["message"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(message.contains("name"));
    assert!(message.contains("quantity"));
    assert!(message.contains("price"));
}

#[tokio::test]
async fn test_owner_is_taken_from_session_not_body() {
    let app = TestApp::spawn().await;
    let (john_id, token) = app.register_and_login("john").await;

    let response = app
        .post_authenticated("/api/products", &token)
        .json(&json!({ "name": "Widget", "quantity": 1, "price": 1, "userId": 999 }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body(response).await["data"]["userId"], john_id);
}

#[tokio::test]
async fn test_list_own_products() {
    let app = TestApp::spawn().await;
    let (_, john_token) = app.register_and_login("john").await;
    let (_, jane_token) = app.register_and_login("jane").await;
    create_widget(&app, &john_token).await;
    create_widget(&app, &john_token).await;
    create_widget(&app, &jane_token).await;

    let response = app
        .get_authenticated("/api/user/products", &john_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body(response).await["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_all_products_is_admin_only() {
    let app = TestApp::spawn().await;
    let (_, john_token) = app.register_and_login("john").await;
    let admin_token = app.admin_token().await;
    create_widget(&app, &john_token).await;

    let anonymous = app
        .get("/api/products")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(anonymous.status(), StatusCode::BAD_REQUEST);

    let as_user = app
        .get_authenticated("/api/products", &john_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(as_user.status(), StatusCode::UNAUTHORIZED);

    let as_admin = app
        .get_authenticated("/api/products", &admin_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(as_admin.status(), StatusCode::OK);
    assert_eq!(body(as_admin).await["data"].as_array().unwrap().len(), 1);
}
