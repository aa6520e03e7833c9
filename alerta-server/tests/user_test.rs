use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;
use common::mock_app::{MockApp, read_json, read_text};

#[tokio::test]
async fn test_auth_liveness() {
    let app = MockApp::new().await;

    let response = app.request(Method::GET, "/auth/test", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_text(response).await, "Backend acessível com sucesso!");
}

#[tokio::test]
async fn test_register_and_login() {
    let app = MockApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/auth/register",
            Some(json!({ "email": "maria@example.com", "nome": "Maria" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let uid = read_json(response).await["uid"].as_str().unwrap().to_string();

    let response = app
        .request(Method::POST, "/auth/login", Some(json!({ "email": "maria@example.com" })))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let user = read_json(response).await;
    assert_eq!(user["uid"], json!(uid));
    assert_eq!(user["displayName"], json!("Maria"));
    assert_eq!(user["email"], json!("maria@example.com"));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = MockApp::new().await;
    let body = json!({ "email": "maria@example.com", "nome": "Maria" });

    let response = app.request(Method::POST, "/auth/register", Some(body.clone())).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.request(Method::POST, "/auth/register", Some(body)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_unknown_email() {
    let app = MockApp::new().await;

    let response = app
        .request(Method::POST, "/auth/login", Some(json!({ "email": "nobody@example.com" })))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.request(Method::POST, "/auth/login", Some(json!({}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_push_token() {
    let app = MockApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/auth/register",
            Some(json!({ "email": "maria@example.com", "nome": "Maria" })),
        )
        .await;
    let uid = read_json(response).await["uid"].as_str().unwrap().to_string();

    let response = app
        .request(Method::POST, "/api/token", Some(json!({ "uid": uid, "token": "fcm-token" })))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let stored: Option<String> = sqlx::query_scalar("SELECT push_token FROM users WHERE id = $1")
        .bind(&uid)
        .fetch_one(app.storage.get_pool())
        .await
        .unwrap();
    assert_eq!(stored.as_deref(), Some("fcm-token"));

    let response = app
        .request(Method::POST, "/api/token", Some(json!({ "uid": uid })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(Method::POST, "/api/token", Some(json!({ "uid": "missing", "token": "t" })))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
