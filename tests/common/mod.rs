use axum::body::Body;
use axum::http::{Request, StatusCode};
use bookstack::config::cors::CorsConfig;
use bookstack::config::jwt::JwtConfig;
use bookstack::router::init_router;
use bookstack::state::AppState;
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub async fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
    };
    init_router(state)
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

#[allow(dead_code)]
pub fn generate_unique_author_name() -> String {
    format!("Author {}", Uuid::new_v4())
}

pub fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

#[allow(dead_code)]
pub fn authed_json_request(
    method: &str,
    uri: &str,
    token: &str,
    body: &serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Register a fresh user through the API and return a bearer token for it.
#[allow(dead_code)]
pub async fn register_and_login(app: &axum::Router) -> String {
    let email = generate_unique_email();
    let password = "testpass123";

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/register",
            &json!({
                "email": email,
                "password": password,
                "full_name": "Test User"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/login",
            &json!({
                "email": email,
                "password": password
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    body["access_token"].as_str().unwrap().to_string()
}
