mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    authed_json_request, generate_unique_author_name, json_request, register_and_login,
    response_json, setup_test_app,
};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "./migrations")]
async fn test_create_author_requires_auth(pool: PgPool) {
    let app = setup_test_app(pool).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/authors",
            &json!({"name": generate_unique_author_name()}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_author_crud_flow(pool: PgPool) {
    let app = setup_test_app(pool).await;
    let token = register_and_login(&app).await;
    let name = generate_unique_author_name();

    // create
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/authors",
            &token,
            &json!({"name": name}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = response_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["name"], name);

    // read back, no auth needed
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/authors/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["name"], name);

    // listed
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/authors")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = response_json(response).await;
    assert!(
        listed
            .as_array()
            .unwrap()
            .iter()
            .any(|a| a["id"].as_i64() == Some(id))
    );

    // update
    let new_name = generate_unique_author_name();
    let response = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            &format!("/api/authors/{id}"),
            &token,
            &json!({"name": new_name}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["name"], new_name);

    // delete
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/authors/{id}"))
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_json(response).await["message"],
        "Author deleted successfully"
    );

    // gone
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/authors/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_author_duplicate_name(pool: PgPool) {
    let app = setup_test_app(pool).await;
    let token = register_and_login(&app).await;
    let payload = json!({"name": generate_unique_author_name()});

    let response = app
        .clone()
        .oneshot(authed_json_request("POST", "/api/authors", &token, &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(authed_json_request("POST", "/api/authors", &token, &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_author_blank_name(pool: PgPool) {
    let app = setup_test_app(pool).await;
    let token = register_and_login(&app).await;

    let response = app
        .oneshot(authed_json_request(
            "POST",
            "/api/authors",
            &token,
            &json!({"name": "   "}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_author_not_found(pool: PgPool) {
    let app = setup_test_app(pool).await;
    let token = register_and_login(&app).await;

    let response = app
        .oneshot(authed_json_request(
            "PUT",
            "/api/authors/999999",
            &token,
            &json!({"name": generate_unique_author_name()}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
