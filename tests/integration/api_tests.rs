//! Router tests that are answered before any database access

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::common::{offline_app, send, token};

#[tokio::test]
async fn test_health_check() {
    let app = offline_app();

    let (status, body) = send(&app, Method::GET, "/api/v1/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_welcome_lists_resources() {
    let app = offline_app();

    let (status, body) = send(&app, Method::GET, "/", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endpoints"]["loans"], "/api/v1/loans");
    assert_eq!(body["endpoints"]["inventory"], "/api/v1/inventory");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = offline_app();

    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/loans/statistics"].is_object());
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let app = offline_app();

    let (status, body) = send(&app, Method::GET, "/api/v1/loans", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 2);
    assert_eq!(body["error"], "NotAuthorized");
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let app = offline_app();

    let (status, _) = send(&app, Method::GET, "/api/v1/students", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_loan_rejects_invalid_ids() {
    let app = offline_app();
    let bearer = token(1, false);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/loans",
        Some(&bearer),
        Some(json!({ "student_id": 0, "item_id": 4 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
    assert!(body["message"].as_str().unwrap().contains("student_id"));
}

#[tokio::test]
async fn test_create_loan_rejects_malformed_body() {
    let app = offline_app();
    let bearer = token(1, false);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/loans",
        Some(&bearer),
        Some(json!({ "student_id": "seven" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5);
}

#[tokio::test]
async fn test_quantity_adjustment_requires_positive_amount() {
    let app = offline_app();
    let bearer = token(1, false);

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/v1/inventory/3/quantity",
        Some(&bearer),
        Some(json!({ "operation": "decrement", "amount": 0 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_requires_term() {
    let app = offline_app();
    let bearer = token(1, false);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/students/search?query=%20%20",
        Some(&bearer),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_user_management_requires_admin() {
    let app = offline_app();
    let bearer = token(7, false);

    let (status, body) = send(&app, Method::GET, "/api/v1/users", Some(&bearer), None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2);
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let app = offline_app();
    let bearer = token(5, true);

    let (status, _) = send(&app, Method::DELETE, "/api/v1/users/5", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profile_returns_token_claims() {
    let app = offline_app();
    let bearer = token(12, false);

    let (status, body) = send(&app, Method::GET, "/api/v1/users/profile", Some(&bearer), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], 12);
    assert_eq!(body["sub"], "user12");
    assert_eq!(body["is_admin"], false);
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = offline_app();

    let (status, body) = send(&app, Method::GET, "/api/v1/nothing-here", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Route not found");
}

#[tokio::test]
async fn test_non_numeric_id_returns_json_400() {
    let app = offline_app();
    let bearer = token(1, false);

    let (status, body) = send(&app, Method::GET, "/api/v1/loans/abc", Some(&bearer), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5);
    assert_eq!(body["error"], "BadValue");
}
