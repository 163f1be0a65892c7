//! HTTP-level tests for the AI endpoints.
//!
//! The test app has no provider credentials, so every call that reaches the
//! provider fails with 502; input validation runs before that.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json, post_multipart};
use serde_json::json;
use sqlx::PgPool;

const BOUNDARY: &str = "formstep-test-boundary";

fn multipart_body(name: &str, file_name: Option<&str>, content: &[u8]) -> Vec<u8> {
    let disposition = match file_name {
        Some(file_name) => format!("form-data; name=\"{name}\"; filename=\"{file_name}\""),
        None => format!("form-data; name=\"{name}\""),
    };
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\nContent-Type: audio/webm\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_suggest_requires_question(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/ai/suggest", json!({ "question": "  " })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_suggest_without_provider_is_502(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/ai/suggest",
        json!({
            "question": "What is your budget?",
            "previousAnswers": { "Company": "Acme" },
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "UPSTREAM_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_transcribe_requires_file_part(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = multipart_body("note", None, b"hello");
    let response = post_multipart(app, "/api/v1/ai/transcribe", BOUNDARY, body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No file provided");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_transcribe_rejects_empty_file(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = multipart_body("file", Some("clip.webm"), b"");
    let response = post_multipart(app, "/api/v1/ai/transcribe", BOUNDARY, body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_transcribe_without_provider_is_502(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = multipart_body("file", Some("clip.webm"), b"RIFF....WEBM");
    let response = post_multipart(app, "/api/v1/ai/transcribe", BOUNDARY, body).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "UPSTREAM_ERROR");
}
