//! Integration tests for the proxy shim, using `/bin/sh -c` as the backend.
#![cfg(unix)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use proxy::{build_router, ProxyConfig, ProxyState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn shell_backend(script: &str) -> ProxyConfig {
    ProxyConfig {
        backend_command: "/bin/sh".into(),
        backend_args: vec!["-c".into(), script.into()],
        ..Default::default()
    }
}

async fn call(config: ProxyConfig, method: &str, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let app = build_router(Arc::new(ProxyState::new(config)));
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from("ignored body"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, bytes.to_vec())
}

#[tokio::test]
async fn json_stdout_is_relayed_as_json() {
    let (status, content_type, body) =
        call(shell_backend(r#"printf '{"a":1}'"#), "GET", "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "a": 1 }));
}

#[tokio::test]
async fn plain_stdout_is_relayed_as_text() {
    let (status, content_type, body) =
        call(shell_backend("printf 'not json'"), "POST", "/anything").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/plain"));
    assert_eq!(body, b"not json");
}

#[tokio::test]
async fn non_zero_exit_returns_stderr() {
    let (status, _, body) = call(
        shell_backend("echo partial; echo 'listen failed' >&2; exit 2"),
        "GET",
        "/",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"], "Backend process exited with status 2");
    assert_eq!(body["stderr"], "listen failed\n");
}

#[tokio::test]
async fn missing_executable_is_a_spawn_error() {
    let config = ProxyConfig {
        backend_command: "/definitely/not/a/backend".into(),
        ..Default::default()
    };
    let (status, _, body) = call(config, "GET", "/").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to start backend process: "));
}

#[tokio::test]
async fn backend_port_is_passed_through_environment() {
    let mut config = shell_backend(r#"printf '{"port":"%s"}' "$PORT""#);
    config.backend_port = 9123;

    let (status, _, body) = call(config, "GET", "/").await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "port": "9123" }));
}

#[tokio::test]
async fn every_method_and_path_reaches_the_backend() {
    for (method, uri) in [("GET", "/"), ("DELETE", "/a/b/c"), ("PUT", "/x?y=1"), ("PATCH", "/deep/path")] {
        let (status, _, body) = call(shell_backend("printf ok"), method, uri).await;
        assert_eq!(status, StatusCode::OK, "{method} {uri}");
        assert_eq!(body, b"ok");
    }
}

#[tokio::test]
async fn request_id_is_echoed_or_generated() {
    let app = build_router(Arc::new(ProxyState::new(shell_backend("printf ok"))));
    let request = Request::builder()
        .uri("/")
        .header("x-request-id", "proxy-req-7")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "proxy-req-7");

    let app = build_router(Arc::new(ProxyState::new(shell_backend("exit 1"))));
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let generated = response.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(generated.len(), 36);
}
