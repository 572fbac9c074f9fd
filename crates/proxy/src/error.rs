use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub type ProxyResult<T> = Result<T, ProxyError>;

/// Proxy error types
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Failed to start backend process: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Backend process exited with {status}")]
    Exit { status: String, stderr: String },

    #[error("Failed to read backend output: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Backend request failed");

        let body = match &self {
            ProxyError::Exit { stderr, .. } => json!({
                "error": self.to_string(),
                "stderr": stderr,
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
