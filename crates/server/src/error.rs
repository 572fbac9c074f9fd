use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use simcheck::{CheckError, FileCode, StagingError};

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Check(#[from] CheckError),

    #[error(transparent)]
    Staging(#[from] StagingError),

    /// A comparison page could not be fetched. Still answered in the
    /// comparison shape so clients can render an error state.
    #[error("Failed to fetch: {message}")]
    ComparisonFetch { message: String, source_url: String },

    #[error("An internal server error occurred: {0}")]
    Internal(String),

    #[error("Not found")]
    NotFound,
}

impl ServerError {
    /// Get HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_)
            | ServerError::Check(CheckError::EmptyBatch)
            | ServerError::Staging(StagingError::InvalidFileName(_)) => StatusCode::BAD_REQUEST,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Check(_)
            | ServerError::Staging(_)
            | ServerError::ComparisonFetch { .. }
            | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body for this error. Always carries `error`; tool and comparison
    /// failures add the fields clients use for diagnostics.
    fn body(&self) -> Value {
        match self {
            ServerError::Check(CheckError::Tool(tool)) => json!({
                "error": "MOSS execution failed",
                "details": tool.details(),
                "command": tool.command(),
                "output": tool.stdout(),
            }),
            ServerError::Check(CheckError::UnexpectedOutput { output }) => json!({
                "error": "Invalid output received from MOSS",
                "output": output,
            }),
            ServerError::Staging(err @ StagingError::InvalidFileName(_)) => json!({
                "error": err.to_string(),
            }),
            ServerError::Staging(err) => json!({
                "error": format!("An internal server error occurred: {err}"),
            }),
            ServerError::ComparisonFetch { source_url, .. } => json!({
                "error": self.to_string(),
                "file1": FileCode::named("Error"),
                "file2": FileCode::named("Error"),
                "sourceUrl": source_url,
            }),
            _ => json!({ "error": self.to_string() }),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %self, "Request rejected");
        }

        (status, Json(self.body())).into_response()
    }
}

impl From<MultipartError> for ServerError {
    fn from(err: MultipartError) -> Self {
        ServerError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
    }
}

impl From<MultipartRejection> for ServerError {
    fn from(err: MultipartRejection) -> Self {
        ServerError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
    }
}

impl From<JsonRejection> for ServerError {
    fn from(err: JsonRejection) -> Self {
        ServerError::BadRequest(format!("Invalid JSON body: {}", err.body_text()))
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("IO error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simcheck::ScoreError;

    #[test]
    fn empty_batch_is_a_client_error() {
        let err = ServerError::from(CheckError::EmptyBatch);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body(), json!({ "error": "No files provided" }));
    }

    #[test]
    fn tool_failure_body_has_diagnostics() {
        let err = ServerError::from(CheckError::Tool(ScoreError::Exit {
            command: "/usr/bin/perl moss.pl -l python -m 10 /tmp/moss-x/a.py".into(),
            code: Some(1),
            stdout: "partial".into(),
            stderr: "boom".into(),
        }));

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.body();
        assert_eq!(body["error"], "MOSS execution failed");
        assert_eq!(body["details"], "boom");
        assert_eq!(
            body["command"],
            "/usr/bin/perl moss.pl -l python -m 10 /tmp/moss-x/a.py"
        );
        assert_eq!(body["output"], "partial");
    }

    #[test]
    fn comparison_fetch_keeps_detail_shape() {
        let err = ServerError::ComparisonFetch {
            message: "timed out".into(),
            source_url: "http://moss.stanford.edu/results/1/2/match0.html".into(),
        };

        let body = err.body();
        assert_eq!(body["error"], "Failed to fetch: timed out");
        assert_eq!(body["file1"], json!({ "name": "Error", "code": [] }));
        assert_eq!(body["file2"], json!({ "name": "Error", "code": [] }));
        assert_eq!(
            body["sourceUrl"],
            "http://moss.stanford.edu/results/1/2/match0.html"
        );
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(ServerError::NotFound.status_code(), StatusCode::NOT_FOUND);
    }
}
