use crate::backend::{interpret, BackendReply};
use crate::error::ProxyResult;
use crate::state::ProxyState;
use axum::extract::State;
use axum::http::{Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

/// Relay any request to a freshly spawned backend process.
///
/// Method and path are only logged; the backend sees neither, nor the
/// request body or headers. It gets its port through the environment and
/// answers on stdout.
pub async fn proxy_request(
    State(state): State<Arc<ProxyState>>,
    method: Method,
    uri: Uri,
) -> ProxyResult<Response> {
    tracing::debug!(method = %method, uri = %uri, "Relaying request to backend");

    let stdout = state.backend.run().await?;

    Ok(match interpret(&stdout) {
        BackendReply::Json(value) => Json(value).into_response(),
        BackendReply::Text(text) => text.into_response(),
    })
}
