use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use simcheck::{check_batch, CheckOutcome, UploadBatch};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// Multipart field carrying the uploaded source files
pub const FILES_FIELD: &str = "files";

/// Optional multipart field naming the source language
pub const LANGUAGE_FIELD: &str = "language";

/// Submit uploaded source files to MOSS and return the parsed report.
///
/// Files are streamed into a per-request staging directory, the scoring tool
/// runs over them in upload order, and the report behind the URL it prints is
/// scraped into comparison records. The staging directory is removed before
/// the response is sent, whatever the outcome.
///
/// # Responses
///
/// - `200 {"url": "...", "results": [...]}`
/// - `200 {"url": "...", "results": null}` when the report page could not be read
/// - `400 {"error": "No files provided"}`
/// - `500 {"error", "details", "command", "output"}` when the tool fails
pub async fn check_plagiarism(
    State(state): State<Arc<ServerState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ServerResult<Json<CheckOutcome>> {
    let mut multipart = multipart?;
    let mut batch = UploadBatch::create(state.config.scorer.staging_root.as_deref())?;

    let result = async {
        let language = stage_uploads(&mut multipart, &mut batch).await?;
        let language = state.config.scorer.language_or_default(language.as_deref());

        tracing::info!(files = batch.len(), language, "Submission staged");
        let outcome = check_batch(
            &batch,
            language,
            state.scorer.as_ref(),
            state.fetcher.as_ref(),
        )
        .await?;
        Ok::<_, ServerError>(outcome)
    }
    .await;

    batch.cleanup();
    result.map(Json)
}

/// Stream every `files` part into the batch and return the `language` field
/// if one was sent. Parts with other names are ignored.
async fn stage_uploads(
    multipart: &mut Multipart,
    batch: &mut UploadBatch,
) -> ServerResult<Option<String>> {
    let mut language = None;

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILES_FIELD) => {
                let Some(file_name) = field.file_name().map(str::to_string) else {
                    tracing::debug!("Ignoring files part without a filename");
                    continue;
                };

                let mut file = batch.create_file(&file_name).await?;
                let mut size = 0usize;
                while let Some(chunk) = field.chunk().await? {
                    size += chunk.len();
                    file.write_all(&chunk).await?;
                }
                file.flush().await?;
                tracing::debug!(file = %file_name, bytes = size, "Staged upload");
            }
            Some(LANGUAGE_FIELD) => {
                language = Some(field.text().await?);
            }
            _ => {}
        }
    }

    Ok(language)
}
