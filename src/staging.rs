//! Per-request staging of uploaded files.
//!
//! Every submission gets its own uniquely named directory (`moss-XXXXXX`) under
//! the staging root. Uploaded files are written there under their original
//! names and handed to the scoring tool by absolute path. The directory and
//! everything in it is removed when the batch is cleaned up or dropped, so a
//! handler that bails out early with `?` still leaves nothing behind.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

const STAGING_PREFIX: &str = "moss-";

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("failed to create staging directory: {0}")]
    CreateDir(#[source] io::Error),

    #[error("invalid upload file name: {0:?}")]
    InvalidFileName(String),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An uploaded file written into the staging directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub original_name: String,
    pub path: PathBuf,
}

/// Ordered set of uploaded files living in one temporary directory.
#[derive(Debug)]
pub struct UploadBatch {
    dir: TempDir,
    files: Vec<StagedFile>,
}

impl UploadBatch {
    /// Create an empty batch in a fresh directory under `root`, or under the
    /// system temp dir when `root` is `None`.
    pub fn create(root: Option<&Path>) -> Result<Self, StagingError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(STAGING_PREFIX);
        // Staged paths are passed to a tool running inside the staging
        // directory, so they must not be relative.
        let dir = match root {
            Some(root) => std::path::absolute(root).and_then(|root| builder.tempdir_in(root)),
            None => builder.tempdir(),
        }
        .map_err(StagingError::CreateDir)?;

        tracing::debug!(dir = %dir.path().display(), "created staging directory");
        Ok(Self {
            dir,
            files: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Staged paths in upload order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|f| f.path.as_path())
    }

    /// Create the staging file for `original_name` and record it.
    ///
    /// Only the final path component of the name is kept, so an upload named
    /// `../../etc/passwd` lands in the staging directory as `passwd`.
    pub async fn create_file(&mut self, original_name: &str) -> Result<File, StagingError> {
        let file_name = Path::new(original_name)
            .file_name()
            .ok_or_else(|| StagingError::InvalidFileName(original_name.to_string()))?;
        let path = self.dir.path().join(file_name);

        let file = File::create(&path)
            .await
            .map_err(|source| StagingError::Write {
                path: path.clone(),
                source,
            })?;

        self.files.push(StagedFile {
            original_name: original_name.to_string(),
            path,
        });
        Ok(file)
    }

    /// Stage an in-memory upload.
    pub async fn stage_bytes(
        &mut self,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<&StagedFile, StagingError> {
        let mut file = self.create_file(original_name).await?;
        let staged = self.files.len() - 1;
        let path = self.files[staged].path.clone();

        file.write_all(bytes)
            .await
            .map_err(|source| StagingError::Write {
                path: path.clone(),
                source,
            })?;
        file.flush()
            .await
            .map_err(|source| StagingError::Write { path, source })?;

        Ok(&self.files[staged])
    }

    /// Remove the staging directory and every staged file.
    ///
    /// Failures are logged; the caller has already produced its response.
    pub fn cleanup(self) {
        let dir = self.dir.path().to_path_buf();
        let count = self.files.len();
        match self.dir.close() {
            Ok(()) => tracing::debug!(dir = %dir.display(), files = count, "removed staging directory"),
            Err(err) => tracing::warn!(
                dir = %dir.display(),
                error = %err,
                "failed to remove staging directory"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stages_files_in_upload_order() {
        let root = tempfile::tempdir().unwrap();
        let mut batch = UploadBatch::create(Some(root.path())).unwrap();

        batch.stage_bytes("b.py", b"print('b')").await.unwrap();
        batch.stage_bytes("a.py", b"print('a')").await.unwrap();

        let names: Vec<_> = batch
            .files()
            .iter()
            .map(|f| f.original_name.as_str())
            .collect();
        assert_eq!(names, vec!["b.py", "a.py"]);

        for file in batch.files() {
            assert!(file.path.starts_with(batch.dir()));
            assert!(file.path.is_absolute());
        }
        let content = std::fs::read_to_string(&batch.files()[1].path).unwrap();
        assert_eq!(content, "print('a')");

        let dir_name = batch.dir().file_name().unwrap().to_string_lossy().to_string();
        assert!(dir_name.starts_with("moss-"));
    }

    #[tokio::test]
    async fn strips_directory_components_from_names() {
        let root = tempfile::tempdir().unwrap();
        let mut batch = UploadBatch::create(Some(root.path())).unwrap();

        let staged = batch
            .stage_bytes("../../etc/passwd", b"x")
            .await
            .unwrap()
            .clone();
        assert_eq!(staged.path, batch.dir().join("passwd"));
        assert_eq!(staged.original_name, "../../etc/passwd");
    }

    #[tokio::test]
    async fn rejects_names_without_file_component() {
        let root = tempfile::tempdir().unwrap();
        let mut batch = UploadBatch::create(Some(root.path())).unwrap();

        for name in ["", "..", "dir/.."] {
            let err = batch.stage_bytes(name, b"x").await.unwrap_err();
            assert!(matches!(err, StagingError::InvalidFileName(_)), "{name:?}");
        }
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn cleanup_removes_everything() {
        let root = tempfile::tempdir().unwrap();
        let mut batch = UploadBatch::create(Some(root.path())).unwrap();
        batch.stage_bytes("a.py", b"a").await.unwrap();

        let dir = batch.dir().to_path_buf();
        let paths: Vec<PathBuf> = batch.paths().map(Path::to_path_buf).collect();
        batch.cleanup();

        assert!(!dir.exists());
        assert!(paths.iter().all(|p| !p.exists()));
    }

    #[tokio::test]
    async fn drop_removes_everything() {
        let root = tempfile::tempdir().unwrap();
        let dir = {
            let mut batch = UploadBatch::create(Some(root.path())).unwrap();
            batch.stage_bytes("a.py", b"a").await.unwrap();
            batch.dir().to_path_buf()
        };
        assert!(!dir.exists());
    }
}
