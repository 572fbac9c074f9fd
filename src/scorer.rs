//! Running the external scoring tool.
//!
//! The tool is MOSS's submission script, invoked as
//!
//! ```text
//! <interpreter> <script> -l <language> -m <threshold> <file>...
//! ```
//!
//! with the staging directory as working directory. Its stdout ends with the
//! result URL; anything else it prints is kept only for diagnostics.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

use crate::config::ScorerConfig;
use crate::staging::UploadBatch;

/// Captured output of a successful tool run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// The command line that was run, for diagnostics.
    pub command: String,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` exited with {}", exit_label(*.code))]
    Exit {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

impl ScoreError {
    pub fn command(&self) -> &str {
        match self {
            ScoreError::Spawn { command, .. } | ScoreError::Exit { command, .. } => command,
        }
    }

    /// What went wrong: the tool's stderr, or the launch error if it never ran.
    pub fn details(&self) -> String {
        match self {
            ScoreError::Spawn { source, .. } => source.to_string(),
            ScoreError::Exit { stderr, .. } => stderr.clone(),
        }
    }

    /// Whatever the tool printed on stdout before failing.
    pub fn stdout(&self) -> &str {
        match self {
            ScoreError::Spawn { .. } => "",
            ScoreError::Exit { stdout, .. } => stdout,
        }
    }
}

fn exit_label(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "a signal".to_string(),
    }
}

/// Something that can score a staged batch.
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn score(&self, batch: &UploadBatch, language: &str) -> Result<ToolOutput, ScoreError>;
}

/// The MOSS submission script run as a child process.
#[derive(Debug, Clone)]
pub struct MossCommand {
    interpreter: String,
    script: PathBuf,
    match_threshold: u32,
}

impl MossCommand {
    pub fn new(config: &ScorerConfig) -> Self {
        // The child runs inside the staging directory, so a relative script
        // path has to be pinned to our own working directory first.
        let script = std::path::absolute(&config.script_path)
            .unwrap_or_else(|_| config.script_path.clone());

        Self {
            interpreter: config.interpreter.clone(),
            script,
            match_threshold: config.match_threshold,
        }
    }

    /// Arguments after the interpreter, in order.
    pub fn args(&self, batch: &UploadBatch, language: &str) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            self.script.clone().into_os_string(),
            "-l".into(),
            language.into(),
            "-m".into(),
            self.match_threshold.to_string().into(),
        ];
        args.extend(batch.paths().map(|path| path.as_os_str().to_os_string()));
        args
    }

    /// The full command as a single space-joined line.
    pub fn command_line(&self, batch: &UploadBatch, language: &str) -> String {
        std::iter::once(self.interpreter.clone())
            .chain(
                self.args(batch, language)
                    .iter()
                    .map(|arg| arg.to_string_lossy().into_owned()),
            )
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl Scorer for MossCommand {
    async fn score(&self, batch: &UploadBatch, language: &str) -> Result<ToolOutput, ScoreError> {
        let command = self.command_line(batch, language);
        tracing::info!(
            command = %command,
            files = batch.len(),
            language,
            "running scoring tool"
        );

        let output = Command::new(&self.interpreter)
            .args(self.args(batch, language))
            .current_dir(batch.dir())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ScoreError::Spawn {
                command: command.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(ScoreError::Exit {
                command,
                code: output.status.code(),
                stdout,
                stderr,
            });
        }

        tracing::debug!(stdout_bytes = stdout.len(), "scoring tool finished");
        Ok(ToolOutput {
            command,
            stdout,
            stderr,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::Path;

    fn shell_config(dir: &Path, body: &str) -> ScorerConfig {
        let script = dir.join("fake-moss.sh");
        std::fs::write(&script, body).unwrap();
        ScorerConfig {
            interpreter: "/bin/sh".into(),
            script_path: script,
            ..Default::default()
        }
    }

    async fn batch_with(root: &Path, names: &[&str]) -> UploadBatch {
        let mut batch = UploadBatch::create(Some(root)).unwrap();
        for name in names {
            batch.stage_bytes(name, b"x = 1\n").await.unwrap();
        }
        batch
    }

    #[tokio::test]
    async fn builds_command_line_in_upload_order() {
        let tools = tempfile::tempdir().unwrap();
        let cfg = shell_config(tools.path(), "exit 0\n");
        let batch = batch_with(tools.path(), &["b.py", "a.py"]).await;

        let moss = MossCommand::new(&cfg);
        let line = moss.command_line(&batch, "python");
        let expected = format!(
            "/bin/sh {} -l python -m 10 {} {}",
            cfg.script_path.display(),
            batch.dir().join("b.py").display(),
            batch.dir().join("a.py").display(),
        );
        assert_eq!(line, expected);
    }

    #[tokio::test]
    async fn runs_in_staging_directory_and_captures_output() {
        let tools = tempfile::tempdir().unwrap();
        let cfg = shell_config(
            tools.path(),
            "echo \"args: $*\"\necho \"cwd: $(pwd -P)\"\necho warning >&2\necho http://moss.stanford.edu/results/1/42\n",
        );
        let batch = batch_with(tools.path(), &["a.py"]).await;

        let output = MossCommand::new(&cfg).score(&batch, "c").await.unwrap();

        let staged = batch.dir().join("a.py");
        assert!(output
            .stdout
            .contains(&format!("args: -l c -m 10 {}", staged.display())));
        let cwd = std::fs::canonicalize(batch.dir()).unwrap();
        assert!(output.stdout.contains(&format!("cwd: {}", cwd.display())));
        assert_eq!(output.stderr, "warning\n");
        assert!(output.command.starts_with("/bin/sh "));
    }

    #[tokio::test]
    async fn non_zero_exit_keeps_partial_output() {
        let tools = tempfile::tempdir().unwrap();
        let cfg = shell_config(tools.path(), "echo partial\necho boom >&2\nexit 3\n");
        let batch = batch_with(tools.path(), &["a.py"]).await;

        let err = MossCommand::new(&cfg)
            .score(&batch, "python")
            .await
            .unwrap_err();

        match &err {
            ScoreError::Exit {
                code,
                stdout,
                stderr,
                ..
            } => {
                assert_eq!(*code, Some(3));
                assert_eq!(stdout, "partial\n");
                assert_eq!(stderr, "boom\n");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.details(), "boom\n");
        assert!(err.to_string().contains("exit code 3"));
    }

    #[tokio::test]
    async fn missing_interpreter_is_a_spawn_error() {
        let tools = tempfile::tempdir().unwrap();
        let cfg = ScorerConfig {
            interpreter: "/definitely/not/a/perl".into(),
            ..Default::default()
        };
        let batch = batch_with(tools.path(), &["a.py"]).await;

        let err = MossCommand::new(&cfg)
            .score(&batch, "python")
            .await
            .unwrap_err();
        assert!(matches!(err, ScoreError::Spawn { .. }));
        assert!(err.command().starts_with("/definitely/not/a/perl "));
        assert_eq!(err.stdout(), "");
    }
}
