//! Running the backend process.
//!
//! The backend is spawned fresh for every request with a copy of our own
//! environment in which the port variable is overridden. Whatever it prints
//! on stdout before exiting is the response body.

use std::collections::HashMap;
use std::ffi::OsString;
use std::process::{ExitStatus, Stdio};

use serde_json::Value;
use tokio::process::Command;

use crate::config::ProxyConfig;
use crate::error::{ProxyError, ProxyResult};

/// How to launch the backend.
#[derive(Debug, Clone)]
pub struct Backend {
    command: String,
    args: Vec<String>,
    port_env_var: String,
    port: u16,
}

/// What the backend printed on stdout, interpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendReply {
    Json(Value),
    Text(String),
}

impl Backend {
    pub fn from_config(config: &ProxyConfig) -> Self {
        Self {
            command: config.backend_command.clone(),
            args: config.backend_args.clone(),
            port_env_var: config.port_env_var.clone(),
            port: config.backend_port,
        }
    }

    /// The environment handed to the child: ours, with the port variable set.
    pub fn environment(&self) -> HashMap<OsString, OsString> {
        let mut env: HashMap<OsString, OsString> = std::env::vars_os().collect();
        env.insert(
            OsString::from(&self.port_env_var),
            OsString::from(self.port.to_string()),
        );
        env
    }

    /// Run the backend to completion and return its stdout.
    ///
    /// stdout and stderr are drained concurrently so a chatty stderr cannot
    /// stall the child. Non-zero exits carry the captured stderr.
    pub async fn run(&self) -> ProxyResult<Vec<u8>> {
        let child = Command::new(&self.command)
            .args(&self.args)
            .env_clear()
            .envs(self.environment())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProxyError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        let pid = child.id();
        tracing::debug!(command = %self.command, pid, "Spawned backend process");

        let output = child.wait_with_output().await?;
        tracing::debug!(
            pid,
            status = %output.status,
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "Backend process exited"
        );

        if !output.status.success() {
            return Err(ProxyError::Exit {
                status: status_label(output.status),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(output.stdout)
    }
}

fn status_label(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

/// JSON when stdout parses as JSON, raw text otherwise.
pub fn interpret(stdout: &[u8]) -> BackendReply {
    match serde_json::from_slice(stdout) {
        Ok(value) => BackendReply::Json(value),
        Err(_) => BackendReply::Text(String::from_utf8_lossy(stdout).into_owned()),
    }
}
