//! Table-body fallback: bounded invocation, external command, mock

use super::traits::{FallbackError, TableFallback};
use super::types::TableRegion;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Cells recovered for a table region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableBody {
    #[serde(default)]
    pub header: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

/// Run a fallback with an upper time bound.
///
/// A fallback that overruns is dropped (child processes are killed on drop)
/// and reported as [`FallbackError::Timeout`].
pub async fn recover_with_timeout(
    fallback: &dyn TableFallback,
    region: &TableRegion,
    timeout: Duration,
) -> Result<TableBody, FallbackError> {
    match tokio::time::timeout(timeout, fallback.recover(region)).await {
        Ok(result) => result,
        Err(_) => Err(FallbackError::Timeout(timeout)),
    }
}

/// Fallback backed by an external program.
///
/// The region is written as JSON to the program's stdin; the program
/// answers with a [`TableBody`] as JSON on stdout.
pub struct CommandTableFallback {
    program: String,
    args: Vec<String>,
}

impl CommandTableFallback {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl TableFallback for CommandTableFallback {
    fn id(&self) -> &str {
        &self.program
    }

    async fn recover(&self, region: &TableRegion) -> Result<TableBody, FallbackError> {
        let payload = serde_json::to_vec(region)
            .map_err(|e| FallbackError::Failed(format!("cannot encode region: {}", e)))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| FallbackError::Unavailable(format!("{}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&payload)
                .await
                .map_err(|e| FallbackError::Failed(format!("cannot write stdin: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| FallbackError::Failed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FallbackError::Failed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| FallbackError::Failed(format!("unparseable table body: {}", e)))
    }
}

enum MockBehavior {
    Succeed(TableBody),
    Fail(String),
    Hang,
}

/// Fallback with scripted behavior for tests.
pub struct MockTableFallback {
    behavior: MockBehavior,
}

impl MockTableFallback {
    /// Always returns `body`.
    pub fn succeeding(body: TableBody) -> Self {
        Self {
            behavior: MockBehavior::Succeed(body),
        }
    }

    /// Always fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            behavior: MockBehavior::Fail(message.into()),
        }
    }

    /// Never answers; only a timeout ends the call.
    pub fn hanging() -> Self {
        Self {
            behavior: MockBehavior::Hang,
        }
    }
}

#[async_trait]
impl TableFallback for MockTableFallback {
    fn id(&self) -> &str {
        "mock"
    }

    async fn recover(&self, _region: &TableRegion) -> Result<TableBody, FallbackError> {
        match &self.behavior {
            MockBehavior::Succeed(body) => Ok(body.clone()),
            MockBehavior::Fail(message) => Err(FallbackError::Failed(message.clone())),
            MockBehavior::Hang => std::future::pending().await,
        }
    }
}
