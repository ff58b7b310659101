use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::{Child, Command};

use crate::error::EnrichmentError;

/// A fully-resolved external command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<String>,
}

/// Captured outcome of one finished tool run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim_end().to_string()
    }
}

/// Starts invocations.
pub trait Executor: Send + Sync {
    type Running: RunningTool;

    fn launch(&self, invocation: &ToolInvocation) -> Result<Self::Running, EnrichmentError>;
}

/// A launched tool. `wait` runs it to completion the first time and returns
/// the same result on every later call.
#[async_trait]
pub trait RunningTool: Send {
    async fn wait(&mut self) -> Result<&ExecutionResult, EnrichmentError>;
}

/// Spawns a real child process with piped stdout/stderr and a null stdin.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor {
    timeout: Option<Duration>,
}

impl ProcessExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Executor for ProcessExecutor {
    type Running = ProcessRun;

    fn launch(&self, invocation: &ToolInvocation) -> Result<ProcessRun, EnrichmentError> {
        tracing::debug!(program = %invocation.program, args = ?invocation.args, "spawning external tool");

        let child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EnrichmentError::Launch {
                program: invocation.program.clone(),
                source,
            })?;

        Ok(ProcessRun {
            program: invocation.program.clone(),
            timeout: self.timeout,
            child: Some(child),
            result: None,
        })
    }
}

/// Child process handle; dropping it kills a still-running tool.
#[derive(Debug)]
pub struct ProcessRun {
    program: String,
    timeout: Option<Duration>,
    child: Option<Child>,
    result: Option<ExecutionResult>,
}

#[async_trait]
impl RunningTool for ProcessRun {
    async fn wait(&mut self) -> Result<&ExecutionResult, EnrichmentError> {
        let result = match self.result.take() {
            Some(res) => res,
            None => self.collect().await?,
        };
        Ok(self.result.insert(result))
    }
}

impl ProcessRun {
    async fn collect(&mut self) -> Result<ExecutionResult, EnrichmentError> {
        let Some(child) = self.child.take() else {
            return Err(EnrichmentError::Launch {
                program: self.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "process was already reaped"),
            });
        };

        // Both pipes are drained while waiting, so a chatty tool cannot block on a full pipe.
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| EnrichmentError::Timeout {
                    program: self.program.clone(),
                    secs: limit.as_secs(),
                })?,
            None => child.wait_with_output().await,
        }
        .map_err(|source| EnrichmentError::Launch {
            program: self.program.clone(),
            source,
        })?;

        let result = ExecutionResult {
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        };
        tracing::debug!(
            exit_code = ?result.exit_code,
            stdout_bytes = result.stdout.len(),
            stderr_bytes = result.stderr.len(),
            "external tool finished"
        );
        Ok(result)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> ToolInvocation {
        ToolInvocation {
            program: "sh".into(),
            args: vec!["-c".into(), script.into()],
        }
    }

    async fn run_once(script: &str) -> ExecutionResult {
        let mut run = ProcessExecutor::new().launch(&sh(script)).unwrap();
        run.wait().await.unwrap().clone()
    }

    #[tokio::test]
    async fn captures_streams_and_exit_code() {
        let res = run_once("printf out; printf err >&2; exit 3").await;
        assert_eq!(res.exit_code, Some(3));
        assert_eq!(res.stdout, b"out");
        assert_eq!(res.stderr_lossy(), "err");
        assert!(!res.success());
    }

    #[tokio::test]
    async fn killed_by_signal_has_no_exit_code() {
        let res = run_once("echo boom >&2; kill -9 $$").await;
        assert_eq!(res.exit_code, None);
        assert!(!res.success());
        assert_eq!(res.stderr_lossy(), "boom");
    }

    #[tokio::test]
    async fn stdin_is_empty() {
        let res = run_once("cat").await;
        assert!(res.success());
        assert!(res.stdout.is_empty());
    }

    #[tokio::test]
    async fn wait_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("runs.log");
        let script = format!("echo run >> '{}'; printf done", log.display());

        let mut run = ProcessExecutor::new().launch(&sh(&script)).unwrap();
        let first = run.wait().await.unwrap().clone();
        let second = run.wait().await.unwrap().clone();
        let third = run.wait().await.unwrap().clone();

        assert_eq!(first, second);
        assert_eq!(second, third);
        assert_eq!(first.stdout, b"done");
        assert_eq!(std::fs::read_to_string(&log).unwrap(), "run\n");
    }

    #[tokio::test]
    async fn missing_binary_is_a_launch_error() {
        let inv = ToolInvocation {
            program: "bsw-recon-no-such-binary".into(),
            args: vec![],
        };
        let err = ProcessExecutor::new().launch(&inv).unwrap_err();
        assert!(matches!(err, EnrichmentError::Launch { .. }));
    }

    #[tokio::test]
    async fn timeout_kills_hung_tool() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("finished");
        let script = format!("sleep 1; touch '{}'", marker.display());

        let mut run = ProcessExecutor::new()
            .with_timeout(Some(Duration::from_millis(200)))
            .launch(&sh(&script))
            .unwrap();
        let err = run.wait().await.unwrap_err();
        assert!(matches!(err, EnrichmentError::Timeout { .. }));

        // A surviving shell would create the marker after its sleep.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists());
    }
}
