use crate::executor::Invocation;
use async_trait::async_trait;
use colored::*;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// What happened to one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The engine ran. `code` is `None` when it was killed by a signal.
    Exited { code: Option<i32>, elapsed: Duration },
    /// The engine could not be started at all.
    SpawnFailed { error: String },
}

#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, invocation: &Invocation) -> DispatchOutcome;
}

/// Runs the automation engine as a child process with inherited stdio.
///
/// The exit code is reported as-is: no retries, no interpretation.
pub struct EngineDispatcher;

impl EngineDispatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EngineDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Dispatcher for EngineDispatcher {
    async fn dispatch(&self, invocation: &Invocation) -> DispatchOutcome {
        eprintln!("{} {}", "[>] Running:".cyan().bold(), invocation);

        let started = Instant::now();
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await;

        match status {
            Ok(status) => {
                let elapsed = started.elapsed();
                tracing::info!(
                    program = %invocation.program,
                    code = ?status.code(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "engine finished"
                );
                DispatchOutcome::Exited {
                    code: status.code(),
                    elapsed,
                }
            }
            Err(e) => {
                tracing::error!(program = %invocation.program, error = %e, "failed to spawn engine");
                DispatchOutcome::SpawnFailed { error: e.to_string() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_exit_code_is_reported() {
        let invocation = Invocation {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "exit 3".to_string()],
        };

        match EngineDispatcher::new().dispatch(&invocation).await {
            DispatchOutcome::Exited { code, .. } => assert_eq!(code, Some(3)),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_executable_is_spawn_failure() {
        let invocation = Invocation {
            program: "playgate-no-such-engine".to_string(),
            args: vec![],
        };

        assert!(matches!(
            EngineDispatcher::new().dispatch(&invocation).await,
            DispatchOutcome::SpawnFailed { .. }
        ));
    }
}
