// Job command runner (Phase 2)
// reason: tokio::process so timeout and cancellation can race the child (ADR-001)
use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::{info, warn};

use worktemp_core::application::constants::{GRACEFUL_SHUTDOWN_TIMEOUT_MS, KILL_POLL_INTERVAL};
use worktemp_core::port::command_executor::{
    CommandExecutor, CommandResult, CommandStatus, ExecutionError, JobCommand,
};
use worktemp_core::port::{CancellationToken, EnvironmentStore, TimeProvider};

/// Runs job commands as child processes of the worker
///
/// The child's environment is the job environment snapshot overlaid with the
/// command's own variables, so a temp path published into a `JobEnvironment`
/// reaches the child without touching the worker's global environment.
pub struct JobCommandRunner {
    time_provider: Arc<dyn TimeProvider>,
}

impl JobCommandRunner {
    /// Create a new job command runner
    ///
    /// # Example
    /// ```ignore
    /// let runner = JobCommandRunner::new(Arc::new(SystemTimeProvider));
    /// ```
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self { time_provider }
    }

    fn spawn(
        &self,
        command: &JobCommand,
        environment: &dyn EnvironmentStore,
    ) -> Result<Child, ExecutionError> {
        let mut cmd = Command::new(&command.command);
        cmd.args(&command.args)
            .envs(environment.snapshot())
            .envs(&command.env)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(working_dir) = &command.working_dir {
            cmd.current_dir(working_dir);
        }

        cmd.spawn()
            .map_err(|e| ExecutionError::SpawnFailed(format!("{}: {}", command.command, e)))
    }

    /// Kill with SIGTERM first, then SIGKILL if needed (ADR-002)
    async fn terminate(&self, child: &mut Child) -> Result<(), ExecutionError> {
        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            if let Some(pid) = child.id() {
                info!(pid = %pid, "Sending SIGTERM for graceful shutdown");
                if let Err(e) = kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
                    warn!(pid = %pid, error = %e, "SIGTERM failed");
                }

                let start_time = self.time_provider.now_millis();
                while self.time_provider.now_millis() - start_time <= GRACEFUL_SHUTDOWN_TIMEOUT_MS {
                    match child.try_wait() {
                        Ok(Some(_)) => {
                            info!(pid = %pid, "Process exited gracefully after SIGTERM");
                            return Ok(());
                        }
                        Ok(None) => tokio::time::sleep(KILL_POLL_INTERVAL).await,
                        Err(e) => return Err(ExecutionError::IoError(e.to_string())),
                    }
                }
                warn!(pid = %pid, "Process did not exit after SIGTERM, sending SIGKILL");
            }
        }

        child
            .kill()
            .await
            .map_err(|e| ExecutionError::Killed(e.to_string()))
    }

    fn finished(&self, status: ExitStatus, start_time: i64) -> CommandResult {
        CommandResult {
            status: if status.success() {
                CommandStatus::Success
            } else {
                CommandStatus::Failed
            },
            exit_code: status.code(),
            duration_ms: self.time_provider.now_millis() - start_time,
        }
    }

    fn interrupted(&self, status: CommandStatus, start_time: i64) -> CommandResult {
        CommandResult {
            status,
            exit_code: None,
            duration_ms: self.time_provider.now_millis() - start_time,
        }
    }
}

async fn deadline(timeout_ms: Option<i64>) {
    match timeout_ms {
        Some(ms) => tokio::time::sleep(Duration::from_millis(ms.max(0) as u64)).await,
        None => std::future::pending::<()>().await,
    }
}

#[async_trait]
impl CommandExecutor for JobCommandRunner {
    async fn execute(
        &self,
        command: &JobCommand,
        environment: &dyn EnvironmentStore,
        cancellation: &CancellationToken,
    ) -> Result<CommandResult, ExecutionError> {
        let start_time = self.time_provider.now_millis();

        info!(
            command = %command.command,
            args = ?command.args,
            working_dir = ?command.working_dir,
            timeout_ms = ?command.timeout_ms,
            "Starting job command"
        );

        let mut child = self.spawn(command, environment)?;

        let result = tokio::select! {
            waited = child.wait() => {
                let status = waited.map_err(|e| ExecutionError::IoError(e.to_string()))?;
                self.finished(status, start_time)
            }
            _ = deadline(command.timeout_ms) => {
                warn!(command = %command.command, timeout_ms = ?command.timeout_ms, "Job command timed out");
                self.terminate(&mut child).await?;
                self.interrupted(CommandStatus::Timeout, start_time)
            }
            _ = cancellation.cancelled() => {
                warn!(command = %command.command, "Job cancelled, stopping command");
                self.terminate(&mut child).await?;
                self.interrupted(CommandStatus::Cancelled, start_time)
            }
        };

        info!(
            command = %command.command,
            duration_ms = %result.duration_ms,
            exit_code = ?result.exit_code,
            status = ?result.status,
            "Job command completed"
        );

        Ok(result)
    }
}
