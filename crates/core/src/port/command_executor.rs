// Command Executor Port
// Runs a job's command as a child process of the worker

use super::cancellation::CancellationToken;
use super::environment::EnvironmentStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// What the job runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobCommand {
    pub command: String,
    pub args: Vec<String>,
    /// Extra variables applied on top of the job environment
    pub env: HashMap<String, String>,
    pub working_dir: Option<PathBuf>,
    pub timeout_ms: Option<i64>,
}

impl JobCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

/// Result of command execution
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub exit_code: Option<i32>,
    pub duration_ms: i64,
}

/// Execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failed,
    Timeout,
    Cancelled,
}

/// Execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Process killed: {0}")]
    Killed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Command Executor trait
///
/// Implementations:
/// - JobCommandRunner (infra-system): spawns a real child process
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run the command to completion
    ///
    /// Children see `environment.snapshot()` overlaid with `command.env`.
    /// Timeout and cancellation terminate the child and are reported through
    /// [`CommandStatus`], not as errors.
    ///
    /// # Errors
    /// - ExecutionError::SpawnFailed if the process cannot be started
    /// - ExecutionError::Killed if a timed out or cancelled child cannot be stopped
    async fn execute(
        &self,
        command: &JobCommand,
        environment: &dyn EnvironmentStore,
        cancellation: &CancellationToken,
    ) -> Result<CommandResult, ExecutionError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock executor that records the environment each call saw
    pub struct MockCommandExecutor {
        status: CommandStatus,
        exit_code: Option<i32>,
        seen_env: Arc<Mutex<Vec<HashMap<String, String>>>>,
    }

    impl MockCommandExecutor {
        pub fn new(status: CommandStatus, exit_code: Option<i32>) -> Self {
            Self {
                status,
                exit_code,
                seen_env: Arc::new(Mutex::new(Vec::new())),
            }
        }
        pub fn new_success() -> Self {
            Self::new(CommandStatus::Success, Some(0))
        }
        pub fn seen_env(&self) -> Vec<HashMap<String, String>> {
            self.seen_env.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandExecutor for MockCommandExecutor {
        async fn execute(
            &self,
            command: &JobCommand,
            environment: &dyn EnvironmentStore,
            _cancellation: &CancellationToken,
        ) -> Result<CommandResult, ExecutionError> {
            let mut env = environment.snapshot();
            env.extend(command.env.clone());
            self.seen_env.lock().unwrap().push(env);

            Ok(CommandResult {
                status: self.status,
                exit_code: self.exit_code,
                duration_ms: 1,
            })
        }
    }
}
