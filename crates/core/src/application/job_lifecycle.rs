// Job Lifecycle - temp directory scoped command execution

use crate::application::temp_directory::TempDirectoryManager;
use crate::error::Result;
use crate::port::{CommandExecutor, CommandResult, EnvironmentStore, JobCommand, JobContext};
use std::sync::Arc;
use tracing::{error, info};

/// Runs one job between temp directory initialize and cleanup
pub struct JobLifecycle {
    temp_directories: Arc<TempDirectoryManager>,
    executor: Arc<dyn CommandExecutor>,
    environment: Arc<dyn EnvironmentStore>,
}

impl JobLifecycle {
    /// `environment` must be the store the manager publishes into,
    /// otherwise the child never sees the temp path.
    pub fn new(
        temp_directories: Arc<TempDirectoryManager>,
        executor: Arc<dyn CommandExecutor>,
        environment: Arc<dyn EnvironmentStore>,
    ) -> Self {
        Self {
            temp_directories,
            executor,
            environment,
        }
    }

    /// Initialize, execute, then always clean up
    ///
    /// # Errors
    /// - AppError::InvalidArgument / AppError::Io from initialization (command not run)
    /// - AppError::Execution if the command could not be spawned or stopped
    pub async fn run(&self, job: &dyn JobContext, command: &JobCommand) -> Result<CommandResult> {
        self.temp_directories.initialize_temp_directory(job).await?;

        info!(job_id = %job.job_id(), command = %command.command, "Starting job command");
        let result = self
            .executor
            .execute(command, self.environment.as_ref(), job.cancellation_token())
            .await;

        if let Err(e) = self.temp_directories.cleanup_temp_directory(job).await {
            error!(job_id = %job.job_id(), error = %e, "Temp directory cleanup failed");
        }

        let result = result?;
        info!(
            job_id = %job.job_id(),
            status = ?result.status,
            exit_code = ?result.exit_code,
            duration_ms = %result.duration_ms,
            "Job command finished"
        );
        Ok(result)
    }
}
