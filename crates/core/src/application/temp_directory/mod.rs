// Temp Directory Manager - per-job scratch directory lifecycle
//
// Initialize: wipe + recreate <work>/_temp, then publish it as the OS temp location.
// Cleanup: wipe the contents again, keep the directory.
// Both honour VSTS_NOTOVERWRITE_TEMP, read independently on every call.

mod outcome;

pub use outcome::TempDirectoryOutcome;

use crate::domain::{
    OptOutFlag, PlatformFamily, WellKnownDirectory, NO_OVERWRITE_TEMP_VAR, TEMP_DIRECTORY_NAME,
};
use crate::error::{AppError, Result};
use crate::port::{DirectoryResolver, EnvironmentStore, JobContext, RecursiveDelete, TimeProvider};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Manages the temp directory shared by the jobs of one agent
pub struct TempDirectoryManager {
    resolver: Arc<dyn DirectoryResolver>,
    deleter: Arc<dyn RecursiveDelete>,
    environment: Arc<dyn EnvironmentStore>,
    platform: PlatformFamily,
    time_provider: Arc<dyn TimeProvider>,
}

impl TempDirectoryManager {
    /// Create a new temp directory manager
    ///
    /// # Arguments
    /// * `resolver` - Resolves the agent work directory
    /// * `deleter` - Recursive delete primitive
    /// * `environment` - Where the opt-out flag is read and the temp path published
    /// * `platform` - Decides which temp variables are set
    /// * `time_provider` - Clock for duration fields
    pub fn new(
        resolver: Arc<dyn DirectoryResolver>,
        deleter: Arc<dyn RecursiveDelete>,
        environment: Arc<dyn EnvironmentStore>,
        platform: PlatformFamily,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            resolver,
            deleter,
            environment,
            platform,
            time_provider,
        }
    }

    /// `<work>/_temp`, recomputed on every call
    pub fn temp_directory(&self) -> PathBuf {
        self.resolver
            .resolve(WellKnownDirectory::Work)
            .join(TEMP_DIRECTORY_NAME)
    }

    /// Prepare an empty temp directory and point the temp variables at it
    ///
    /// A failed delete is logged and ignored; the directory is created
    /// afterwards regardless.
    ///
    /// # Errors
    /// - AppError::InvalidArgument if the job context has no job id
    /// - AppError::Io if the directory cannot be created
    pub async fn initialize_temp_directory(
        &self,
        job: &dyn JobContext,
    ) -> Result<TempDirectoryOutcome> {
        validate_job(job)?;

        let temp_directory = self.temp_directory();
        if self.opt_out().is_set() {
            job.debug("Skipping overwrite %TEMP% environment variable");
            return Ok(TempDirectoryOutcome::Skipped {
                path: temp_directory,
            });
        }

        job.debug(&format!("Cleaning temp folder: {}", temp_directory.display()));
        let outcome = self.clean(&temp_directory, job).await;

        // make sure folder exists
        tokio::fs::create_dir_all(&temp_directory).await?;

        self.publish(&temp_directory, job)?;
        Ok(outcome)
    }

    /// Empty the temp directory after a job, keeping the directory itself
    ///
    /// # Errors
    /// - AppError::InvalidArgument if the job context has no job id
    pub async fn cleanup_temp_directory(
        &self,
        job: &dyn JobContext,
    ) -> Result<TempDirectoryOutcome> {
        validate_job(job)?;

        let temp_directory = self.temp_directory();
        if self.opt_out().is_set() {
            job.debug(&format!(
                "Skipping cleanup temp folder: {}",
                temp_directory.display()
            ));
            return Ok(TempDirectoryOutcome::Skipped {
                path: temp_directory,
            });
        }

        job.debug(&format!("Cleaning temp folder: {}", temp_directory.display()));
        Ok(self.clean(&temp_directory, job).await)
    }

    fn opt_out(&self) -> OptOutFlag {
        OptOutFlag::parse(self.environment.get(NO_OVERWRITE_TEMP_VAR).as_deref())
    }

    /// Contents-only delete; failures become an outcome, never an error
    async fn clean(&self, temp_directory: &Path, job: &dyn JobContext) -> TempDirectoryOutcome {
        let started = self.time_provider.now_millis();

        match self
            .deleter
            .delete_directory(temp_directory, true, job.cancellation_token())
            .await
        {
            Ok(()) => {
                let duration_ms = self.time_provider.now_millis() - started;
                debug!(
                    job_id = %job.job_id(),
                    path = %temp_directory.display(),
                    duration_ms = %duration_ms,
                    "Temp folder cleaned"
                );
                TempDirectoryOutcome::Cleaned {
                    path: temp_directory.to_path_buf(),
                    duration_ms,
                }
            }
            Err(e) => {
                error!(
                    job_id = %job.job_id(),
                    path = %temp_directory.display(),
                    "Failed cleaning one or more temp file"
                );
                error!(job_id = %job.job_id(), error = ?e, "{}", e);
                TempDirectoryOutcome::CleanFailed {
                    path: temp_directory.to_path_buf(),
                    error: e,
                }
            }
        }
    }

    fn publish(&self, temp_directory: &Path, job: &dyn JobContext) -> Result<()> {
        let value = temp_directory.to_str().ok_or_else(|| {
            AppError::Internal(format!(
                "Temp directory path is not valid UTF-8: {}",
                temp_directory.display()
            ))
        })?;

        for name in self.platform.temp_variables() {
            job.debug(&format!("SET {}={}", name, value));
            self.environment.set(name, value);
        }

        info!(
            job_id = %job.job_id(),
            path = %value,
            variables = ?self.platform.temp_variables(),
            "Temp directory published"
        );
        Ok(())
    }
}

/// A job context must identify a job
fn validate_job(job: &dyn JobContext) -> Result<()> {
    if job.job_id().trim().is_empty() {
        return Err(AppError::InvalidArgument(
            "job context has no job id".to_string(),
        ));
    }
    Ok(())
}
