//! Worktemp Worker - Main Entry Point
//! Runs a single job: initialize temp directory, run the command, clean up.

mod config;
mod job_spec;

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Cli;
use worktemp_core::application::{JobLifecycle, TempDirectoryManager};
use worktemp_core::domain::PlatformFamily;
use worktemp_core::port::id_provider::UuidProvider;
use worktemp_core::port::time_provider::SystemTimeProvider;
use worktemp_core::port::{
    cancellation_channel, CommandResult, CommandStatus, EnvironmentStore, IdProvider,
    JobEnvironment, TimeProvider, TracingJobContext,
};
use worktemp_infra_system::{
    FsRecursiveDelete, HostDirectoryResolver, JobCommandRunner, ProcessEnvironment,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit code reported when the job hit its timeout (same as coreutils `timeout`)
const TIMEOUT_EXIT_CODE: u8 = 124;
/// Exit code reported when the job was cancelled (128 + SIGINT)
const CANCELLED_EXIT_CODE: u8 = 130;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 1. Initialize logging
    init_logging()?;
    info!("Worktemp worker v{} starting...", VERSION);

    // 2. Load configuration
    let command = cli.job_command()?;
    let platform = PlatformFamily::current().context("Cannot publish temp directory")?;

    let mut resolver = HostDirectoryResolver::new(cli.root_dir());
    if let Some(work_dir) = cli.work_dir() {
        resolver = resolver.with_work_directory(work_dir);
    }

    // 3. Setup dependencies (DI wiring)
    let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
    let environment: Arc<dyn EnvironmentStore> = if cli.process_env {
        Arc::new(ProcessEnvironment::new())
    } else {
        Arc::new(JobEnvironment::inherit_process())
    };

    let temp_directories = Arc::new(TempDirectoryManager::new(
        Arc::new(resolver),
        Arc::new(FsRecursiveDelete::new()),
        environment.clone(),
        platform,
        time_provider.clone(),
    ));
    let lifecycle = JobLifecycle::new(
        temp_directories,
        Arc::new(JobCommandRunner::new(time_provider)),
        environment,
    );

    // 4. Job context with Ctrl+C wired to cancellation
    let job_id = resolve_job_id(cli.job_id.clone(), &UuidProvider);
    let (cancel_source, cancellation) = cancellation_channel();
    let job = TracingJobContext::new(job_id.clone(), cancellation);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling job");
            cancel_source.cancel();
        }
    });

    // 5. Run the job
    info!(job_id = %job_id, "Running job");
    let result = lifecycle
        .run(&job, &command)
        .await
        .with_context(|| format!("Job {} failed", job_id))?;

    Ok(ExitCode::from(exit_code(&result)))
}

fn init_logging() -> Result<()> {
    let log_format = std::env::var("WORKTEMP_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("worktemp=info"))
        .context("Failed to create env filter")?;

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
    Ok(())
}

/// Explicit `--job-id`, or a fresh one from `ids`
fn resolve_job_id(explicit: Option<String>, ids: &dyn IdProvider) -> String {
    explicit.unwrap_or_else(|| ids.generate_id())
}

/// Process exit code for a finished job
fn exit_code(result: &CommandResult) -> u8 {
    match result.status {
        CommandStatus::Success => 0,
        CommandStatus::Failed => result
            .exit_code
            .and_then(|code| u8::try_from(code).ok())
            .filter(|code| *code != 0)
            .unwrap_or(1),
        CommandStatus::Timeout => TIMEOUT_EXIT_CODE,
        CommandStatus::Cancelled => CANCELLED_EXIT_CODE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worktemp_core::port::id_provider::mocks::SequentialIdProvider;

    fn result(status: CommandStatus, exit_code: Option<i32>) -> CommandResult {
        CommandResult {
            status,
            exit_code,
            duration_ms: 0,
        }
    }

    #[test]
    fn test_job_id_generated_only_when_missing() {
        let ids = SequentialIdProvider::new("job");

        assert_eq!(resolve_job_id(Some("given".to_string()), &ids), "given");
        assert_eq!(resolve_job_id(None, &ids), "job-1");
        assert_eq!(resolve_job_id(None, &ids), "job-2");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&result(CommandStatus::Success, Some(0))), 0);
        assert_eq!(exit_code(&result(CommandStatus::Failed, Some(3))), 3);
        assert_eq!(exit_code(&result(CommandStatus::Failed, None)), 1);
        assert_eq!(exit_code(&result(CommandStatus::Failed, Some(300))), 1);
        assert_eq!(exit_code(&result(CommandStatus::Timeout, None)), 124);
        assert_eq!(exit_code(&result(CommandStatus::Cancelled, None)), 130);
    }
}
