//! Worker configuration (CLI flags with environment fallbacks)

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::job_spec::JobSpec;
use worktemp_core::port::JobCommand;

const DEFAULT_ROOT: &str = "~/.worktemp";

#[derive(Parser, Debug)]
#[command(name = "worktemp-worker")]
#[command(about = "Run one job inside a clean per-job temp directory", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Agent root directory
    #[arg(long, env = "WORKTEMP_ROOT", default_value = DEFAULT_ROOT)]
    pub root: String,

    /// Work directory (default: <root>/_work)
    #[arg(long, env = "WORKTEMP_WORK_DIR")]
    pub work_dir: Option<String>,

    /// Job spec JSON file
    #[arg(long, conflicts_with = "command")]
    pub job_file: Option<PathBuf>,

    /// Job id (default: random UUID)
    #[arg(long)]
    pub job_id: Option<String>,

    /// Kill the job after this many milliseconds
    #[arg(long)]
    pub timeout_ms: Option<i64>,

    /// Publish the temp path into the worker's own environment
    #[arg(long)]
    pub process_env: bool,

    /// Command and arguments, after `--`
    #[arg(last = true)]
    pub command: Vec<String>,
}

impl Cli {
    pub fn root_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.root).into_owned())
    }

    pub fn work_dir(&self) -> Option<PathBuf> {
        self.work_dir
            .as_deref()
            .map(|dir| PathBuf::from(shellexpand::tilde(dir).into_owned()))
    }

    /// The job to run, from `--job-file` or the trailing command
    pub fn job_command(&self) -> Result<JobCommand> {
        let mut command = match (&self.job_file, self.command.split_first()) {
            (Some(path), _) => JobSpec::load(path)?.into_command(),
            (None, Some((program, args))) => JobCommand::new(program.as_str()).with_args(args),
            (None, None) => bail!("No job to run: pass --job-file <path> or -- <command> [args...]"),
        };

        if let Some(timeout_ms) = self.timeout_ms {
            if timeout_ms <= 0 {
                bail!("--timeout-ms must be positive, got {}", timeout_ms);
            }
            command.timeout_ms = Some(timeout_ms);
        }
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("worktemp-worker").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_trailing_command() {
        let cli = parse(&["--root", "/agent", "--", "make", "-j4", "all"]);

        let command = cli.job_command().unwrap();

        assert_eq!(cli.root_dir(), PathBuf::from("/agent"));
        assert_eq!(command.command, "make");
        assert_eq!(command.args, vec!["-j4", "all"]);
        assert!(command.timeout_ms.is_none());
    }

    #[test]
    fn test_timeout_override() {
        let cli = parse(&["--root", "/agent", "--timeout-ms", "250", "--", "true"]);
        assert_eq!(cli.job_command().unwrap().timeout_ms, Some(250));
    }

    #[test]
    fn test_no_command_is_an_error() {
        let cli = parse(&["--root", "/agent"]);
        assert!(cli.job_command().is_err());
    }

    #[test]
    fn test_job_file_conflicts_with_command() {
        let result = Cli::try_parse_from([
            "worktemp-worker",
            "--job-file",
            "job.json",
            "--",
            "true",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_job_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.json");
        std::fs::write(&path, r#"{"command": "echo", "args": ["hi"]}"#).unwrap();
        let cli = parse(&["--root", "/agent", "--job-file", path.to_str().unwrap()]);

        let command = cli.job_command().unwrap();

        assert_eq!(command.command, "echo");
        assert_eq!(command.args, vec!["hi"]);
    }

    #[test]
    fn test_work_dir_override() {
        let cli = parse(&["--root", "/agent", "--work-dir", "/srv/work", "--", "true"]);
        assert_eq!(cli.work_dir(), Some(PathBuf::from("/srv/work")));
    }
}
