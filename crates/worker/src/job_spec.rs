//! Job spec files
//!
//! ```json
//! {
//!   "command": "cargo",
//!   "args": ["build", "--release"],
//!   "env": { "RUSTFLAGS": "-Dwarnings" },
//!   "working_dir": "/agent/_work/1/s",
//!   "timeout_ms": 600000
//! }
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use worktemp_core::port::JobCommand;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobSpec {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    pub working_dir: Option<PathBuf>,
    pub timeout_ms: Option<i64>,
}

impl JobSpec {
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: JobSpec = serde_json::from_str(json).context("Invalid job spec JSON")?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read job spec {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Job spec {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if self.command.trim().is_empty() {
            bail!("'command' must not be empty");
        }
        if let Some(timeout_ms) = self.timeout_ms {
            if timeout_ms <= 0 {
                bail!("'timeout_ms' must be positive, got {}", timeout_ms);
            }
        }
        Ok(())
    }

    pub fn into_command(self) -> JobCommand {
        JobCommand {
            command: self.command,
            args: self.args,
            env: self.env,
            working_dir: self.working_dir,
            timeout_ms: self.timeout_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_spec() {
        let spec = JobSpec::from_json(
            &json!({
                "command": "make",
                "args": ["all"],
                "env": {"CC": "clang"},
                "working_dir": "/src",
                "timeout_ms": 1000
            })
            .to_string(),
        )
        .unwrap();

        let command = spec.into_command();
        assert_eq!(command.command, "make");
        assert_eq!(command.args, vec!["all"]);
        assert_eq!(command.env.get("CC").map(String::as_str), Some("clang"));
        assert_eq!(command.working_dir, Some(PathBuf::from("/src")));
        assert_eq!(command.timeout_ms, Some(1000));
    }

    #[test]
    fn test_minimal_spec() {
        let command = JobSpec::from_json(r#"{"command": "true"}"#)
            .unwrap()
            .into_command();

        assert!(command.args.is_empty());
        assert!(command.env.is_empty());
        assert!(command.working_dir.is_none());
    }

    #[test]
    fn test_empty_command_rejected() {
        let err = JobSpec::from_json(r#"{"command": "  "}"#).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_non_positive_timeout_rejected() {
        let err = JobSpec::from_json(r#"{"command": "true", "timeout_ms": 0}"#).unwrap_err();
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(JobSpec::from_json(r#"{"command": "true", "shell": true}"#).is_err());
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let err = JobSpec::load(&path).unwrap_err();

        assert!(err.to_string().contains("missing.json"));
    }
}
