use crate::port::DeleteError;
use std::path::{Path, PathBuf};

/// What a temp directory operation did
#[derive(Debug)]
pub enum TempDirectoryOutcome {
    /// Opt-out flag was set, nothing touched
    Skipped { path: PathBuf },
    /// Contents deleted
    Cleaned { path: PathBuf, duration_ms: i64 },
    /// Delete failed or was cancelled; logged and swallowed
    CleanFailed { path: PathBuf, error: DeleteError },
}

impl TempDirectoryOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Skipped { path } | Self::Cleaned { path, .. } | Self::CleanFailed { path, .. } => {
                path
            }
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}
