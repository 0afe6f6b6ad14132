// Directory Resolver Port
// Maps logical directory roles to absolute paths owned by the host

use crate::domain::WellKnownDirectory;
use std::path::PathBuf;

/// Host directory resolution
///
/// Treated as infallible: a host that cannot resolve its own layout is
/// misconfigured before any job starts.
pub trait DirectoryResolver: Send + Sync {
    /// Absolute path for the given role
    fn resolve(&self, directory: WellKnownDirectory) -> PathBuf;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;

    /// Resolver that places every role under a fixed work directory
    pub struct FixedDirectoryResolver {
        work: PathBuf,
    }

    impl FixedDirectoryResolver {
        pub fn new(work: impl Into<PathBuf>) -> Self {
            Self { work: work.into() }
        }
    }

    impl DirectoryResolver for FixedDirectoryResolver {
        fn resolve(&self, directory: WellKnownDirectory) -> PathBuf {
            match directory {
                WellKnownDirectory::Work => self.work.clone(),
                other => self.work.join(other.as_str()),
            }
        }
    }
}
