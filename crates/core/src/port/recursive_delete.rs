// Recursive Delete Port
// Abstraction over deleting a directory tree, cooperatively cancellable

use super::cancellation::CancellationToken;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Recursive delete errors
#[derive(Error, Debug)]
pub enum DeleteError {
    #[error("Delete cancelled")]
    Cancelled,

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to delete {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DeleteError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Recursive Delete trait
///
/// Implementations:
/// - FsRecursiveDelete: walks the real filesystem
#[async_trait]
pub trait RecursiveDelete: Send + Sync {
    /// Delete a directory tree
    ///
    /// # Arguments
    /// * `path` - Directory to delete; a missing directory is not an error
    /// * `contents_only` - Keep `path` itself and delete only its entries
    /// * `cancellation` - Checked between entries
    ///
    /// # Errors
    /// - DeleteError::Cancelled if cancellation was requested mid-walk
    /// - DeleteError::NotADirectory if `path` exists but is not a directory
    /// - DeleteError::Io on any filesystem failure
    async fn delete_directory(
        &self,
        path: &Path,
        contents_only: bool,
        cancellation: &CancellationToken,
    ) -> Result<(), DeleteError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Mock delete behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Report success without touching the filesystem
        Success,
        /// Fail with an I/O error of the given kind
        Fail(io::ErrorKind),
        /// Report cancellation
        Cancelled,
    }

    /// A recorded delete request
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct DeleteCall {
        pub path: PathBuf,
        pub contents_only: bool,
    }

    /// Mock Recursive Delete for testing
    pub struct MockRecursiveDelete {
        behavior: MockBehavior,
        calls: Arc<Mutex<Vec<DeleteCall>>>,
    }

    impl MockRecursiveDelete {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
        pub fn new_success() -> Self {
            Self::new(MockBehavior::Success)
        }
        pub fn new_fail(kind: io::ErrorKind) -> Self {
            Self::new(MockBehavior::Fail(kind))
        }
        pub fn calls(&self) -> Vec<DeleteCall> {
            self.calls.lock().unwrap().clone()
        }
        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RecursiveDelete for MockRecursiveDelete {
        async fn delete_directory(
            &self,
            path: &Path,
            contents_only: bool,
            _cancellation: &CancellationToken,
        ) -> Result<(), DeleteError> {
            self.calls.lock().unwrap().push(DeleteCall {
                path: path.to_path_buf(),
                contents_only,
            });

            match &self.behavior {
                MockBehavior::Success => Ok(()),
                MockBehavior::Fail(kind) => Err(DeleteError::io(
                    path,
                    io::Error::new(*kind, "mock delete failure"),
                )),
                MockBehavior::Cancelled => Err(DeleteError::Cancelled),
            }
        }
    }
}
