// Application Layer - Use Cases and Business Logic

pub mod constants;
pub mod job_lifecycle;
pub mod temp_directory;

// Re-exports
pub use job_lifecycle::JobLifecycle;
pub use temp_directory::{TempDirectoryManager, TempDirectoryOutcome};
