// Port Layer - Interfaces for external dependencies

pub mod cancellation;
pub mod command_executor;
pub mod directory_resolver;
pub mod environment;
pub mod id_provider; // For deterministic testing
pub mod job_context;
pub mod recursive_delete;
pub mod time_provider;

// Re-exports
pub use cancellation::{cancellation_channel, CancellationSource, CancellationToken};
pub use command_executor::{
    CommandExecutor, CommandResult, CommandStatus, ExecutionError, JobCommand,
};
pub use directory_resolver::DirectoryResolver;
pub use environment::{EnvironmentStore, JobEnvironment};
pub use id_provider::IdProvider;
pub use job_context::{JobContext, TracingJobContext};
pub use recursive_delete::{DeleteError, RecursiveDelete};
pub use time_provider::TimeProvider;
