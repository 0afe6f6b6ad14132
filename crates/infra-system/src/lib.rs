// Worktemp Infrastructure - System Adapters
// Implements: RecursiveDelete, DirectoryResolver, EnvironmentStore, CommandExecutor (ADR-002)

pub mod directory_resolver_impl;
pub mod fs_recursive_delete;
pub mod job_command_runner;
pub mod process_environment;

pub use directory_resolver_impl::HostDirectoryResolver;
pub use fs_recursive_delete::FsRecursiveDelete;
pub use job_command_runner::JobCommandRunner;
pub use process_environment::ProcessEnvironment;
