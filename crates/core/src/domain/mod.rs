// Domain Layer - Pure business logic and entities

pub mod directory;
pub mod error;
pub mod opt_out;
pub mod platform;

// Re-exports
pub use directory::{WellKnownDirectory, TEMP_DIRECTORY_NAME};
pub use error::DomainError;
pub use opt_out::{OptOutFlag, NO_OVERWRITE_TEMP_VAR};
pub use platform::PlatformFamily;
