// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unsupported platform family: {0}")]
    UnsupportedPlatform(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
