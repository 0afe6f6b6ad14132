// Platform capability table for temp path publishing

use super::error::{DomainError, Result};

/// Operating system family, decides which temp variables tools read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
    Windows,
    Posix,
}

impl PlatformFamily {
    /// Family of the running process
    pub fn current() -> Result<Self> {
        Self::from_family(std::env::consts::FAMILY)
    }

    /// Map a `std::env::consts::FAMILY` value to a platform family
    pub fn from_family(family: &str) -> Result<Self> {
        match family {
            "windows" => Ok(Self::Windows),
            "unix" => Ok(Self::Posix),
            other => Err(DomainError::UnsupportedPlatform(other.to_string())),
        }
    }

    /// Environment variables conventionally read as the temp location
    pub fn temp_variables(&self) -> &'static [&'static str] {
        match self {
            Self::Windows => &["TMP", "TEMP"],
            Self::Posix => &["TMPDIR"],
        }
    }
}
