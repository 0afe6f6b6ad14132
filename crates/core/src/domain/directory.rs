// Well-known agent directories

use std::fmt;

/// Name of the per-job scratch directory under the work directory
pub const TEMP_DIRECTORY_NAME: &str = "_temp";

/// Default name of the work directory under the agent root
pub const WORK_DIRECTORY_NAME: &str = "_work";

/// Name of the diagnostics directory under the agent root
pub const DIAG_DIRECTORY_NAME: &str = "_diag";

/// Name of the tool cache directory under the work directory
pub const TOOLS_DIRECTORY_NAME: &str = "_tool";

/// Logical directory roles the host knows how to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownDirectory {
    Root,
    Work,
    Diag,
    Tools,
}

impl WellKnownDirectory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Work => "work",
            Self::Diag => "diag",
            Self::Tools => "tools",
        }
    }
}

impl fmt::Display for WellKnownDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(WellKnownDirectory::Work.to_string(), "work");
        assert_eq!(WellKnownDirectory::Tools.to_string(), "tools");
    }
}
