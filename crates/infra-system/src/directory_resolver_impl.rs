// Host directory layout
use std::path::PathBuf;

use worktemp_core::domain::directory::{
    DIAG_DIRECTORY_NAME, TOOLS_DIRECTORY_NAME, WORK_DIRECTORY_NAME,
};
use worktemp_core::domain::WellKnownDirectory;
use worktemp_core::port::DirectoryResolver;

/// Resolves agent directories relative to the agent root
///
/// ```text
/// <root>/
///   _diag/
///   _work/          (or the configured work directory)
///     _tool/
///     _temp/
/// ```
#[derive(Debug, Clone)]
pub struct HostDirectoryResolver {
    root: PathBuf,
    work: PathBuf,
}

impl HostDirectoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let work = root.join(WORK_DIRECTORY_NAME);
        Self { root, work }
    }

    /// Use a work directory outside the default `<root>/_work`
    pub fn with_work_directory(mut self, work: impl Into<PathBuf>) -> Self {
        self.work = work.into();
        self
    }
}

impl DirectoryResolver for HostDirectoryResolver {
    fn resolve(&self, directory: WellKnownDirectory) -> PathBuf {
        match directory {
            WellKnownDirectory::Root => self.root.clone(),
            WellKnownDirectory::Work => self.work.clone(),
            WellKnownDirectory::Diag => self.root.join(DIAG_DIRECTORY_NAME),
            WellKnownDirectory::Tools => self.work.join(TOOLS_DIRECTORY_NAME),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_default_layout() {
        let resolver = HostDirectoryResolver::new("/agent");

        assert_eq!(resolver.resolve(WellKnownDirectory::Root), Path::new("/agent"));
        assert_eq!(
            resolver.resolve(WellKnownDirectory::Work),
            Path::new("/agent/_work")
        );
        assert_eq!(
            resolver.resolve(WellKnownDirectory::Diag),
            Path::new("/agent/_diag")
        );
        assert_eq!(
            resolver.resolve(WellKnownDirectory::Tools),
            Path::new("/agent/_work/_tool")
        );
    }

    #[test]
    fn test_work_directory_override() {
        let resolver = HostDirectoryResolver::new("/agent").with_work_directory("/work");

        assert_eq!(resolver.resolve(WellKnownDirectory::Work), Path::new("/work"));
        assert_eq!(
            resolver.resolve(WellKnownDirectory::Tools),
            Path::new("/work/_tool")
        );
        assert_eq!(
            resolver.resolve(WellKnownDirectory::Diag),
            Path::new("/agent/_diag")
        );
    }
}
