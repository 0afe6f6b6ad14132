// Recursive delete implementation
// reason: tokio::fs so cancellation can be observed between entries (ADR-002)
use async_trait::async_trait;
use std::fs::Permissions;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use worktemp_core::port::recursive_delete::{DeleteError, RecursiveDelete};
use worktemp_core::port::CancellationToken;

/// Filesystem recursive delete
///
/// Never follows symbolic links: a link is removed, its target is left alone.
/// Read-only entries are made writable before removal.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsRecursiveDelete;

impl FsRecursiveDelete {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RecursiveDelete for FsRecursiveDelete {
    async fn delete_directory(
        &self,
        path: &Path,
        contents_only: bool,
        cancellation: &CancellationToken,
    ) -> Result<(), DeleteError> {
        check_cancelled(cancellation)?;

        let metadata = match fs::symlink_metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Nothing to delete, directory missing");
                return Ok(());
            }
            Err(e) => return Err(DeleteError::io(path, e)),
        };
        if !metadata.is_dir() {
            return Err(DeleteError::NotADirectory(path.to_path_buf()));
        }

        let mut pending = vec![path.to_path_buf()];
        // Parents are always pushed before their children
        let mut directories: Vec<PathBuf> = Vec::new();
        let mut removed_files = 0usize;

        while let Some(dir) = pending.pop() {
            clear_readonly(&dir).await?;
            let mut entries = fs::read_dir(&dir)
                .await
                .map_err(|e| DeleteError::io(&dir, e))?;

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| DeleteError::io(&dir, e))?
            {
                check_cancelled(cancellation)?;

                let entry_path = entry.path();
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| DeleteError::io(&entry_path, e))?;

                if file_type.is_dir() {
                    pending.push(entry_path.clone());
                    directories.push(entry_path);
                } else {
                    remove_entry(&entry_path, file_type.is_symlink()).await?;
                    removed_files += 1;
                }
            }
        }

        let removed_dirs = directories.len();
        remove_directories(directories, cancellation).await?;

        if !contents_only {
            remove_dir(path).await?;
        }

        debug!(
            path = %path.display(),
            contents_only = contents_only,
            removed_files = removed_files,
            removed_dirs = removed_dirs,
            "Directory deleted"
        );
        Ok(())
    }
}

/// Remove walked directories bottom-up; `directories` lists parents before children
async fn remove_directories(
    directories: Vec<PathBuf>,
    cancellation: &CancellationToken,
) -> Result<(), DeleteError> {
    for dir in directories.into_iter().rev() {
        check_cancelled(cancellation)?;
        remove_dir(&dir).await?;
    }
    Ok(())
}

fn check_cancelled(cancellation: &CancellationToken) -> Result<(), DeleteError> {
    if cancellation.is_cancelled() {
        return Err(DeleteError::Cancelled);
    }
    Ok(())
}

/// Remove a file or link; a link to a directory needs remove_dir on Windows
async fn remove_entry(path: &Path, is_symlink: bool) -> Result<(), DeleteError> {
    if !is_symlink {
        clear_readonly(path).await?;
    }

    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) if is_symlink => fs::remove_dir(path)
            .await
            .map_err(|_| DeleteError::io(path, e)),
        Err(e) => Err(DeleteError::io(path, e)),
    }
}

async fn remove_dir(path: &Path) -> Result<(), DeleteError> {
    match fs::remove_dir(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(DeleteError::io(path, e)),
    }
}

async fn clear_readonly(path: &Path) -> Result<(), DeleteError> {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(DeleteError::io(path, e)),
    };

    if let Some(permissions) = owner_writable(metadata.permissions()) {
        fs::set_permissions(path, permissions)
            .await
            .map_err(|e| DeleteError::io(path, e))?;
    }
    Ok(())
}

/// Permissions with owner write added, or None if already writable
///
/// Group and other bits are left as they were.
#[cfg(unix)]
fn owner_writable(mut permissions: Permissions) -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;

    let mode = permissions.mode();
    if mode & 0o200 != 0 {
        return None;
    }
    permissions.set_mode(mode | 0o200);
    Some(permissions)
}

#[cfg(not(unix))]
fn owner_writable(mut permissions: Permissions) -> Option<Permissions> {
    if !permissions.readonly() {
        return None;
    }
    #[allow(clippy::permissions_set_readonly_false)]
    permissions.set_readonly(false);
    Some(permissions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;
    use tokio_test::{assert_err, assert_ok};
    use worktemp_core::port::cancellation_channel;

    fn populate(root: &Path) {
        stdfs::create_dir_all(root.join("a/b/c")).unwrap();
        stdfs::write(root.join("top.txt"), b"top").unwrap();
        stdfs::write(root.join("a/one.txt"), b"1").unwrap();
        stdfs::write(root.join("a/b/c/deep.bin"), [0u8; 64]).unwrap();
    }

    fn is_empty_dir(path: &Path) -> bool {
        path.is_dir() && stdfs::read_dir(path).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_contents_only_keeps_directory() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("_temp");
        populate(&target);
        let (_source, token) = cancellation_channel();

        assert_ok!(FsRecursiveDelete.delete_directory(&target, true, &token).await);

        assert!(is_empty_dir(&target));
    }

    #[tokio::test]
    async fn test_full_delete_removes_directory() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("_temp");
        populate(&target);
        let (_source, token) = cancellation_channel();

        assert_ok!(FsRecursiveDelete.delete_directory(&target, false, &token).await);

        assert!(!target.exists());
        assert!(root.path().is_dir());
    }

    #[tokio::test]
    async fn test_missing_directory_is_not_an_error() {
        let root = tempfile::tempdir().unwrap();
        let (_source, token) = cancellation_channel();

        assert_ok!(
            FsRecursiveDelete
                .delete_directory(&root.path().join("missing"), true, &token)
                .await
        );
    }

    #[tokio::test]
    async fn test_file_target_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("file.txt");
        stdfs::write(&file, b"x").unwrap();
        let (_source, token) = cancellation_channel();

        let err = assert_err!(FsRecursiveDelete.delete_directory(&file, true, &token).await);

        assert!(matches!(err, DeleteError::NotADirectory(_)));
        assert!(file.exists());
    }

    #[tokio::test]
    async fn test_readonly_file_is_removed() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("_temp");
        stdfs::create_dir_all(&target).unwrap();
        let file = target.join("locked.txt");
        stdfs::write(&file, b"x").unwrap();
        let mut permissions = stdfs::metadata(&file).unwrap().permissions();
        permissions.set_readonly(true);
        stdfs::set_permissions(&file, permissions).unwrap();
        let (_source, token) = cancellation_channel();

        assert_ok!(FsRecursiveDelete.delete_directory(&target, true, &token).await);

        assert!(is_empty_dir(&target));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_target_survives() {
        let root = tempfile::tempdir().unwrap();
        let outside = root.path().join("outside");
        stdfs::create_dir_all(&outside).unwrap();
        stdfs::write(outside.join("keep.txt"), b"keep").unwrap();
        let target = root.path().join("_temp");
        stdfs::create_dir_all(&target).unwrap();
        std::os::unix::fs::symlink(&outside, target.join("link")).unwrap();
        let (_source, token) = cancellation_channel();

        assert_ok!(FsRecursiveDelete.delete_directory(&target, true, &token).await);

        assert!(is_empty_dir(&target));
        assert!(outside.join("keep.txt").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_readonly_root_gains_owner_write_only() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("_temp");
        populate(&target);
        stdfs::set_permissions(&target, stdfs::Permissions::from_mode(0o555)).unwrap();
        let (_source, token) = cancellation_channel();

        assert_ok!(FsRecursiveDelete.delete_directory(&target, true, &token).await);

        let mode = stdfs::metadata(&target).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
        assert_eq!(mode & 0o022, 0);
        assert!(is_empty_dir(&target));
    }

    #[cfg(unix)]
    #[test]
    fn test_owner_writable_keeps_group_and_other_bits() {
        use std::os::unix::fs::PermissionsExt;

        let added = owner_writable(stdfs::Permissions::from_mode(0o440)).unwrap();
        assert_eq!(added.mode() & 0o777, 0o640);
        assert!(owner_writable(stdfs::Permissions::from_mode(0o700)).is_none());
    }

    #[tokio::test]
    async fn test_cancelled_mid_walk_keeps_root() {
        const FILES: usize = 2000;
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("_temp");
        stdfs::create_dir_all(&target).unwrap();
        for file in 0..FILES {
            stdfs::write(target.join(format!("file-{file}.txt")), b"x").unwrap();
        }
        let (source, token) = cancellation_channel();
        let walk_target = target.clone();

        let walk = tokio::spawn(async move {
            FsRecursiveDelete
                .delete_directory(&walk_target, true, &token)
                .await
        });
        // Cancel as soon as the walk has removed its first entry
        while !walk.is_finished() && stdfs::read_dir(&target).unwrap().count() == FILES {
            tokio::task::yield_now().await;
        }
        source.cancel();
        let result = walk.await.unwrap();

        assert!(target.is_dir());
        match result {
            Err(DeleteError::Cancelled) => {
                assert!(stdfs::read_dir(&target).unwrap().next().is_some());
            }
            // The walk outran the cancel
            Ok(()) => assert!(is_empty_dir(&target)),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_cancelled_directory_pass_keeps_directories() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("_temp");
        stdfs::create_dir_all(target.join("a/b")).unwrap();
        let (source, token) = cancellation_channel();
        source.cancel();

        let err = assert_err!(
            remove_directories(vec![target.join("a"), target.join("a/b")], &token).await
        );

        assert!(matches!(err, DeleteError::Cancelled));
        assert!(target.join("a/b").is_dir());
    }

    #[tokio::test]
    async fn test_directory_pass_removes_children_first() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("_temp");
        stdfs::create_dir_all(target.join("a/b/c")).unwrap();
        let (_source, token) = cancellation_channel();

        assert_ok!(
            remove_directories(
                vec![target.join("a"), target.join("a/b"), target.join("a/b/c")],
                &token
            )
            .await
        );

        assert!(is_empty_dir(&target));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("_temp");
        populate(&target);
        let (source, token) = cancellation_channel();
        source.cancel();

        let err = assert_err!(FsRecursiveDelete.delete_directory(&target, true, &token).await);

        assert!(matches!(err, DeleteError::Cancelled));
        assert!(target.join("top.txt").exists());
    }
}
