use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, warn};

/// Result type for file operations
pub type FileOpResult<T> = Result<T, FileOpError>;

/// Error types for file operations
#[derive(Debug, Error)]
pub enum FileOpError {
    #[error("source file missing: {}", .0.display())]
    SourceMissing(PathBuf),
    #[error("destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),
    #[error("copy failed for {}: {source}", path.display())]
    CopyFailed { path: PathBuf, source: io::Error },
    #[error("remove failed for {}: {source}", path.display())]
    RemoveFailed { path: PathBuf, source: io::Error },
    #[error("could not create directory {}: {source}", path.display())]
    CreateDirFailed { path: PathBuf, source: io::Error },
}

/// Create a directory and any missing parents. Existing directories are fine.
pub fn create_directory(path: &Path) -> FileOpResult<()> {
    fs::create_dir_all(path).map_err(|source| {
        error!("Failed to create directory {:?}: {}", path, source);
        FileOpError::CreateDirFailed {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Returns true if anything (file, directory or dangling symlink) sits at `path`.
pub fn path_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Move a file from source to destination without ever replacing an
/// existing destination.
///
/// Tries a rename first and falls back to copy + remove when the rename
/// fails, which covers destinations on another drive.
///
/// # Returns
/// * `Ok(())` if the file now lives at `dest` and no longer at `src`
/// * `Err(FileOpError::DestinationExists)` if `dest` was already taken
pub fn move_file(src: &Path, dest: &Path) -> FileOpResult<()> {
    debug!("Moving file from {:?} to {:?}", src, dest);

    if !path_occupied(src) {
        return Err(FileOpError::SourceMissing(src.to_path_buf()));
    }
    if path_occupied(dest) {
        warn!("Refusing to overwrite {:?}", dest);
        return Err(FileOpError::DestinationExists(dest.to_path_buf()));
    }

    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(e) => {
            debug!("Rename failed ({}), falling back to copy + remove", e);
            copy_then_remove(src, dest)
        }
    }
}

fn copy_then_remove(src: &Path, dest: &Path) -> FileOpResult<()> {
    if let Err(source) = fs::copy(src, dest) {
        error!("Failed to copy file from {:?} to {:?}: {}", src, dest, source);
        // fs::copy may leave a truncated destination behind
        let _ = fs::remove_file(dest);
        return Err(FileOpError::CopyFailed {
            path: src.to_path_buf(),
            source,
        });
    }

    if let Err(source) = fs::remove_file(src) {
        error!("Failed to remove original file {:?} after copy: {}", src, source);
        let _ = fs::remove_file(dest);
        return Err(FileOpError::RemoveFailed {
            path: src.to_path_buf(),
            source,
        });
    }

    Ok(())
}

/// Recursively delete a directory tree.
pub fn remove_tree(path: &Path) -> FileOpResult<()> {
    fs::remove_dir_all(path).map_err(|source| {
        error!("Failed to remove directory tree {:?}: {}", path, source);
        FileOpError::RemoveFailed {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_move_file_relocates_contents() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("a.jpg");
        let dest = dir.path().join("b.jpg");
        fs::write(&src, b"pixels").unwrap();

        move_file(&src, &dest).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"pixels");
    }

    #[test]
    fn test_move_file_refuses_existing_destination() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("a.jpg");
        let dest = dir.path().join("b.jpg");
        fs::write(&src, b"new").unwrap();
        fs::write(&dest, b"old").unwrap();

        let err = move_file(&src, &dest).unwrap_err();

        assert!(matches!(err, FileOpError::DestinationExists(_)));
        assert_eq!(fs::read(&src).unwrap(), b"new");
        assert_eq!(fs::read(&dest).unwrap(), b"old");
    }

    #[test]
    fn test_move_file_missing_source() {
        let dir = tempdir().unwrap();
        let err = move_file(&dir.path().join("nope.png"), &dir.path().join("x.png")).unwrap_err();
        assert!(matches!(err, FileOpError::SourceMissing(_)));
    }

    #[test]
    fn test_create_directory_is_idempotent() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("train").join("cat");

        create_directory(&nested).unwrap();
        create_directory(&nested).unwrap();

        assert!(nested.is_dir());
    }

    #[test]
    fn test_remove_tree() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("raw");
        fs::create_dir_all(root.join("cat")).unwrap();
        fs::write(root.join("cat").join("notes.txt"), b"x").unwrap();

        remove_tree(&root).unwrap();

        assert!(!root.exists());
    }
}
