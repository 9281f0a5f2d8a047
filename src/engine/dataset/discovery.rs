//! Label and image discovery under a dataset root.
//!
//! A dataset root looks like:
//!
//! ```text
//! root/
//!   cat/
//!     img_001.jpg
//!     img_002.PNG
//!   dog/
//!     ...
//! ```
//!
//! Every immediate subdirectory is a label. Only regular files whose names
//! end with a recognized extension count as images.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, trace};

use crate::engine::error::{SplitError, SplitResult};

/// Extensions recognized when none are configured.
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] =
    &[".jpeg", ".jpg", ".png", ".bmp", ".gif", ".tiff", ".tif"];

/// Normalized set of lowercase, dot-prefixed extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageExtensions {
    suffixes: Vec<String>,
}

impl Default for ImageExtensions {
    fn default() -> Self {
        Self {
            suffixes: DEFAULT_IMAGE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ImageExtensions {
    /// Build from user input. `"jpg"`, `".jpg"` and `"JPG"` are all the same.
    pub fn new<I, S>(extensions: I) -> SplitResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut suffixes = Vec::new();
        for ext in extensions {
            let trimmed = ext.as_ref().trim().trim_start_matches('.');
            if trimmed.is_empty() {
                return Err(SplitError::config("empty image extension"));
            }
            let suffix = format!(".{}", trimmed.to_lowercase());
            if !suffixes.contains(&suffix) {
                suffixes.push(suffix);
            }
        }
        if suffixes.is_empty() {
            return Err(SplitError::config("at least one image extension is required"));
        }
        Ok(Self { suffixes })
    }

    /// Case-insensitive suffix test on a file name.
    pub fn matches(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.suffixes.iter().any(|suffix| lower.ends_with(suffix.as_str()))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.suffixes
    }
}

fn read_dir_checked(dir: &Path) -> SplitResult<fs::ReadDir> {
    match fs::read_dir(dir) {
        Ok(entries) => Ok(entries),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(SplitError::NotFound(dir.to_path_buf())),
        Err(e) => Err(SplitError::io(dir, e)),
    }
}

/// Sorted names of the immediate subdirectories of `root`.
pub fn discover_labels(root: &Path) -> SplitResult<Vec<OsString>> {
    if !root.is_dir() {
        return Err(SplitError::NotFound(root.to_path_buf()));
    }

    let mut labels = Vec::new();
    for entry in read_dir_checked(root)? {
        let entry = entry.map_err(|e| SplitError::io(root, e))?;
        let path = entry.path();
        if path.is_dir() {
            labels.push(entry.file_name());
        } else {
            trace!("Skipping non-directory entry {:?}", path);
        }
    }
    labels.sort();

    debug!("Found {} labels in {:?}", labels.len(), root);
    Ok(labels)
}

/// Sorted names of the image files directly inside `label_dir`.
///
/// Sorting keeps a seeded shuffle independent of directory read order.
pub fn list_images(label_dir: &Path, extensions: &ImageExtensions) -> SplitResult<Vec<OsString>> {
    let mut images = Vec::new();
    let mut skipped = 0usize;

    for entry in read_dir_checked(label_dir)? {
        let entry = entry.map_err(|e| SplitError::io(label_dir, e))?;
        let name = entry.file_name();
        if entry.path().is_file() && extensions.matches(&name.to_string_lossy()) {
            images.push(name);
        } else {
            skipped += 1;
        }
    }
    images.sort();

    debug!(
        "Found {} images in {:?} ({} other entries ignored)",
        images.len(),
        label_dir,
        skipped
    );
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn names(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_default_extensions_match_case_insensitively() {
        let exts = ImageExtensions::default();
        assert!(exts.matches("photo.JPG"));
        assert!(exts.matches("photo.jpeg"));
        assert!(exts.matches("scan.Tiff"));
        assert!(exts.matches("a.b.png"));
        assert!(!exts.matches("notes.txt"));
        assert!(!exts.matches("archive.jpg.zip"));
        assert!(!exts.matches("png"));
    }

    #[test]
    fn test_custom_extensions_are_normalized() {
        let exts = ImageExtensions::new(["WEBP", ".jpg", "jpg"]).unwrap();
        assert_eq!(exts.as_slice(), &[".webp".to_string(), ".jpg".to_string()]);
        assert!(exts.matches("x.WebP"));
        assert!(!exts.matches("x.png"));
    }

    #[test]
    fn test_empty_extensions_rejected() {
        assert!(matches!(
            ImageExtensions::new(Vec::<String>::new()),
            Err(SplitError::Configuration(_))
        ));
        assert!(matches!(
            ImageExtensions::new(["."]),
            Err(SplitError::Configuration(_))
        ));
    }

    #[test]
    fn test_discover_labels_sorted_dirs_only() {
        let dir = tempdir().unwrap();
        for label in ["zebra", "cat", "dog"] {
            fs::create_dir(dir.path().join(label)).unwrap();
        }
        fs::write(dir.path().join("README.md"), b"readme").unwrap();

        let labels = discover_labels(dir.path()).unwrap();

        assert_eq!(labels, names(&["cat", "dog", "zebra"]));
    }

    #[test]
    fn test_discover_labels_missing_root() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(
            discover_labels(&missing),
            Err(SplitError::NotFound(p)) if p == missing
        ));
    }

    #[test]
    fn test_list_images_filters_and_sorts() {
        let dir = tempdir().unwrap();
        for name in ["b.jpg", "a.PNG", "c.txt", "d.gif"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.jpg")).unwrap();

        let images = list_images(dir.path(), &ImageExtensions::default()).unwrap();

        assert_eq!(images, names(&["a.PNG", "b.jpg", "d.gif"]));
    }
}
