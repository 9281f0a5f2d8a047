use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::engine::dataset::{DatasetSplit, ImageExtensions};
use crate::engine::error::{SplitError, SplitResult};
use crate::engine::ratios::SplitRatios;

/// Everything one split run needs, passed explicitly to the partitioner.
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Dataset root whose subdirectories are labels
    pub source: PathBuf,
    /// Root under which the group directories are created
    pub destination: PathBuf,
    pub ratios: SplitRatios,
    pub extensions: ImageExtensions,
    /// Shuffle seed. `None` draws one from entropy.
    pub seed: Option<u64>,
    /// Two-way only: leave train images in the source tree and move test
    /// images to `destination/<label>/`.
    pub train_in_place: bool,
    /// Delete the source root once every label has been moved.
    pub remove_source: bool,
}

impl SplitConfig {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>, ratios: SplitRatios) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            ratios,
            extensions: ImageExtensions::default(),
            seed: None,
            train_in_place: false,
            remove_source: false,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check option combinations that would make the run unsafe or ambiguous.
    ///
    /// Runs before any filesystem mutation.
    pub fn validate(&self) -> SplitResult<()> {
        if self.train_in_place && self.ratios.is_three_way() {
            return Err(SplitError::config(
                "keeping train images in place is only supported for two-way splits",
            ));
        }
        if self.train_in_place && self.remove_source {
            return Err(SplitError::config(
                "cannot remove the source root while train images are kept in it",
            ));
        }
        if !self.source.is_dir() {
            return Err(SplitError::NotFound(self.source.clone()));
        }

        let source = resolve_path(&self.source);
        let destination = resolve_path(&self.destination);
        if destination.starts_with(&source) {
            return Err(SplitError::config(format!(
                "destination {} must not be inside the source root {}",
                self.destination.display(),
                self.source.display()
            )));
        }
        let written = self.written_roots();
        if let Some(group_root) = written.iter().find(|root| source.starts_with(resolve_path(root))) {
            return Err(SplitError::config(format!(
                "source root {} must not be inside {}, which this split writes to",
                self.source.display(),
                group_root.display()
            )));
        }
        Ok(())
    }

    /// Roots under which this run creates label directories.
    fn written_roots(&self) -> Vec<PathBuf> {
        if self.train_in_place {
            return vec![self.destination.clone()];
        }
        self.ratios
            .groups()
            .iter()
            .map(|split| self.destination.join(split.as_str()))
            .collect()
    }

    /// Directory holding the `split` images of `label` after the run.
    pub fn group_dir(&self, split: DatasetSplit, label: &OsStr) -> PathBuf {
        match (self.train_in_place, split) {
            (true, DatasetSplit::Train) => self.source.join(label),
            (true, _) => self.destination.join(label),
            (false, _) => self.destination.join(split.as_str()).join(label),
        }
    }

    /// Whether files of `split` stay where they are.
    pub fn stays_in_place(&self, split: DatasetSplit) -> bool {
        self.train_in_place && split == DatasetSplit::Train
    }
}

/// Absolute, symlink-free form of `path`, even if its tail does not exist yet.
fn resolve_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut existing = absolute.as_path();
    let mut tail = Vec::new();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            let mut resolved = canonical;
            for part in tail.iter().rev() {
                resolved.push(part);
            }
            return normalize(&resolved);
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name.to_os_string());
                existing = parent;
            }
            _ => return normalize(&absolute),
        }
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
