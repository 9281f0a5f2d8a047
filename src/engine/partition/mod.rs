//! Directory partitioner: shuffle each label's images, slice them by ratio
//! and move them into `destination/<group>/<label>/`.
//!
//! Planning never touches the filesystem, so every validation error
//! surfaces before the first file moves.

mod execute;
mod plan;
mod report;

pub use execute::execute_plan;
pub use plan::plan_split;
pub use report::SplitReport;

use tracing::info;

use crate::config::SplitConfig;
use crate::engine::error::SplitResult;

/// Plan and execute a split in one go.
pub fn split_dataset(config: &SplitConfig) -> SplitResult<SplitReport> {
    let plan = plan_split(config)?;
    info!("Executing split plan with {} moves", plan.move_count());
    execute_plan(&plan, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::dataset::ImageExtensions;
    use crate::engine::error::SplitError;
    use crate::engine::ratios::SplitRatios;
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn make_images(dir: &Path, count: usize, ext: &str) {
        fs::create_dir_all(dir).unwrap();
        for i in 0..count {
            fs::write(dir.join(format!("img_{:03}.{}", i, ext)), format!("{}", i)).unwrap();
        }
    }

    fn files_in(dir: &Path) -> BTreeSet<String> {
        match fs::read_dir(dir) {
            Ok(entries) => entries
                .flatten()
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => BTreeSet::new(),
        }
    }

    fn snapshot(root: &Path) -> BTreeSet<PathBuf> {
        let mut seen = BTreeSet::new();
        let mut pending = vec![root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir).unwrap().flatten() {
                let path = entry.path();
                if path.is_dir() {
                    pending.push(path.clone());
                }
                seen.insert(path);
            }
        }
        seen
    }

    #[test]
    fn test_two_way_cat_example() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("raw");
        let out = dir.path().join("out");
        make_images(&source.join("cat"), 10, "jpg");

        let config = SplitConfig::new(&source, &out, SplitRatios::two_way(0.7).unwrap()).with_seed(11);
        let report = split_dataset(&config).unwrap();

        assert_eq!(files_in(&out.join("train").join("cat")).len(), 7);
        assert_eq!(files_in(&out.join("test").join("cat")).len(), 3);
        assert!(files_in(&source.join("cat")).is_empty());
        assert!(source.exists(), "source kept unless removal is requested");
        assert!(!report.source_removed);
        assert!(!report.dry_run);
    }

    #[test]
    fn test_three_way_dog_example_with_removal() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("raw");
        let out = dir.path().join("out");
        make_images(&source.join("dog"), 10, "png");

        let mut config = SplitConfig::new(&source, &out, SplitRatios::three_way(0.6, 0.3).unwrap());
        config.remove_source = true;
        let report = split_dataset(&config).unwrap();

        assert_eq!(files_in(&out.join("train").join("dog")).len(), 6);
        assert_eq!(files_in(&out.join("test").join("dog")).len(), 3);
        assert_eq!(files_in(&out.join("val").join("dog")).len(), 1);
        assert!(report.source_removed);
        assert!(!source.exists());
    }

    #[test]
    fn test_no_image_lost_or_duplicated() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("raw");
        let out = dir.path().join("out");
        make_images(&source.join("cat"), 17, "jpg");
        make_images(&source.join("dog"), 9, "JPEG");
        make_images(&source.join("eel"), 1, "gif");

        let before: BTreeSet<(String, String)> = ["cat", "dog", "eel"]
            .iter()
            .flat_map(|label| {
                files_in(&source.join(label))
                    .into_iter()
                    .map(move |f| (label.to_string(), f))
            })
            .collect();

        let config = SplitConfig::new(&source, &out, SplitRatios::three_way(0.5, 0.25).unwrap());
        split_dataset(&config).unwrap();

        let mut after = Vec::new();
        for group in ["train", "test", "val"] {
            for label in ["cat", "dog", "eel"] {
                for f in files_in(&out.join(group).join(label)) {
                    after.push((label.to_string(), f));
                }
            }
        }
        let after_set: BTreeSet<(String, String)> = after.iter().cloned().collect();

        assert_eq!(after.len(), before.len());
        assert_eq!(after_set, before);
    }

    #[test]
    fn test_non_images_stay_behind() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("raw");
        let out = dir.path().join("out");
        make_images(&source.join("cat"), 4, "bmp");
        fs::write(source.join("cat").join("labels.csv"), b"a,b").unwrap();
        fs::write(source.join("cat").join(".DS_Store"), b"").unwrap();

        let config = SplitConfig::new(&source, &out, SplitRatios::two_way(0.5).unwrap());
        split_dataset(&config).unwrap();

        let left = files_in(&source.join("cat"));
        let expected: BTreeSet<String> = ["labels.csv", ".DS_Store"].iter().map(|s| s.to_string()).collect();
        assert_eq!(left, expected);
        assert!(!out.join("train").join("cat").join("labels.csv").exists());
    }

    #[test]
    fn test_custom_extensions() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("raw");
        let out = dir.path().join("out");
        make_images(&source.join("cat"), 4, "webp");
        make_images(&source.join("cat"), 2, "jpg");

        let mut config = SplitConfig::new(&source, &out, SplitRatios::two_way(0.5).unwrap());
        config.extensions = ImageExtensions::new(["webp"]).unwrap();
        let report = split_dataset(&config).unwrap();

        assert_eq!(report.totals.total(), 4);
        assert_eq!(files_in(&source.join("cat")).len(), 2);
    }

    #[test]
    fn test_train_in_place_matches_original_layout() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("raw");
        let test_root = dir.path().join("test_set");
        make_images(&source.join("cat"), 10, "jpg");

        let mut config = SplitConfig::new(&source, &test_root, SplitRatios::two_way(0.7).unwrap());
        config.train_in_place = true;
        split_dataset(&config).unwrap();

        assert_eq!(files_in(&source.join("cat")).len(), 7);
        assert_eq!(files_in(&test_root.join("cat")).len(), 3);
        assert!(!test_root.join("train").exists());
    }

    #[test]
    fn test_missing_source_is_not_found() {
        let dir = tempdir().unwrap();
        let config = SplitConfig::new(
            dir.path().join("missing"),
            dir.path().join("out"),
            SplitRatios::two_way(0.7).unwrap(),
        );
        assert!(matches!(split_dataset(&config), Err(SplitError::NotFound(_))));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_collision_leaves_tree_untouched() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("raw");
        let out = dir.path().join("out");
        make_images(&source.join("cat"), 3, "jpg");
        make_images(&source.join("dog"), 3, "jpg");
        // every dog image already exists in both groups
        make_images(&out.join("train").join("dog"), 3, "jpg");
        make_images(&out.join("test").join("dog"), 3, "jpg");

        let before_source = snapshot(&source);
        let before_out = snapshot(&out);

        let config = SplitConfig::new(&source, &out, SplitRatios::two_way(0.5).unwrap());
        let err = split_dataset(&config).unwrap_err();

        assert!(matches!(err, SplitError::Collision(_)));
        assert_eq!(snapshot(&source), before_source);
        assert_eq!(snapshot(&out), before_out);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = |seed: u64| {
            let dir = tempdir().unwrap();
            let source = dir.path().join("raw");
            let out = dir.path().join("out");
            make_images(&source.join("cat"), 20, "png");
            let config = SplitConfig::new(&source, &out, SplitRatios::two_way(0.6).unwrap()).with_seed(seed);
            split_dataset(&config).unwrap();
            files_in(&out.join("train").join("cat"))
        };

        assert_eq!(run(5), run(5));
    }
}
