use std::fs;
use tracing::{debug, info, info_span, warn};

use crate::config::SplitConfig;
use crate::engine::error::SplitResult;
use crate::engine::operations::{create_directory, move_file, remove_tree};

use super::plan::SplitPlan;
use super::report::SplitReport;

/// Carry out a plan: create every group directory, then move every file.
///
/// Stops at the first failure. Files moved before it stay moved.
pub fn execute_plan(plan: &SplitPlan, config: &SplitConfig) -> SplitResult<SplitReport> {
    for label in &plan.labels {
        let _span = info_span!("move_label", label = %label.name()).entered();

        for group in label.groups.iter().filter(|group| group.moves) {
            create_directory(&group.directory)?;
        }

        let mut moved = 0usize;
        for action in label.actions() {
            // move_file refuses destinations that appeared after planning
            move_file(&action.source, &action.destination)?;
            debug!("{} <- {:?}", action.split, action.source);
            moved += 1;
        }

        info!(
            "Label {}: {} train, {} test, {} val ({} files moved)",
            label.name(),
            label.counts.train,
            label.counts.test,
            label.counts.val,
            moved
        );
    }

    let mut report = SplitReport::from_plan(plan, config, false);

    if config.remove_source {
        remove_source_root(config)?;
        report.source_removed = true;
    }

    let totals = plan.totals();
    info!(
        "Split complete: {} train, {} test, {} val across {} labels",
        totals.train,
        totals.test,
        totals.val,
        plan.labels.len()
    );
    Ok(report)
}

fn remove_source_root(config: &SplitConfig) -> SplitResult<()> {
    let leftovers = count_leftover_files(config);
    if leftovers > 0 {
        warn!(
            "Removing source root {:?} with {} non-image files still inside",
            config.source, leftovers
        );
    } else {
        info!("Removing emptied source root {:?}", config.source);
    }
    remove_tree(&config.source)?;
    Ok(())
}

fn count_leftover_files(config: &SplitConfig) -> usize {
    let mut count = 0;
    let mut pending = vec![config.source.clone()];
    while let Some(dir) = pending.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            debug!("Could not read {:?} while counting leftovers", dir);
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else {
                count += 1;
            }
        }
    }
    count
}
