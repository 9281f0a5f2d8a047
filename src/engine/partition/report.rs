//! Summary of a split, printed to the console and optionally written as a
//! JSON manifest.

use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::SplitConfig;
use crate::engine::dataset::DatasetSplit;
use crate::engine::error::{SplitError, SplitResult};
use crate::engine::ratios::{SplitCounts, SplitRatios};

use super::plan::SplitPlan;

#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    pub split: DatasetSplit,
    pub directory: PathBuf,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelReport {
    pub label: String,
    pub counts: SplitCounts,
    pub groups: Vec<GroupReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SplitReport {
    pub seed: u64,
    pub ratios: SplitRatios,
    pub source: PathBuf,
    pub destination: PathBuf,
    /// True when nothing was moved
    pub dry_run: bool,
    pub source_removed: bool,
    pub totals: SplitCounts,
    pub labels: Vec<LabelReport>,
}

impl SplitReport {
    pub fn from_plan(plan: &SplitPlan, config: &SplitConfig, dry_run: bool) -> Self {
        let labels = plan
            .labels
            .iter()
            .map(|label| LabelReport {
                label: label.name(),
                counts: label.counts,
                groups: label
                    .groups
                    .iter()
                    .map(|group| GroupReport {
                        split: group.split,
                        directory: group.directory.clone(),
                        files: group
                            .files
                            .iter()
                            .map(|f| f.to_string_lossy().into_owned())
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            seed: plan.seed,
            ratios: plan.ratios,
            source: config.source.clone(),
            destination: config.destination.clone(),
            dry_run,
            source_removed: false,
            totals: plan.totals(),
            labels,
        }
    }

    /// Human-readable per-label counts and destinations.
    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.dry_run {
            writeln!(out, "Dry run: no files were moved")?;
        }
        for label in &self.labels {
            writeln!(out, "{}: {} images", label.label, label.counts.total())?;
            for group in &label.groups {
                writeln!(
                    out,
                    "  {:<5} {:>6} -> {}",
                    group.split.as_str(),
                    group.files.len(),
                    group.directory.display()
                )?;
            }
        }
        writeln!(
            out,
            "Total: {} train, {} test, {} val ({} labels)",
            self.totals.train,
            self.totals.test,
            self.totals.val,
            self.labels.len()
        )?;
        if self.source_removed {
            writeln!(out, "Removed source root {}", self.source.display())?;
        }
        writeln!(out, "Seed: {}", self.seed)
    }

    pub fn write_manifest(&self, path: &Path) -> SplitResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SplitError::config(format!("failed to serialize manifest: {}", e)))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SplitError::io(parent, e))?;
        }
        fs::write(path, json).map_err(|e| SplitError::io(path, e))?;
        info!("Manifest written to: {:?}", path);
        Ok(())
    }
}
