use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::{debug, info, info_span, warn};

use crate::config::SplitConfig;
use crate::engine::dataset::{discover_labels, list_images, DatasetSplit};
use crate::engine::error::{SplitError, SplitResult};
use crate::engine::operations::path_occupied;
use crate::engine::ratios::{SplitCounts, SplitRatios};

/// A single file move in a split plan
#[derive(Debug, Clone, PartialEq)]
pub struct MoveAction {
    pub split: DatasetSplit,
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Files of one label assigned to one group
#[derive(Debug, Clone)]
pub struct GroupPlan {
    pub split: DatasetSplit,
    /// Directory the files end up in
    pub directory: PathBuf,
    pub files: Vec<OsString>,
    /// False when the files stay in the source tree
    pub moves: bool,
}

/// Shuffled and sliced images of one label
#[derive(Debug, Clone)]
pub struct LabelPlan {
    pub label: OsString,
    pub source_dir: PathBuf,
    pub counts: SplitCounts,
    pub groups: Vec<GroupPlan>,
}

impl LabelPlan {
    pub fn name(&self) -> String {
        self.label.to_string_lossy().into_owned()
    }

    /// Every move needed for this label, in group order.
    pub fn actions(&self) -> impl Iterator<Item = MoveAction> + '_ {
        self.groups
            .iter()
            .filter(|group| group.moves)
            .flat_map(move |group| {
                group.files.iter().map(move |file| MoveAction {
                    split: group.split,
                    source: self.source_dir.join(file),
                    destination: group.directory.join(file),
                })
            })
    }
}

/// The complete assignment of every image, computed before anything moves.
#[derive(Debug, Clone)]
pub struct SplitPlan {
    /// Seed the shuffle was drawn with
    pub seed: u64,
    pub ratios: SplitRatios,
    pub labels: Vec<LabelPlan>,
}

impl SplitPlan {
    pub fn totals(&self) -> SplitCounts {
        let mut totals = SplitCounts::default();
        for label in &self.labels {
            totals.add(&label.counts);
        }
        totals
    }

    pub fn move_count(&self) -> usize {
        self.labels.iter().map(|label| label.actions().count()).sum()
    }
}

/// Seed used for the run: the configured one, or a fresh one from entropy.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| rand::thread_rng().gen())
}

/// Validate `config`, then shuffle and slice every label without touching
/// the filesystem.
///
/// Fails with `SplitError::Collision` if any planned destination file
/// already exists.
pub fn plan_split(config: &SplitConfig) -> SplitResult<SplitPlan> {
    config.validate()?;

    let seed = resolve_seed(config.seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    info!("Planning split of {:?} with seed {}", config.source, seed);

    let labels = discover_labels(&config.source)?;
    if labels.is_empty() {
        warn!("No label directories found in {:?}", config.source);
    }

    let mut plans = Vec::with_capacity(labels.len());
    for label in labels {
        let _span = info_span!("plan_label", label = %label.to_string_lossy()).entered();
        plans.push(plan_label(config, label, &mut rng)?);
    }

    let plan = SplitPlan {
        seed,
        ratios: config.ratios,
        labels: plans,
    };
    check_collisions(&plan)?;

    info!(
        "Planned {} labels, {} files to move",
        plan.labels.len(),
        plan.move_count()
    );
    Ok(plan)
}

fn plan_label(config: &SplitConfig, label: OsString, rng: &mut ChaCha8Rng) -> SplitResult<LabelPlan> {
    let source_dir = config.source.join(&label);
    let mut images = list_images(&source_dir, &config.extensions)?;
    if images.is_empty() {
        warn!("Label {:?} has no images", label);
    }

    images.shuffle(rng);
    let counts = config.ratios.partition_counts(images.len());

    let mut remaining = images.into_iter();
    let groups = config
        .ratios
        .groups()
        .iter()
        .map(|&split| GroupPlan {
            split,
            directory: config.group_dir(split, &label),
            files: remaining.by_ref().take(counts.get(split)).collect(),
            moves: !config.stays_in_place(split),
        })
        .collect();

    debug!(
        "Label {:?}: {} train, {} test, {} val",
        label, counts.train, counts.test, counts.val
    );

    Ok(LabelPlan {
        label,
        source_dir,
        counts,
        groups,
    })
}

fn check_collisions(plan: &SplitPlan) -> SplitResult<()> {
    for label in &plan.labels {
        if let Some(action) = label.actions().find(|action| path_occupied(&action.destination)) {
            return Err(SplitError::Collision(action.destination));
        }
    }
    Ok(())
}
