//! Command line surface and its resolution into a [`SplitConfig`].

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Settings, SplitConfig};
use crate::engine::dataset::ImageExtensions;
use crate::engine::error::{SplitError, SplitResult};
use crate::engine::ratios::{SplitRatios, DEFAULT_TEST_RATIO, DEFAULT_TRAIN_RATIO};

/// Split a directory of labeled images into train/test(/val) sets.
#[derive(Debug, Parser)]
#[command(name = "dataset-splitter")]
#[command(about = "Split a labeled image dataset into train, test and val directories", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON config file (defaults to config.json in the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Seed for the shuffle, for reproducible splits
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Print the split that would be made without moving anything
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Write the split report as JSON to this file
    #[arg(long, global = true)]
    pub manifest: Option<PathBuf>,

    /// Image extension to include (repeatable, replaces the default set)
    #[arg(long = "extension", global = true)]
    pub extensions: Vec<String>,

    /// Also write logs to a timestamped file in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Split each label into train and test
    TwoWay {
        #[command(flatten)]
        paths: PathArgs,

        /// Share of each label that goes to train (default 0.7)
        #[arg(long, aliases = ["split-ratio", "split_ratio", "train_ratio"])]
        train_ratio: Option<f64>,

        /// Leave train images in the dataset and move only test images to
        /// `<destination>/<label>/`
        #[arg(long)]
        train_in_place: bool,
    },

    /// Split each label into train, test and val
    ThreeWay {
        #[command(flatten)]
        paths: PathArgs,

        /// Share of each label that goes to train (default 0.7)
        #[arg(long)]
        train_ratio: Option<f64>,

        /// Share of each label that goes to test (default 0.2); val gets the rest
        #[arg(long)]
        test_ratio: Option<f64>,

        /// Delete the dataset root after every label has been split
        #[arg(long)]
        remove_source: bool,
    },
}

#[derive(Debug, Args)]
pub struct PathArgs {
    /// Dataset root whose subdirectories are labels
    #[arg(long, alias = "dataset_path")]
    pub dataset_path: Option<PathBuf>,

    /// Destination root for the split
    #[arg(long, aliases = ["test-path", "test_path"])]
    pub destination: Option<PathBuf>,
}

/// Merge command line values over config file values over defaults.
pub fn build_config(cli: &Cli, settings: &Settings) -> SplitResult<SplitConfig> {
    let (paths, ratios, train_in_place, remove_source) = match &cli.command {
        Commands::TwoWay {
            paths,
            train_ratio,
            train_in_place,
        } => {
            let train = train_ratio.or(settings.train_ratio).unwrap_or(DEFAULT_TRAIN_RATIO);
            (paths, SplitRatios::two_way(train)?, *train_in_place, false)
        }
        Commands::ThreeWay {
            paths,
            train_ratio,
            test_ratio,
            remove_source,
        } => {
            let train = train_ratio.or(settings.train_ratio).unwrap_or(DEFAULT_TRAIN_RATIO);
            let test = test_ratio.or(settings.test_ratio).unwrap_or(DEFAULT_TEST_RATIO);
            (paths, SplitRatios::three_way(train, test)?, false, *remove_source)
        }
    };

    let source = paths
        .dataset_path
        .clone()
        .or_else(|| settings.dataset_path.clone())
        .ok_or_else(|| SplitError::config("no dataset path given (use --dataset-path or the config file)"))?;
    let destination = paths
        .destination
        .clone()
        .or_else(|| settings.destination_path.clone())
        .ok_or_else(|| SplitError::config("no destination given (use --destination or the config file)"))?;

    let extensions = if !cli.extensions.is_empty() {
        ImageExtensions::new(&cli.extensions)?
    } else if let Some(list) = &settings.extensions {
        ImageExtensions::new(list)?
    } else {
        ImageExtensions::default()
    };

    let mut config = SplitConfig::new(source, destination, ratios);
    config.extensions = extensions;
    if let Some(seed) = cli.seed.or(settings.seed) {
        config = config.with_seed(seed);
    }
    config.train_in_place = train_in_place;
    config.remove_source = remove_source;
    Ok(config)
}
