//! Split ratio validation and per-label cut point arithmetic.

use serde::Serialize;

use crate::engine::dataset::DatasetSplit;
use crate::engine::error::{SplitError, SplitResult};

pub const DEFAULT_TRAIN_RATIO: f64 = 0.7;
pub const DEFAULT_TEST_RATIO: f64 = 0.2;

/// Validated ratios for a two-way or three-way split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SplitRatios {
    /// `train` goes to train, the rest to test.
    TwoWay { train: f64 },
    /// `train` and `test` are explicit, the rest goes to val.
    ThreeWay { train: f64, test: f64 },
}

/// Number of images each group receives for one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SplitCounts {
    pub train: usize,
    pub test: usize,
    pub val: usize,
}

impl SplitCounts {
    pub fn total(&self) -> usize {
        self.train + self.test + self.val
    }

    pub fn get(&self, split: DatasetSplit) -> usize {
        match split {
            DatasetSplit::Train => self.train,
            DatasetSplit::Val => self.val,
            DatasetSplit::Test => self.test,
        }
    }

    pub fn add(&mut self, other: &SplitCounts) {
        self.train += other.train;
        self.test += other.test;
        self.val += other.val;
    }
}

fn check_positive(name: &str, value: f64) -> SplitResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SplitError::config(format!(
            "{} ratio must be a number greater than 0, got {}",
            name, value
        )));
    }
    Ok(())
}

impl SplitRatios {
    /// Train/test split. `train` must lie in `(0, 1]`.
    pub fn two_way(train: f64) -> SplitResult<Self> {
        check_positive("train", train)?;
        if train > 1.0 {
            return Err(SplitError::config(format!(
                "train ratio must not exceed 1, got {}",
                train
            )));
        }
        Ok(SplitRatios::TwoWay { train })
    }

    /// Train/test/val split. Both ratios must be positive and leave a
    /// positive share for val.
    pub fn three_way(train: f64, test: f64) -> SplitResult<Self> {
        check_positive("train", train)?;
        check_positive("test", test)?;
        if train + test >= 1.0 {
            return Err(SplitError::config(format!(
                "train ratio ({}) + test ratio ({}) must be less than 1 to leave room for val",
                train, test
            )));
        }
        Ok(SplitRatios::ThreeWay { train, test })
    }

    pub fn train_ratio(&self) -> f64 {
        match *self {
            SplitRatios::TwoWay { train } | SplitRatios::ThreeWay { train, .. } => train,
        }
    }

    pub fn test_ratio(&self) -> f64 {
        match *self {
            SplitRatios::TwoWay { train } => 1.0 - train,
            SplitRatios::ThreeWay { test, .. } => test,
        }
    }

    pub fn val_ratio(&self) -> Option<f64> {
        match *self {
            SplitRatios::TwoWay { .. } => None,
            SplitRatios::ThreeWay { train, test } => Some(1.0 - train - test),
        }
    }

    pub fn is_three_way(&self) -> bool {
        matches!(self, SplitRatios::ThreeWay { .. })
    }

    /// Groups in slicing order. The last one absorbs the truncation remainder.
    pub fn groups(&self) -> &'static [DatasetSplit] {
        match self {
            SplitRatios::TwoWay { .. } => &[DatasetSplit::Train, DatasetSplit::Test],
            SplitRatios::ThreeWay { .. } => {
                &[DatasetSplit::Train, DatasetSplit::Test, DatasetSplit::Val]
            }
        }
    }

    /// Cut `n` images into groups by truncating `n * ratio`.
    pub fn partition_counts(&self, n: usize) -> SplitCounts {
        let cut = |ratio: f64| ((n as f64) * ratio).floor() as usize;
        match *self {
            SplitRatios::TwoWay { train } => {
                let train = cut(train).min(n);
                SplitCounts {
                    train,
                    test: n - train,
                    val: 0,
                }
            }
            SplitRatios::ThreeWay { train, test } => {
                let train = cut(train).min(n);
                let test = cut(test).min(n - train);
                SplitCounts {
                    train,
                    test,
                    val: n - train - test,
                }
            }
        }
    }
}
