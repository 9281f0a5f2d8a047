pub mod dataset;
pub mod error;
pub mod operations;
pub mod partition;
pub mod ratios;
