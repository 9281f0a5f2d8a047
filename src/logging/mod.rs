//! Logging for the dataset splitter
//!
//! This module provides:
//! - Custom log formatting with bracketed output
//! - Console logging on stderr, so stdout carries only the split summary
//! - An optional timestamped log file

mod formatter;
mod setup;

pub use setup::setup_logging;
