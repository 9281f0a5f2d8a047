use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::formatter::BracketedFormatter;
use crate::engine::error::{SplitError, SplitResult};

/// Default filter directive for a verbosity level, before `RUST_LOG`.
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    }
}

fn build_filter(verbose: u8, quiet: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)))
}

/// Install the global subscriber: bracketed output on stderr, plus a
/// timestamped log file when `log_dir` is given.
///
/// Returns the log file path if one was created.
pub fn setup_logging(verbose: u8, quiet: bool, log_dir: Option<&Path>) -> SplitResult<Option<PathBuf>> {
    let stderr_layer = fmt::layer()
        .event_format(BracketedFormatter { with_location: false })
        .with_writer(std::io::stderr);

    let (file_layer, log_path) = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|e| SplitError::io(dir, e))?;

            let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
            let log_path = dir.join(format!("dataset_splitter_{}.log", timestamp));

            let file = fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&log_path)
                .map_err(|e| SplitError::io(&log_path, e))?;

            let layer = fmt::layer()
                .event_format(BracketedFormatter { with_location: true })
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false);
            (Some(layer), Some(log_path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(build_filter(verbose, quiet))
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| SplitError::config(format!("failed to install logger: {}", e)))?;

    if let Some(path) = &log_path {
        info!("Log file created at: {:?}", path);
    }
    Ok(log_path)
}
