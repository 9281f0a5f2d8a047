use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};

mod cli;
mod config;
mod engine;
mod logging;

use cli::{build_config, Cli};
use config::Settings;
use engine::error::{SplitError, SplitResult};
use engine::partition::{plan_split, split_dataset, SplitReport};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::setup_logging(cli.verbose, cli.quiet, cli.log_dir.as_deref()) {
        eprintln!("error: {}", e);
        return e.exit_code();
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            e.exit_code()
        }
    }
}

fn run(cli: &Cli) -> SplitResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let config = build_config(cli, &settings)?;

    info!(
        "Splitting {:?} into {:?} (train {:.3}, test {:.3}, val {}), extensions: {}",
        config.source,
        config.destination,
        config.ratios.train_ratio(),
        config.ratios.test_ratio(),
        config
            .ratios
            .val_ratio()
            .map(|v| format!("{:.3}", v))
            .unwrap_or_else(|| "-".to_string()),
        config.extensions.as_slice().join(" ")
    );

    let report = if cli.dry_run {
        let plan = plan_split(&config)?;
        SplitReport::from_plan(&plan, &config, true)
    } else {
        split_dataset(&config)?
    };

    if let Some(path) = &cli.manifest {
        report.write_manifest(path)?;
    }

    let stdout = std::io::stdout();
    report
        .write_summary(&mut stdout.lock())
        .map_err(|e| SplitError::io("<stdout>", e))?;
    Ok(())
}
