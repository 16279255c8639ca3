use clap::{Args, Parser, Subcommand};
use configuration::{load_config, ConfigOverrides};
use pipeline::{Stage, StageError};
use std::path::PathBuf;
use std::process::ExitCode;

mod logging;
mod pipeline;
mod summary;

/// The entry point of the monthly store performance report.
#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; secrets may come from the process environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => handle_run(args).await,
        Commands::CheckConfig(args) => handle_check_config(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Builds the monthly store performance report from the point-of-sale database.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract, compute, render and mail the report for one month.
    Run(RunArgs),
    /// Load and validate the configuration, then exit.
    CheckConfig(ConfigArgs),
}

#[derive(Args)]
struct ConfigArgs {
    /// Path to the TOML configuration file.
    #[arg(long, short, default_value = "config.toml")]
    config: PathBuf,
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Report month (1-12), overriding the configured period.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Report year, overriding the configured period.
    #[arg(long)]
    year: Option<i32>,

    /// Directory receiving the artifacts and the log file.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Do not mail the artifacts, whatever the configuration says.
    #[arg(long)]
    no_email: bool,
}

impl RunArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            month: self.month,
            year: self.year,
            output_dir: self.output_dir.clone(),
            disable_mail: self.no_email,
        }
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_run(args: RunArgs) -> ExitCode {
    let config = match load_config(&args.config.config, &args.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", StageError::new(Stage::Config, e));
            return ExitCode::FAILURE;
        }
    };

    let _guard = match logging::init(&config.report.output_dir) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        report = %config.report.name,
        month = config.period.month,
        year = config.period.year,
        "Starting report run."
    );

    match pipeline::run(&config).await {
        Ok(result) => {
            println!("{}", summary::top_stores_table(&result.report, config.report.top_n_stores));
            tracing::info!(
                period = %result.period,
                artifacts = result.artifacts.produced().len(),
                "Report run finished."
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(stage = %e.stage, error = ?e.source, "Report run aborted.");
            ExitCode::FAILURE
        }
    }
}

fn handle_check_config(args: ConfigArgs) -> ExitCode {
    match load_config(&args.config, &ConfigOverrides::default()) {
        Ok(config) => {
            let period = config
                .period
                .report_period()
                .map(|p| format!("{p} ({} to {})", p.start_date(), p.end_date()))
                .unwrap_or_default();
            println!("Configuration OK: '{}' for {period}", config.report.name);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", StageError::new(Stage::Config, e));
            ExitCode::FAILURE
        }
    }
}
