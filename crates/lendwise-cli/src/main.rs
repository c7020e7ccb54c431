//! lendwise - loan approval predictor CLI
//!
//! Usage:
//!   lendwise predict --income 60000 --loan-amount 15000   # Score one application
//!   lendwise predict --input applicant.json --json        # Score from a file, JSON out
//!   lendwise validate --age 20 --emp-exp 10               # Field checks only
//!   lendwise inspect --model models/gb_model.json -v      # Summarize the artifact

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

use commands::{inspect, predict, validate, ApplicantArgs};
use error::CliError;
use lendwise::LendConfig;

/// lendwise - loan approval predictor
///
/// Validates applicant details and scores them with a gradient-boosted
/// tree model.
#[derive(Parser)]
#[command(name = "lendwise")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Model artifact (.json or .bin); overrides the configured path,
    /// which defaults to models/gb_model.json
    #[arg(long, global = true, value_name = "FILE")]
    model: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Disable the loan/income multiple rule
    #[arg(long, global = true)]
    lenient: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and score one application
    Predict {
        #[command(flatten)]
        applicant: ApplicantArgs,
    },

    /// Check applicant fields without scoring
    Validate {
        #[command(flatten)]
        applicant: ApplicantArgs,
    },

    /// Summarize the model artifact
    Inspect,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<LendConfig, CliError> {
    let mut config = LendConfig::load(cli.config.as_deref())?;
    if let Some(model) = &cli.model {
        config.artifact_path = model.clone();
    }
    if cli.lenient {
        config.validation.strict_loan_ratio = false;
    }
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = load_config(&cli).and_then(|config| match &cli.command {
        Commands::Predict { applicant } => predict::run(&config, applicant, cli.json),
        Commands::Validate { applicant } => validate::run(&config, applicant, cli.json),
        Commands::Inspect => inspect::run(&config, cli.json, cli.verbose),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}
