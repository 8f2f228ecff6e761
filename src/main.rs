use clap::Parser;
use colored::*;
use og_reconcile::cli::{resolve_config, Cli, Commands};
use og_reconcile::ReconcileError;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);

        let exit_code = match e.downcast_ref::<ReconcileError>() {
            Some(ReconcileError::Config(_)) => 2,
            Some(ReconcileError::Io(_)) => 3,
            Some(ReconcileError::Parse(_)) | Some(ReconcileError::Csv(_)) => 4,
            Some(ReconcileError::MissingCheckpoint(_))
            | Some(ReconcileError::InvalidCheckpoint(_))
            | Some(ReconcileError::Serialization(_)) => 5,
            Some(_) => 1,
            None if e.downcast_ref::<std::io::Error>().is_some() => 3,
            None => 1,
        };
        process::exit(exit_code);
    }
}

/// RUST_LOG wins, then OG_RECONCILE_LOG, then the -v count
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let fallback = if verbose > 0 {
        level.to_string()
    } else {
        std::env::var("OG_RECONCILE_LOG").unwrap_or_else(|_| level.to_string())
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Membership(args) => og_reconcile::cli::commands::membership::run(args, config),
        Commands::Resume(args) => og_reconcile::cli::commands::resume::run(args, config),
        Commands::Overlap(args) => og_reconcile::cli::commands::overlap::run(args, config),
        Commands::Config(args) => og_reconcile::cli::commands::config::run(args, config),
    }
}
