pub mod commands;
pub mod output;

use crate::core::config::{load_config, Config};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "og-reconcile",
    version,
    about = "Compare orthologous group assignments across clustering programs",
    long_about = "og-reconcile cross-references the orthologous groups that Broccoli, OrthoFinder, \
                  ProteinOrtho and SonicParanoid assign to the same proteins, scores how similar \
                  the groups of every pair of programs are, and reports the pairs that agree \
                  above a threshold."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE", global = true, env = "OG_RECONCILE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score OG membership agreement between every pair of tools
    Membership(commands::membership::MembershipArgs),

    /// Continue a membership run from a checkpoint file
    Resume(commands::resume::ResumeArgs),

    /// List per-protein group comparisons that meet a threshold
    Overlap(commands::overlap::OverlapArgs),

    /// Show or write the default configuration
    Config(commands::config::ConfigArgs),
}

/// Parse a threshold percentage in `0..=100`
pub fn threshold_parser() -> clap::builder::RangedI64ValueParser<u8> {
    clap::value_parser!(u8).range(0..=100)
}

/// Configuration from `--config`, or the defaults when none was given
pub fn resolve_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_threshold_range_enforced() {
        let parsed = Cli::try_parse_from(["og-reconcile", "resume", "run.means.json", "100"]);
        assert!(parsed.is_ok());

        let parsed = Cli::try_parse_from(["og-reconcile", "resume", "run.means.json", "101"]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from(["og-reconcile", "resume", "run.means.json", "-5"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["og-reconcile", "config", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
