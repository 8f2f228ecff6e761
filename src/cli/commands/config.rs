use crate::cli::output::*;
use crate::core::config::{save_config, Config};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Write the configuration to this file instead of printing it
    #[arg(long, value_name = "FILE")]
    pub init: Option<PathBuf>,
}

/// Print the effective configuration, or save it with `--init`
pub fn run(args: ConfigArgs, config: Config) -> anyhow::Result<()> {
    match args.init {
        Some(path) => {
            save_config(&path, &config)?;
            success(&format!("Configuration written to {}", path.display()));
        }
        None => print!("{}", toml::to_string_pretty(&config)?),
    }
    Ok(())
}
