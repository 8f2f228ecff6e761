use crate::cli::output::*;
use crate::core::config::Config;
use crate::core::pipeline::Reconciler;
use crate::report::{Format, ReportGenerator};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ResumeArgs {
    /// Checkpoint file written by an earlier run (any stage)
    #[arg(value_name = "CHECKPOINT")]
    pub checkpoint: PathBuf,

    /// Minimum average similarity, as a whole percentage (default from config: 50)
    #[arg(value_name = "THRESHOLD", value_parser = crate::cli::threshold_parser())]
    pub threshold: Option<u8>,

    /// Report file (default: OG_membership_results_<threshold>.txt next to the checkpoint)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

pub fn run(args: ResumeArgs, config: Config) -> anyhow::Result<()> {
    config.validate()?;
    let threshold = args.threshold.unwrap_or(config.scoring.threshold_percent);

    let spinner = create_spinner(&format!("Resuming from {}...", args.checkpoint.display()));
    let result = Reconciler::new(&config).resume(&args.checkpoint, threshold);
    spinner.finish_and_clear();
    let result = result?;

    print_threshold_result(&result);

    let dir = args
        .checkpoint
        .parent()
        .map(PathBuf::from)
        .unwrap_or_default();
    let report_path = ReportGenerator::new(args.format).write(&result, &dir, args.output.as_deref())?;
    success(&format!("Report written to {}", report_path.display()));

    Ok(())
}
