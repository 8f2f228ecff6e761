use crate::cli::output::*;
use crate::core::config::Config;
use crate::core::pipeline::Reconciler;
use crate::core::similarity::SimilarityMetric;
use crate::report::{Format, ReportGenerator};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct MembershipArgs {
    /// Parsed Broccoli table
    #[arg(value_name = "BROCCOLI")]
    pub broccoli: PathBuf,

    /// Parsed OrthoFinder table
    #[arg(value_name = "ORTHOFINDER")]
    pub orthofinder: PathBuf,

    /// Parsed ProteinOrtho table
    #[arg(value_name = "PROTEINORTHO")]
    pub proteinortho: PathBuf,

    /// Parsed SonicParanoid table
    #[arg(value_name = "SONICPARANOID")]
    pub sonicparanoid: PathBuf,

    /// Minimum average similarity, as a whole percentage (default from config: 50)
    #[arg(value_name = "THRESHOLD", value_parser = crate::cli::threshold_parser())]
    pub threshold: Option<u8>,

    /// Directory for checkpoints and the report
    #[arg(short = 'w', long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Name prefix of this run's checkpoint files
    #[arg(long, value_name = "ID")]
    pub run_id: Option<String>,

    /// Report file (default: OG_membership_results_<threshold>.txt in the work dir)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Group similarity measure
    #[arg(short, long, value_enum)]
    pub similarity: Option<SimilarityMetric>,

    /// Do not write stage checkpoints
    #[arg(long)]
    pub no_checkpoint: bool,
}

impl MembershipArgs {
    /// Apply command-line overrides on top of the loaded config
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(dir) = &self.work_dir {
            config.checkpoint.work_dir = dir.clone();
        }
        if let Some(run_id) = &self.run_id {
            config.checkpoint.run_id = run_id.clone();
        }
        if let Some(metric) = self.similarity {
            config.scoring.similarity = metric;
        }
        if self.no_checkpoint {
            config.checkpoint.enabled = false;
        }
    }
}

pub fn run(args: MembershipArgs, mut config: Config) -> anyhow::Result<()> {
    args.apply_to(&mut config);
    config.validate()?;
    let threshold = args.threshold.unwrap_or(config.scoring.threshold_percent);

    let reconciler = Reconciler::new(&config);
    let paths = [
        args.broccoli.clone(),
        args.orthofinder.clone(),
        args.proteinortho.clone(),
        args.sonicparanoid.clone(),
    ];

    let spinner = create_spinner("Scoring OG membership across tools...");
    let result = reconciler.run(&paths, threshold);
    spinner.finish_and_clear();
    let result = result?;

    print_threshold_result(&result);

    let report_path = ReportGenerator::new(args.format).write(
        &result,
        &config.checkpoint.work_dir,
        args.output.as_deref(),
    )?;
    success(&format!("Report written to {}", report_path.display()));

    if config.checkpoint.enabled {
        info(&format!(
            "Checkpoints: {}/{}.*.json",
            reconciler.store().dir().display(),
            reconciler.store().run_id()
        ));
    }

    Ok(())
}
