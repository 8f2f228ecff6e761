use crate::cli::output::*;
use crate::core::checkpoint::ArtifactRef;
use crate::core::config::Config;
use crate::core::overlap::OverlapOutputs;
use crate::core::pipeline::Reconciler;
use crate::report::text::generate_overlap_summary;
use anyhow::Context;
use clap::Args;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct OverlapArgs {
    /// Cross-reference checkpoint (full or filtered) from a membership run
    #[arg(value_name = "CHECKPOINT")]
    pub checkpoint: PathBuf,

    /// Path prefix for every output file
    #[arg(value_name = "OUTPUT_BASE")]
    pub output_base: PathBuf,

    /// Minimum similarity of a single group comparison, as a whole percentage (default from config: 80)
    #[arg(value_name = "THRESHOLD", value_parser = crate::cli::threshold_parser())]
    pub threshold: Option<u8>,
}

pub fn run(args: OverlapArgs, config: Config) -> anyhow::Result<()> {
    config.validate()?;
    let threshold = args
        .threshold
        .unwrap_or(config.scoring.overlap_threshold_percent);

    let spinner = create_spinner("Comparing groups protein by protein...");
    let run = Reconciler::new(&config).overlap(&args.checkpoint, threshold);
    spinner.finish_and_clear();
    let run = run?;

    let outputs = OverlapOutputs::new(&args.output_base, threshold);
    let mut written = outputs.write_tables(&run.result, &run.tables)?;

    let comparisons = outputs.comparisons_path();
    run.store
        .save_to(&comparisons, ArtifactRef::Overlap(&run.result))?;
    written.insert(0, comparisons);

    let summary_path = outputs.summary_path();
    let summary = generate_overlap_summary(&run.result)?;
    fs::write(&summary_path, summary)
        .with_context(|| format!("Failed to write summary to {}", summary_path.display()))?;
    written.push(summary_path);

    section_header("OG Overlap");
    let counts = run.result.summary_counts();
    for (i, (pair, count)) in counts.iter().enumerate() {
        tree_item(i == counts.len() - 1, &pair.label(), Some(&count.to_string()));
    }
    if run.result.is_empty() {
        warning(&format!("No group comparison reached {}%", threshold));
    } else {
        info(&format!(
            "{} proteins have at least one comparison at or above {}%",
            run.result.len(),
            threshold
        ));
    }
    for path in &written {
        success(&format!("Wrote {}", path.display()));
    }

    Ok(())
}
