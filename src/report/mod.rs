use crate::core::threshold::ThresholdResult;
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::fs;
use std::path::{Path, PathBuf};

pub mod json;
pub mod text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Text => "txt",
            Format::Json => "json",
        }
    }
}

/// Default membership report name, e.g. `OG_membership_results_50.txt`
pub fn report_file_name(threshold_percent: u8, format: Format) -> String {
    format!(
        "OG_membership_results_{}.{}",
        threshold_percent,
        format.extension()
    )
}

pub struct ReportGenerator {
    format: Format,
}

impl ReportGenerator {
    pub fn new(format: Format) -> Self {
        Self { format }
    }

    pub fn generate(&self, result: &ThresholdResult) -> Result<String> {
        match self.format {
            Format::Text => text::generate_membership_report(result),
            Format::Json => json::generate_json_report(result),
        }
    }

    /// Render and write the report to `output`, or to the default file name
    /// inside `dir`. Returns the written path.
    pub fn write(&self, result: &ThresholdResult, dir: &Path, output: Option<&Path>) -> Result<PathBuf> {
        let path = match output {
            Some(path) => path.to_path_buf(),
            None => dir.join(report_file_name(result.threshold_percent, self.format)),
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        let content = self.generate(result)?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        Ok(path)
    }
}
