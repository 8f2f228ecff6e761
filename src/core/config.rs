//! Configuration types for og-reconcile

use crate::core::overlap::DEFAULT_OVERLAP_THRESHOLD_PERCENT;
use crate::core::similarity::SimilarityMetric;
use crate::core::threshold::DEFAULT_THRESHOLD_PERCENT;
use crate::core::tool::OrthologyTool;
use crate::ReconcileError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolSchemas,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub checkpoint: CheckpointConfig,
}

/// Named columns to read from one tool's parsed OG table.
///
/// Columns not named here (such as the species column some parsers emit)
/// are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableSchema {
    pub query_column: String,
    pub group_column: String,
}

impl TableSchema {
    pub fn for_tool(tool: OrthologyTool) -> Self {
        Self {
            query_column: default_query_column(),
            group_column: tool.group_column(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolSchemas {
    #[serde(default = "default_broccoli_schema")]
    pub broccoli: TableSchema,
    #[serde(default = "default_orthofinder_schema")]
    pub orthofinder: TableSchema,
    #[serde(default = "default_proteinortho_schema")]
    pub proteinortho: TableSchema,
    #[serde(default = "default_sonicparanoid_schema")]
    pub sonicparanoid: TableSchema,
}

impl ToolSchemas {
    pub fn get(&self, tool: OrthologyTool) -> &TableSchema {
        match tool {
            OrthologyTool::Broccoli => &self.broccoli,
            OrthologyTool::OrthoFinder => &self.orthofinder,
            OrthologyTool::ProteinOrtho => &self.proteinortho,
            OrthologyTool::SonicParanoid => &self.sonicparanoid,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringConfig {
    /// Minimum average similarity, as an integer percentage
    #[serde(default = "default_threshold_percent")]
    pub threshold_percent: u8,
    /// Minimum per-comparison similarity used by overlap mode
    #[serde(default = "default_overlap_threshold_percent")]
    pub overlap_threshold_percent: u8,
    #[serde(default)]
    pub similarity: SimilarityMetric,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckpointConfig {
    #[serde(default = "default_checkpoint_enabled")]
    pub enabled: bool,
    /// Directory holding checkpoint artifacts and the results file
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
    /// Prefix for every artifact written by a run
    #[serde(default = "default_run_id")]
    pub run_id: String,
}

// Default value functions
fn default_query_column() -> String { "Query".to_string() }
fn default_broccoli_schema() -> TableSchema { TableSchema::for_tool(OrthologyTool::Broccoli) }
fn default_orthofinder_schema() -> TableSchema { TableSchema::for_tool(OrthologyTool::OrthoFinder) }
fn default_proteinortho_schema() -> TableSchema { TableSchema::for_tool(OrthologyTool::ProteinOrtho) }
fn default_sonicparanoid_schema() -> TableSchema { TableSchema::for_tool(OrthologyTool::SonicParanoid) }
fn default_threshold_percent() -> u8 { DEFAULT_THRESHOLD_PERCENT }
fn default_overlap_threshold_percent() -> u8 { DEFAULT_OVERLAP_THRESHOLD_PERCENT }
fn default_checkpoint_enabled() -> bool { true }
fn default_work_dir() -> PathBuf { PathBuf::from(".") }
fn default_run_id() -> String { "og_membership".to_string() }

impl Default for ToolSchemas {
    fn default() -> Self {
        Self {
            broccoli: default_broccoli_schema(),
            orthofinder: default_orthofinder_schema(),
            proteinortho: default_proteinortho_schema(),
            sonicparanoid: default_sonicparanoid_schema(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            threshold_percent: default_threshold_percent(),
            overlap_threshold_percent: default_overlap_threshold_percent(),
            similarity: SimilarityMetric::default(),
        }
    }
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            enabled: default_checkpoint_enabled(),
            work_dir: default_work_dir(),
            run_id: default_run_id(),
        }
    }
}

impl Config {
    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ReconcileError> {
        for (name, value) in [
            ("scoring.threshold_percent", self.scoring.threshold_percent),
            ("scoring.overlap_threshold_percent", self.scoring.overlap_threshold_percent),
        ] {
            if value > 100 {
                return Err(ReconcileError::Config(format!(
                    "{} must be between 0 and 100, got {}",
                    name, value
                )));
            }
        }
        if self.checkpoint.run_id.trim().is_empty() {
            return Err(ReconcileError::Config("checkpoint.run_id must not be empty".to_string()));
        }
        for tool in OrthologyTool::ALL {
            let schema = self.tools.get(tool);
            if schema.query_column == schema.group_column {
                return Err(ReconcileError::Config(format!(
                    "{} schema uses '{}' for both the query and the group column",
                    tool, schema.query_column
                )));
            }
        }
        Ok(())
    }
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ReconcileError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| ReconcileError::Config(format!("Failed to parse config: {}", e)))?;
    config.validate()?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), ReconcileError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| ReconcileError::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}
