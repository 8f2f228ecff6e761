/// Checkpoint artifacts for resumable reconciliation runs
use crate::core::crossref::CrossReference;
use crate::core::loader::{AssignmentTable, ToolTables};
use crate::core::overlap::OverlapResult;
use crate::core::scorer::ScoreBuckets;
use crate::core::threshold::PairMeans;
use crate::core::tool::OrthologyTool;
use crate::{ReconcileError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Stage output stored in a checkpoint file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "stage", content = "data", rename_all = "snake_case")]
pub enum Artifact {
    Table(AssignmentTable),
    CrossReference(CrossReference),
    FilteredCrossReference(CrossReference),
    Scores(ScoreBuckets),
    Means(PairMeans),
    Overlap(OverlapResult),
}

/// Borrowed form of [`Artifact`] used when writing, so stage outputs are
/// not cloned just to be saved
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "stage", content = "data", rename_all = "snake_case")]
pub enum ArtifactRef<'a> {
    Table(&'a AssignmentTable),
    CrossReference(&'a CrossReference),
    FilteredCrossReference(&'a CrossReference),
    Scores(&'a ScoreBuckets),
    Means(&'a PairMeans),
    Overlap(&'a OverlapResult),
}

impl ArtifactRef<'_> {
    /// Artifact part of the checkpoint file name
    pub fn file_stem(&self) -> String {
        match self {
            ArtifactRef::Table(table) => table_stem(table.tool),
            ArtifactRef::CrossReference(_) => "crossref".to_string(),
            ArtifactRef::FilteredCrossReference(_) => "crossref_filtered".to_string(),
            ArtifactRef::Scores(_) => "scores".to_string(),
            ArtifactRef::Means(_) => "means".to_string(),
            ArtifactRef::Overlap(_) => "overlap".to_string(),
        }
    }
}

impl Artifact {
    pub fn describe(&self) -> String {
        match self {
            Artifact::Table(table) => format!("{} assignment table", table.tool),
            Artifact::CrossReference(_) => "protein cross-reference".to_string(),
            Artifact::FilteredCrossReference(_) => "filtered protein cross-reference".to_string(),
            Artifact::Scores(_) => "pairwise score buckets".to_string(),
            Artifact::Means(_) => "pairwise average scores".to_string(),
            Artifact::Overlap(_) => "overlap comparisons".to_string(),
        }
    }
}

fn table_stem(tool: OrthologyTool) -> String {
    format!("table.{}", tool.key())
}

/// A checkpoint file: the artifact plus the run it belongs to
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Checkpoint {
    pub run_id: String,
    pub created_at: DateTime<Utc>,
    pub artifact: Artifact,
}

#[derive(Serialize)]
struct CheckpointRef<'a> {
    run_id: &'a str,
    created_at: DateTime<Utc>,
    artifact: ArtifactRef<'a>,
}

impl Checkpoint {
    /// Read any checkpoint file; its stage comes from the file contents
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ReconcileError::MissingCheckpoint(path.to_path_buf()));
        }
        let json = fs::read_to_string(path)?;
        let checkpoint: Checkpoint = serde_json::from_str(&json).map_err(|e| {
            ReconcileError::InvalidCheckpoint(format!("{}: {}", path.display(), e))
        })?;
        debug!(
            "Read {} checkpoint for run '{}' from {}",
            checkpoint.artifact.describe(),
            checkpoint.run_id,
            path.display()
        );
        Ok(checkpoint)
    }
}

/// Where one run's checkpoints live. Every artifact is written to
/// `<dir>/<run_id>.<artifact>.json` and overwritten by later runs with the
/// same id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointStore {
    dir: PathBuf,
    run_id: String,
}

impl CheckpointStore {
    pub fn new(dir: impl Into<PathBuf>, run_id: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            run_id: run_id.into(),
        }
    }

    /// Store of the run that wrote `checkpoint`, rooted at the file's directory
    pub fn for_checkpoint(path: &Path, checkpoint: &Checkpoint) -> Self {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(dir, checkpoint.run_id.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn path_for(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{}.{}.json", self.run_id, stem))
    }

    pub fn table_path(&self, tool: OrthologyTool) -> PathBuf {
        self.path_for(&table_stem(tool))
    }

    pub fn save(&self, artifact: ArtifactRef<'_>) -> Result<PathBuf> {
        let path = self.path_for(&artifact.file_stem());
        self.save_to(&path, artifact)?;
        Ok(path)
    }

    /// Write an artifact of this run to an explicit path
    pub fn save_to(&self, path: &Path, artifact: ArtifactRef<'_>) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let checkpoint = CheckpointRef {
            run_id: &self.run_id,
            created_at: Utc::now(),
            artifact,
        };
        let json = serde_json::to_string_pretty(&checkpoint)?;
        fs::write(path, json)?;
        info!("Checkpoint written: {}", path.display());
        Ok(())
    }

    pub fn load(&self, stem: &str) -> Result<Checkpoint> {
        Checkpoint::read(self.path_for(stem))
    }

    /// Load the four per-tool tables this run saved after loading its inputs
    pub fn load_tables(&self) -> Result<ToolTables> {
        let mut tables = Vec::with_capacity(OrthologyTool::ALL.len());
        for tool in OrthologyTool::ALL {
            let path = self.table_path(tool);
            match Checkpoint::read(&path)?.artifact {
                Artifact::Table(table) if table.tool == tool => tables.push(table),
                other => {
                    return Err(ReconcileError::InvalidCheckpoint(format!(
                        "{}: expected the {} assignment table, found {}",
                        path.display(),
                        tool,
                        other.describe()
                    )))
                }
            }
        }
        ToolTables::new(tables)
    }
}
