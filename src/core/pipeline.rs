//! Stage orchestration with checkpointing and resume

use crate::core::checkpoint::{Artifact, ArtifactRef, Checkpoint, CheckpointStore};
use crate::core::config::{Config, ToolSchemas};
use crate::core::crossref::CrossReference;
use crate::core::loader::ToolTables;
use crate::core::overlap::{find_overlaps, OverlapResult};
use crate::core::scorer::{PairwiseScorer, ScoreBuckets};
use crate::core::similarity::SimilarityMetric;
use crate::core::threshold::{PairMeans, ThresholdResult};
use crate::core::tool::TOOL_COUNT;
use crate::{ReconcileError, Result};
use std::path::Path;
use tracing::info;

/// Stage a run restarts from, as read from a checkpoint envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loaded,
    CrossReferenced,
    Filtered,
    Scored,
    Averaged,
}

impl Stage {
    fn of(artifact: &Artifact) -> Option<Self> {
        match artifact {
            Artifact::Table(_) => Some(Stage::Loaded),
            Artifact::CrossReference(_) => Some(Stage::CrossReferenced),
            Artifact::FilteredCrossReference(_) => Some(Stage::Filtered),
            Artifact::Scores(_) => Some(Stage::Scored),
            Artifact::Means(_) => Some(Stage::Averaged),
            Artifact::Overlap(_) => None,
        }
    }
}

/// Result of an overlap run together with what is needed to write it out
#[derive(Debug)]
pub struct OverlapRun {
    pub result: OverlapResult,
    pub tables: ToolTables,
    pub store: CheckpointStore,
}

/// Runs the reconciliation stages in order, saving each stage's output
/// when checkpointing is enabled.
#[derive(Debug, Clone)]
pub struct Reconciler {
    schemas: ToolSchemas,
    metric: SimilarityMetric,
    store: CheckpointStore,
    persist: bool,
}

impl Reconciler {
    pub fn new(config: &Config) -> Self {
        Self {
            schemas: config.tools.clone(),
            metric: config.scoring.similarity,
            store: CheckpointStore::new(
                config.checkpoint.work_dir.clone(),
                config.checkpoint.run_id.clone(),
            ),
            persist: config.checkpoint.enabled,
        }
    }

    pub fn with_store(mut self, store: CheckpointStore) -> Self {
        self.store = store;
        self
    }

    pub fn with_metric(mut self, metric: SimilarityMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn store(&self) -> &CheckpointStore {
        &self.store
    }

    fn save(&self, artifact: ArtifactRef<'_>) -> Result<()> {
        if self.persist {
            self.store.save(artifact)?;
        }
        Ok(())
    }

    /// Full run from the four parsed tables, given in slot order
    pub fn run<P: AsRef<Path>>(&self, paths: &[P; TOOL_COUNT], threshold_percent: u8) -> Result<ThresholdResult> {
        let tables = ToolTables::load(paths, &self.schemas)?;
        for table in tables.iter() {
            self.save(ArtifactRef::Table(table))?;
        }
        self.from_tables(&tables, threshold_percent)
    }

    pub fn from_tables(&self, tables: &ToolTables, threshold_percent: u8) -> Result<ThresholdResult> {
        let xref = CrossReference::build(tables);
        self.save(ArtifactRef::CrossReference(&xref))?;
        self.from_crossref(tables, &xref, threshold_percent)
    }

    pub fn from_crossref(
        &self,
        tables: &ToolTables,
        xref: &CrossReference,
        threshold_percent: u8,
    ) -> Result<ThresholdResult> {
        let filtered = xref.filter_comparable();
        self.save(ArtifactRef::FilteredCrossReference(&filtered))?;
        self.from_filtered(tables, &filtered, threshold_percent)
    }

    pub fn from_filtered(
        &self,
        tables: &ToolTables,
        filtered: &CrossReference,
        threshold_percent: u8,
    ) -> Result<ThresholdResult> {
        let buckets = PairwiseScorer::new(tables, self.metric).score_all(filtered)?;
        self.save(ArtifactRef::Scores(&buckets))?;
        self.from_scores(&buckets, threshold_percent)
    }

    pub fn from_scores(&self, buckets: &ScoreBuckets, threshold_percent: u8) -> Result<ThresholdResult> {
        let means = PairMeans::from_buckets(buckets);
        self.save(ArtifactRef::Means(&means))?;
        Ok(means.apply_threshold(threshold_percent))
    }

    /// Continue a run from any stage checkpoint. The checkpoint's directory
    /// and run id locate the per-tool tables and receive new artifacts.
    pub fn resume(&self, checkpoint_path: &Path, threshold_percent: u8) -> Result<ThresholdResult> {
        let checkpoint = Checkpoint::read(checkpoint_path)?;
        let stage = Stage::of(&checkpoint.artifact).ok_or_else(|| {
            ReconcileError::InvalidCheckpoint(format!(
                "{}: {} cannot be resumed",
                checkpoint_path.display(),
                checkpoint.artifact.describe()
            ))
        })?;
        let run = self
            .clone()
            .with_store(CheckpointStore::for_checkpoint(checkpoint_path, &checkpoint));
        info!(
            "Resuming run '{}' after stage {:?} from {}",
            checkpoint.run_id,
            stage,
            checkpoint_path.display()
        );

        match checkpoint.artifact {
            Artifact::Table(_) => {
                let tables = run.store.load_tables()?;
                run.from_tables(&tables, threshold_percent)
            }
            Artifact::CrossReference(xref) => {
                let tables = run.store.load_tables()?;
                run.from_crossref(&tables, &xref, threshold_percent)
            }
            Artifact::FilteredCrossReference(filtered) => {
                let tables = run.store.load_tables()?;
                run.from_filtered(&tables, &filtered, threshold_percent)
            }
            Artifact::Scores(buckets) => run.from_scores(&buckets, threshold_percent),
            Artifact::Means(means) => Ok(means.apply_threshold(threshold_percent)),
            Artifact::Overlap(_) => Err(ReconcileError::Invariant(
                "overlap artifact passed stage detection".to_string(),
            )),
        }
    }

    /// Overlap mode over a full or filtered cross-reference checkpoint
    pub fn overlap(&self, checkpoint_path: &Path, threshold_percent: u8) -> Result<OverlapRun> {
        let checkpoint = Checkpoint::read(checkpoint_path)?;
        let store = CheckpointStore::for_checkpoint(checkpoint_path, &checkpoint);
        let xref = match checkpoint.artifact {
            Artifact::CrossReference(xref) | Artifact::FilteredCrossReference(xref) => xref,
            other => {
                return Err(ReconcileError::InvalidCheckpoint(format!(
                    "{}: overlap needs a cross-reference, found {}",
                    checkpoint_path.display(),
                    other.describe()
                )))
            }
        };
        let tables = store.load_tables()?;
        let result = find_overlaps(&xref, &tables, self.metric, threshold_percent)?;
        Ok(OverlapRun { result, tables, store })
    }
}
