//! All-vs-all OG membership scoring

use crate::core::crossref::CrossReference;
use crate::core::loader::ToolTables;
use crate::core::similarity::SimilarityMetric;
use crate::core::tool::{OrthologyTool, ToolPair};
use crate::{ReconcileError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Similarity ratios collected per tool pair.
///
/// A group pair is scored once for every protein the two groups share, so
/// groups that are clustered the same way by both tools weigh more in the
/// pair's average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBuckets {
    buckets: IndexMap<ToolPair, Vec<f64>>,
}

impl Default for ScoreBuckets {
    fn default() -> Self {
        Self {
            buckets: ToolPair::all().into_iter().map(|p| (p, Vec::new())).collect(),
        }
    }
}

impl ScoreBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pair: ToolPair, ratio: f64) {
        self.buckets.entry(pair).or_default().push(ratio);
    }

    pub fn get(&self, pair: ToolPair) -> &[f64] {
        self.buckets.get(&pair).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Buckets in canonical pair order, including empty ones
    pub fn iter(&self) -> impl Iterator<Item = (ToolPair, &[f64])> {
        ToolPair::all().into_iter().map(move |pair| (pair, self.get(pair)))
    }

    pub fn total_comparisons(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

/// Scores one tool's group against another's by membership list
pub struct PairwiseScorer<'a> {
    tables: &'a ToolTables,
    metric: SimilarityMetric,
}

impl<'a> PairwiseScorer<'a> {
    pub fn new(tables: &'a ToolTables, metric: SimilarityMetric) -> Self {
        Self { tables, metric }
    }

    /// Member list of a group the cross-reference says exists
    pub fn members(&self, tool: OrthologyTool, group: &str) -> Result<&'a [String]> {
        self.tables.get(tool).members(group).ok_or_else(|| {
            ReconcileError::Invariant(format!(
                "{} group '{}' is referenced but missing from the {} table",
                tool, group, tool
            ))
        })
    }

    /// Groups are given in pair order; the member lists are compared in the
    /// order of [`ToolPair::operands`]
    pub fn score(&self, pair: ToolPair, first_group: &str, second_group: &str) -> Result<f64> {
        let first = self.members(pair.first(), first_group)?;
        let second = self.members(pair.second(), second_group)?;
        let (left, _) = pair.operands();
        let (a, b) = if left == pair.first() {
            (first, second)
        } else {
            (second, first)
        };
        Ok(self.metric.score(a, b))
    }

    /// One ratio per (protein, tool pair) where both tools assigned the protein
    pub fn score_all(&self, xref: &CrossReference) -> Result<ScoreBuckets> {
        let mut buckets = ScoreBuckets::new();
        for (protein, record) in xref.iter() {
            for (pair, first_group, second_group) in record.assigned_pairs() {
                let ratio = self.score(pair, first_group, second_group)?;
                debug!("{} {}: {} vs {} = {}", protein, pair, first_group, second_group, ratio);
                buckets.push(pair, ratio);
            }
        }
        info!(
            "Scored {} group comparisons for {} proteins",
            buckets.total_comparisons(),
            xref.len()
        );
        Ok(buckets)
    }
}
