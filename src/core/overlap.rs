//! Per-protein overlap between tools' groups
//!
//! Where membership scoring averages every comparison, overlap mode keeps
//! only the individual group comparisons that reach a threshold and
//! reports which proteins and groups they involve.

use crate::core::crossref::{CrossReference, UNASSIGNED};
use crate::core::loader::ToolTables;
use crate::core::scorer::PairwiseScorer;
use crate::core::similarity::SimilarityMetric;
use crate::core::threshold::percent_to_fraction;
use crate::core::tool::{OrthologyTool, ToolPair, TOOL_COUNT};
use crate::Result;
use csv::WriterBuilder;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_OVERLAP_THRESHOLD_PERCENT: u8 = 80;

/// One group comparison that met the overlap threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairComparison {
    pub pair: ToolPair,
    pub first_group: String,
    pub second_group: String,
    pub score: f64,
}

/// Group ids of both tools that took part in a qualifying comparison,
/// one entry per comparison
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PairGroups {
    pub first: Vec<String>,
    pub second: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapResult {
    pub threshold_percent: u8,
    /// Proteins with at least one qualifying comparison, in cross-reference order
    pub proteins: IndexMap<String, Vec<PairComparison>>,
    pub pair_groups: IndexMap<ToolPair, PairGroups>,
}

impl OverlapResult {
    pub fn new(threshold_percent: u8) -> Self {
        Self {
            threshold_percent,
            proteins: IndexMap::new(),
            pair_groups: ToolPair::all()
                .into_iter()
                .map(|p| (p, PairGroups::default()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.proteins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proteins.is_empty()
    }

    fn record(&mut self, protein: &str, comparison: PairComparison) {
        let groups = self.pair_groups.entry(comparison.pair).or_default();
        groups.first.push(comparison.first_group.clone());
        groups.second.push(comparison.second_group.clone());
        self.proteins
            .entry(protein.to_string())
            .or_default()
            .push(comparison);
    }

    /// The group of each tool that took part in a qualifying comparison for
    /// the protein; tools that did not are left unassigned
    pub fn participating_groups(&self, protein: &str) -> [Option<&str>; TOOL_COUNT] {
        let mut slots: [Option<&str>; TOOL_COUNT] = [None; TOOL_COUNT];
        if let Some(comparisons) = self.proteins.get(protein) {
            for c in comparisons {
                slots[c.pair.first().slot()] = Some(c.first_group.as_str());
                slots[c.pair.second().slot()] = Some(c.second_group.as_str());
            }
        }
        slots
    }

    /// Distinct qualifying groups of the pair's first tool
    pub fn distinct_first_groups(&self, pair: ToolPair) -> usize {
        self.pair_groups
            .get(&pair)
            .map(|g| g.first.iter().collect::<IndexSet<_>>().len())
            .unwrap_or(0)
    }

    /// `(pair, distinct first-tool groups)` for all six pairs in canonical order
    pub fn summary_counts(&self) -> Vec<(ToolPair, usize)> {
        ToolPair::all()
            .into_iter()
            .map(|pair| (pair, self.distinct_first_groups(pair)))
            .collect()
    }

    /// Rows of the query table: protein followed by one column per tool
    pub fn query_rows(&self) -> Vec<Vec<String>> {
        self.proteins
            .keys()
            .map(|protein| {
                let mut row = Vec::with_capacity(TOOL_COUNT + 1);
                row.push(protein.clone());
                row.extend(
                    self.participating_groups(protein)
                        .iter()
                        .map(|g| g.unwrap_or(UNASSIGNED).to_string()),
                );
                row
            })
            .collect()
    }

    /// The query table without the protein column, duplicate rows removed
    pub fn non_query_rows(&self) -> Vec<Vec<String>> {
        let unique: IndexSet<Vec<String>> = self
            .query_rows()
            .into_iter()
            .map(|mut row| row.split_off(1))
            .collect();
        unique.into_iter().collect()
    }

    /// Every retained protein the tool assigned, with its full assignment
    pub fn tool_rows(&self, tables: &ToolTables, tool: OrthologyTool) -> Vec<(String, String)> {
        let table = tables.get(tool);
        self.proteins
            .keys()
            .filter_map(|protein| {
                table
                    .group_of(protein)
                    .map(|group| (protein.clone(), group.to_string()))
            })
            .collect()
    }
}

/// Score every assigned pair of every protein and keep the comparisons at
/// or above `threshold_percent`
pub fn find_overlaps(
    xref: &CrossReference,
    tables: &ToolTables,
    metric: SimilarityMetric,
    threshold_percent: u8,
) -> Result<OverlapResult> {
    let cutoff = percent_to_fraction(threshold_percent);
    let scorer = PairwiseScorer::new(tables, metric);
    let mut result = OverlapResult::new(threshold_percent);

    for (protein, record) in xref.iter() {
        for (pair, first_group, second_group) in record.assigned_pairs() {
            let score = scorer.score(pair, first_group, second_group)?;
            if score >= cutoff {
                result.record(
                    protein,
                    PairComparison {
                        pair,
                        first_group: first_group.to_string(),
                        second_group: second_group.to_string(),
                        score,
                    },
                );
            } else {
                debug!("{} {}: {} below cutoff {}", protein, pair, score, cutoff);
            }
        }
    }

    info!(
        "{} of {} proteins have a group comparison at or above {}%",
        result.len(),
        xref.len(),
        threshold_percent
    );
    Ok(result)
}

/// Output file names derived from a base path and threshold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapOutputs {
    base: PathBuf,
    threshold_percent: u8,
}

impl OverlapOutputs {
    pub fn new(base: impl Into<PathBuf>, threshold_percent: u8) -> Self {
        Self {
            base: base.into(),
            threshold_percent,
        }
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut name: OsString = self.base.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }

    pub fn comparisons_path(&self) -> PathBuf {
        self.with_suffix(&format!("_comparisons_{}.json", self.threshold_percent))
    }

    pub fn query_path(&self) -> PathBuf {
        self.with_suffix(&format!("_Query{}.txt", self.threshold_percent))
    }

    pub fn non_query_path(&self) -> PathBuf {
        self.with_suffix(&format!("_nonQuery{}.txt", self.threshold_percent))
    }

    pub fn tool_path(&self, tool: OrthologyTool) -> PathBuf {
        self.with_suffix(&format!("_{}_OGs_overlap{}.txt", tool.name(), self.threshold_percent))
    }

    pub fn summary_path(&self) -> PathBuf {
        self.with_suffix(&format!("__SUMMARY_{}.txt", self.threshold_percent))
    }

    /// Write the query, non-query and per-tool tables. Returns the paths written.
    pub fn write_tables(&self, result: &OverlapResult, tables: &ToolTables) -> Result<Vec<PathBuf>> {
        if let Some(parent) = self.base.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut written = Vec::with_capacity(TOOL_COUNT + 2);
        let mut header = vec!["Query".to_string()];
        header.extend(OrthologyTool::ALL.iter().map(|t| t.group_column()));

        let path = self.query_path();
        write_tsv(&path, &header, result.query_rows())?;
        written.push(path);

        let path = self.non_query_path();
        write_tsv(&path, &header[1..], result.non_query_rows())?;
        written.push(path);

        for tool in OrthologyTool::ALL {
            let path = self.tool_path(tool);
            let rows = result
                .tool_rows(tables, tool)
                .into_iter()
                .map(|(protein, group)| vec![protein, group]);
            write_tsv(&path, &["Query".to_string(), tool.group_column()], rows)?;
            written.push(path);
        }

        Ok(written)
    }
}

fn write_tsv<I>(path: &Path, header: &[String], rows: I) -> Result<()>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = WriterBuilder::new().delimiter(b'\t').from_path(path)?;
    writer.write_record(header)?;
    let mut count = 0usize;
    for row in rows {
        writer.write_record(&row)?;
        count += 1;
    }
    writer.flush()?;
    debug!("Wrote {} rows to {}", count, path.display());
    Ok(())
}
