//! Per-protein cross-reference of the group each tool assigned

use crate::core::loader::ToolTables;
use crate::core::tool::{OrthologyTool, ToolPair, TOOL_COUNT};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Placeholder for a tool that never assigned the protein
pub const UNASSIGNED: &str = "-";

/// Minimum number of assigning tools for a protein to be scored
pub const MIN_ASSIGNED: usize = 2;

/// The group (if any) each tool put one protein in, indexed by tool slot.
///
/// Serialized as a four-element list using `"-"` for unassigned slots.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "Vec<String>", try_from = "Vec<String>")]
pub struct CrossRefRecord {
    slots: [Option<String>; TOOL_COUNT],
}

impl CrossRefRecord {
    pub fn new(slots: [Option<String>; TOOL_COUNT]) -> Self {
        Self { slots }
    }

    pub fn group(&self, tool: OrthologyTool) -> Option<&str> {
        self.slots[tool.slot()].as_deref()
    }

    pub fn set(&mut self, tool: OrthologyTool, group: impl Into<String>) {
        self.slots[tool.slot()] = Some(group.into());
    }

    pub fn assigned_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// True when the protein takes part in at least one pairwise comparison
    pub fn is_comparable(&self) -> bool {
        self.assigned_count() >= MIN_ASSIGNED
    }

    /// Every tool pair where both tools assigned the protein, with the two
    /// group ids in pair order
    pub fn assigned_pairs(&self) -> impl Iterator<Item = (ToolPair, &str, &str)> + '_ {
        ToolPair::all().into_iter().filter_map(move |pair| {
            let first = self.group(pair.first())?;
            let second = self.group(pair.second())?;
            Some((pair, first, second))
        })
    }
}

impl From<CrossRefRecord> for Vec<String> {
    fn from(record: CrossRefRecord) -> Self {
        record
            .slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| UNASSIGNED.to_string()))
            .collect()
    }
}

impl TryFrom<Vec<String>> for CrossRefRecord {
    type Error = String;

    fn try_from(values: Vec<String>) -> Result<Self, Self::Error> {
        if values.len() != TOOL_COUNT {
            return Err(format!(
                "cross-reference record needs {} slots, got {}",
                TOOL_COUNT,
                values.len()
            ));
        }
        let mut record = CrossRefRecord::default();
        for (value, tool) in values.into_iter().zip(OrthologyTool::ALL) {
            if value != UNASSIGNED && !value.is_empty() {
                record.set(tool, value);
            }
        }
        Ok(record)
    }
}

/// Protein id -> cross-reference record, in first-seen order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrossReference {
    records: IndexMap<String, CrossRefRecord>,
}

impl CrossReference {
    /// Union of all proteins across the tables. Proteins are ordered by
    /// first appearance scanning the tools in slot order.
    pub fn build(tables: &ToolTables) -> Self {
        let mut records: IndexMap<String, CrossRefRecord> = IndexMap::new();
        for table in tables.iter() {
            for (protein, group) in &table.assignments {
                records
                    .entry(protein.clone())
                    .or_default()
                    .set(table.tool, group.clone());
            }
        }
        info!("Cross-referenced {} proteins across {} tools", records.len(), TOOL_COUNT);
        Self { records }
    }

    /// Drop proteins assigned by fewer than two tools
    pub fn filter_comparable(&self) -> CrossReference {
        let records: IndexMap<String, CrossRefRecord> = self
            .records
            .iter()
            .filter(|(_, record)| record.is_comparable())
            .map(|(protein, record)| (protein.clone(), record.clone()))
            .collect();
        info!(
            "Kept {} of {} proteins clustered by at least {} tools",
            records.len(),
            self.records.len(),
            MIN_ASSIGNED
        );
        Self { records }
    }

    pub fn get(&self, protein: &str) -> Option<&CrossRefRecord> {
        self.records.get(protein)
    }

    pub fn insert(&mut self, protein: impl Into<String>, record: CrossRefRecord) {
        self.records.insert(protein.into(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CrossRefRecord)> {
        self.records.iter().map(|(p, r)| (p.as_str(), r))
    }
}
