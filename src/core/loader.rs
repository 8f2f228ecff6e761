//! Loading parsed orthologous group tables
//!
//! Each clustering tool's results arrive as a tab-delimited table with a
//! header row. Columns are located by name through the tool's
//! [`TableSchema`], so the extra species column some parsers emit is simply
//! never read.

use crate::core::config::{TableSchema, ToolSchemas};
use crate::core::tool::{OrthologyTool, TOOL_COUNT};
use crate::{ReconcileError, Result};
use csv::ReaderBuilder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// One tool's OG assignments in both directions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentTable {
    pub tool: OrthologyTool,
    /// protein id -> group id; the first row naming a protein wins
    pub assignments: IndexMap<String, String>,
    /// group id -> member protein ids, in table row order
    pub groups: IndexMap<String, Vec<String>>,
}

impl AssignmentTable {
    pub fn new(tool: OrthologyTool) -> Self {
        Self {
            tool,
            assignments: IndexMap::new(),
            groups: IndexMap::new(),
        }
    }

    /// Record one table row. Returns `false` if the protein already had a
    /// group, in which case its assignment is left unchanged.
    pub fn insert(&mut self, protein: &str, group: &str) -> bool {
        self.groups
            .entry(group.to_string())
            .or_default()
            .push(protein.to_string());

        if self.assignments.contains_key(protein) {
            return false;
        }
        self.assignments.insert(protein.to_string(), group.to_string());
        true
    }

    pub fn group_of(&self, protein: &str) -> Option<&str> {
        self.assignments.get(protein).map(String::as_str)
    }

    pub fn members(&self, group: &str) -> Option<&[String]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    pub fn protein_count(&self) -> usize {
        self.assignments.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

/// The four tools' tables, held in slot order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolTables {
    tables: Vec<AssignmentTable>,
}

impl ToolTables {
    /// Accepts the tables in any order; every tool must appear exactly once
    pub fn new(mut tables: Vec<AssignmentTable>) -> Result<Self> {
        if tables.len() != TOOL_COUNT {
            return Err(ReconcileError::InvalidInput(format!(
                "expected {} tool tables, got {}",
                TOOL_COUNT,
                tables.len()
            )));
        }
        tables.sort_by_key(|t| t.tool.slot());
        for (table, tool) in tables.iter().zip(OrthologyTool::ALL) {
            if table.tool != tool {
                return Err(ReconcileError::InvalidInput(format!(
                    "no table supplied for {}",
                    tool
                )));
            }
        }
        Ok(Self { tables })
    }

    pub fn get(&self, tool: OrthologyTool) -> &AssignmentTable {
        &self.tables[tool.slot()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssignmentTable> {
        self.tables.iter()
    }

    /// Load every tool's table, paths given in slot order
    pub fn load<P: AsRef<Path>>(paths: &[P; TOOL_COUNT], schemas: &ToolSchemas) -> Result<Self> {
        let mut tables = Vec::with_capacity(TOOL_COUNT);
        for (path, tool) in paths.iter().zip(OrthologyTool::ALL) {
            tables.push(load_assignment_table(path, tool, schemas.get(tool))?);
        }
        Self::new(tables)
    }
}

pub fn load_assignment_table<P: AsRef<Path>>(
    path: P,
    tool: OrthologyTool,
    schema: &TableSchema,
) -> Result<AssignmentTable> {
    let path = path.as_ref();
    debug!("Loading {} table from {}", tool, path.display());
    let file = File::open(path)?;
    let table = read_assignment_table(file, tool, schema, &path.display().to_string())?;
    info!(
        "Loaded {} table: {} proteins in {} groups",
        tool,
        table.protein_count(),
        table.group_count()
    );
    Ok(table)
}

/// Parse a table from any reader; `source` names it in error messages
pub fn read_assignment_table<R: Read>(
    reader: R,
    tool: OrthologyTool,
    schema: &TableSchema,
    source: &str,
) -> Result<AssignmentTable> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let find_column = |name: &str| {
        headers.iter().position(|h| h.trim() == name).ok_or_else(|| {
            ReconcileError::Parse(format!(
                "{}: column '{}' not found in header [{}]",
                source,
                name,
                headers.iter().collect::<Vec<_>>().join(", ")
            ))
        })
    };
    let query_idx = find_column(&schema.query_column)?;
    let group_idx = find_column(&schema.group_column)?;

    let mut table = AssignmentTable::new(tool);
    let mut duplicates = 0usize;

    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        // header is line 1
        let line = record.position().map(|p| p.line()).unwrap_or(row as u64 + 2);

        let field = |idx: usize, name: &str| -> Result<String> {
            let value = record.get(idx).map(str::trim).unwrap_or("");
            if value.is_empty() {
                return Err(ReconcileError::Parse(format!(
                    "{}: line {}: empty '{}' value",
                    source, line, name
                )));
            }
            Ok(value.to_string())
        };
        let protein = field(query_idx, &schema.query_column)?;
        let group = field(group_idx, &schema.group_column)?;

        if !table.insert(&protein, &group) {
            duplicates += 1;
            debug!("{}: line {}: {} listed again, keeping first group", source, line, protein);
        }
    }

    if duplicates > 0 {
        warn!(
            "{}: {} rows repeat an already assigned protein; the first assignment was kept",
            source, duplicates
        );
    }

    Ok(table)
}
