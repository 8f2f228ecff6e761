#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use og_reconcile::OrthologyTool;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn og_reconcile_cmd() -> Command {
    Command::cargo_bin("og-reconcile").unwrap()
}

/// Header line of a parsed table for `tool`
pub fn table_header(tool: OrthologyTool) -> String {
    format!("Query\t{}", tool.group_column())
}

/// Render `(protein, group)` rows as a parsed table
pub fn table_content(tool: OrthologyTool, rows: &[(&str, &str)]) -> String {
    let mut content = table_header(tool);
    content.push('\n');
    for (protein, group) in rows {
        content.push_str(&format!("{}\t{}\n", protein, group));
    }
    content
}

/// Broccoli and OrthoFinder agree on P1 and P2, ProteinOrtho and
/// SonicParanoid each clustered a protein nobody else did
pub fn agreeing_rows() -> [Vec<(&'static str, &'static str)>; 4] {
    [
        vec![("P1", "G1"), ("P2", "G1")],
        vec![("P1", "H1"), ("P2", "H1")],
        vec![("P3", "R1")],
        vec![("P4", "S1")],
    ]
}

/// No pair of tools groups proteins identically
pub fn disagreeing_rows() -> [Vec<(&'static str, &'static str)>; 4] {
    [
        vec![("P1", "G1"), ("P2", "G1")],
        vec![("P1", "H1"), ("P3", "H1")],
        vec![("P2", "R1"), ("P3", "R1"), ("P4", "R1")],
        vec![("P1", "S1"), ("P4", "S1"), ("P5", "S1")],
    ]
}

pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let input_dir = temp_dir.path().join("input");
        let output_dir = temp_dir.path().join("output");

        fs::create_dir_all(&input_dir)?;
        fs::create_dir_all(&output_dir)?;

        Ok(Self {
            temp_dir,
            input_dir,
            output_dir,
        })
    }

    pub fn create_input_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.input_dir.join(name);
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }

    /// Write one parsed table per tool, returning the paths in slot order
    pub fn write_tables(&self, rows: &[Vec<(&str, &str)>; 4]) -> Result<[PathBuf; 4]> {
        let mut paths: [PathBuf; 4] = Default::default();
        for (i, tool) in OrthologyTool::ALL.iter().enumerate() {
            paths[i] = self.create_input_file(
                &format!("{}_parsed.txt", tool.key()),
                &table_content(*tool, &rows[i]),
            )?;
        }
        Ok(paths)
    }

    /// Checkpoint file of the default test run in the output directory
    pub fn checkpoint(&self, stem: &str) -> PathBuf {
        self.output_dir.join(format!("test_run.{}.json", stem))
    }

    /// A `membership` command over `paths` writing into the output directory
    pub fn membership_cmd(&self, paths: &[PathBuf; 4]) -> Command {
        let mut cmd = og_reconcile_cmd();
        cmd.arg("membership")
            .args(paths)
            .arg("--work-dir")
            .arg(&self.output_dir)
            .arg("--run-id")
            .arg("test_run")
            .env_remove("OG_RECONCILE_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }
}

pub fn read_to_string(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}
