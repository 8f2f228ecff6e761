pub mod cli;
pub mod core;
pub mod report;

pub use crate::core::{
    checkpoint::CheckpointStore,
    crossref::{CrossRefRecord, CrossReference},
    loader::AssignmentTable,
    pipeline::Reconciler,
    tool::{OrthologyTool, ToolPair},
};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Missing checkpoint: {}", .0.display())]
    MissingCheckpoint(PathBuf),

    #[error("Invalid checkpoint: {0}")]
    InvalidCheckpoint(String),

    #[error("Invariant violated: {0}")]
    Invariant(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<serde_json::Error> for ReconcileError {
    fn from(err: serde_json::Error) -> Self {
        ReconcileError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
