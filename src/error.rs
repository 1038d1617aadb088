//! Error types for rule extraction and graph export.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, RulesError>;

/// Errors surfaced to callers.
///
/// Outcome-text parsing problems inside the graph builder are never reported
/// here: they degrade the label instead.
#[derive(Error, Debug)]
pub enum RulesError {
    /// A split or leaf cannot be interpreted with the supplied feature/class description.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The tree arrays are inconsistent or the node links do not form a tree.
    #[error("Malformed tree: {0}")]
    MalformedTree(String),

    /// Input file could not be read.
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The external graph renderer failed or could not be started.
    #[error("Render failed: {0}")]
    Render(String),
}

impl RulesError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        RulesError::Configuration(msg.into())
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        RulesError::MalformedTree(msg.into())
    }

    /// Prefixes tree-level errors with the index of the tree in its forest.
    pub(crate) fn in_tree(self, idx: usize) -> Self {
        match self {
            RulesError::MalformedTree(msg) => RulesError::MalformedTree(format!("tree {}: {}", idx, msg)),
            RulesError::Configuration(msg) => RulesError::Configuration(format!("tree {}: {}", idx, msg)),
            other => other,
        }
    }
}
