use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Result, RulesError};

// --- Rule Text ---
/// Keyword that introduces the outcome part of a rule string.
pub const OUTCOME_KEYWORD: &str = "Clase";
/// Separator between conditions in a rule string.
pub const CONDITION_SEPARATOR: &str = " AND ";
/// Arrow separating conditions from the outcome.
pub const OUTCOME_ARROW: &str = "->";

// --- Graph Styling ---
/// Fill colors for condition nodes, rotated by the node's position in its rule.
pub const LEVEL_PALETTE: [&str; 7] = [
    "lightblue",
    "lightyellow",
    "lightgray",
    "lightcyan",
    "lavender",
    "lightcoral",
    "lightgoldenrodyellow",
];
/// Fill color for outcome nodes whose label starts with `POSITIVE_OUTCOME_PREFIX`.
pub const POSITIVE_OUTCOME_COLOR: &str = "#ccffcc"; // green
/// Fill color for every other outcome node.
pub const NEGATIVE_OUTCOME_COLOR: &str = "#ffcccc"; // red
/// Outcome labels starting with this prefix are drawn with the positive color.
pub const POSITIVE_OUTCOME_PREFIX: &str = "S";

/// Feature and class description for one fitted model, loaded from JSON.
///
/// ```json
/// {
///   "feature_names": ["age", "size", "smoker"],
///   "class_names": ["Si", "No"],
///   "ordinal": { "size": ["small", "medium", "large"] },
///   "categorical": { "smoker": { "0": "no", "1": "yes" } },
///   "total_samples": 30
/// }
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct FeatureConfig {
    /// Feature names aligned with the tree's feature indices.
    pub feature_names: Vec<String>,
    /// Class display names aligned with the count vector columns.
    pub class_names: Vec<String>,
    /// Ordered category lists for ordinal features, keyed by feature name.
    #[serde(default)]
    pub ordinal: BTreeMap<String, Vec<String>>,
    /// Encoded value → label maps for binary-encoded categorical features.
    #[serde(default)]
    pub categorical: BTreeMap<String, BTreeMap<i64, String>>,
    /// Number of samples the tree was fitted on. Falls back to the root's count when absent.
    #[serde(default)]
    pub total_samples: Option<u64>,
}

/// Loads a `FeatureConfig` from a JSON file.
pub fn load_feature_config<P: AsRef<Path>>(filename: P) -> Result<FeatureConfig> {
    let path = filename.as_ref();
    let content = fs::read_to_string(path).map_err(|source| RulesError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: FeatureConfig = serde_json::from_str(&content)?;
    if config.class_names.is_empty() {
        return Err(RulesError::config(format!("{:?} lists no class names", path)));
    }
    Ok(config)
}
