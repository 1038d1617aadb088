//! Human-readable decision rules and rule graphs from fitted decision trees.
//!
//! The pipeline runs one way:
//! 1. load a tree exported in scikit-learn's flat array layout (`tree`),
//! 2. describe its features (`rules::FeatureSet`, `config::FeatureConfig`),
//! 3. extract one rule per leaf (`rules::extract`),
//! 4. fold the rule strings into a deduplicated graph (`graph::build`),
//! 5. write text/CSV/DOT/JSON (`export`, `results`) and optionally render
//!    the DOT source with Graphviz (`external`).
//!
//! ```
//! use tree_rules::{graph, rules, tree::TreeData};
//!
//! let tree = TreeData::single_output(
//!     vec![0, -2, -2],
//!     vec![30.0, -2.0, -2.0],
//!     vec![1, -1, -1],
//!     vec![2, -1, -1],
//!     vec![vec![10.0, 20.0], vec![10.0, 0.0], vec![0.0, 20.0]],
//! );
//! let classes = vec!["Yes".to_string(), "No".to_string()];
//! let features = rules::FeatureSet::from_names(["age"]);
//!
//! let extracted = rules::extract(&tree, &features, &classes, 30)?;
//! assert_eq!(
//!     extracted[0].to_string(),
//!     "(age <= 30.00) -> Clase: Yes (n=[Yes: 10, No: 0], 33.3%)"
//! );
//!
//! let graph = graph::build(&rules::rule_strings(&extracted));
//! assert_eq!(graph.node_count(), 4);
//! assert_eq!(graph.edge_count(), 2);
//! # Ok::<(), tree_rules::RulesError>(())
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod external;
pub mod graph;
pub mod paths;
pub mod results;
pub mod rules;
pub mod tree;
pub mod utils;

pub use error::{Result, RulesError};
pub use graph::{build, build_with_style, GraphStyle, RuleGraph};
pub use rules::{extract, extract_forest, Feature, FeatureKind, FeatureSet, Rule};
pub use tree::{ForestData, TreeData};
