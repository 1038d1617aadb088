//! Read-only view of a fitted binary decision tree, stored the way
//! scikit-learn exposes `tree_`: parallel arrays indexed by node id.
//!
//! Trees are produced by an external library and loaded here from a JSON
//! dump. Nothing in this crate mutates a tree after loading.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{Result, RulesError};

/// Type alias for a node index within a `TreeData`.
pub type NodeId = usize;

// --- Sklearn-Style Sentinels ---
/// Sentinel value for `children_left`/`children_right` marking a leaf.
pub const CHILD_LEAF_SENTINEL: i64 = -1;
/// Sentinel value for the feature index marking a leaf (`TREE_UNDEFINED`).
pub const FEATURE_LEAF_SENTINEL: i64 = -2;
// --- End Sentinels ---

/// A single fitted tree in flat-array form.
///
/// `values[node][output][class]` holds the per-class sample counts reaching a
/// node. Single-output classifiers have exactly one entry in the middle axis;
/// extra outputs are summed when a leaf is turned into a rule.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TreeData {
    /// Feature index used by the split, or `-2` for leaves.
    pub features: Vec<i64>,
    /// Split threshold; samples with `x[feature] <= threshold` go left.
    pub thresholds: Vec<f64>,
    /// Index of the left child, or `-1` for leaves.
    pub children_left: Vec<i64>,
    /// Index of the right child, or `-1` for leaves.
    pub children_right: Vec<i64>,
    /// Per-node class counts, `[node][output][class]`.
    pub values: Vec<Vec<Vec<f64>>>,
    /// Number of training samples reaching each node, when the exporter provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_node_samples: Option<Vec<u64>>,
}

/// A forest dump: several independent trees sharing one feature/class description.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ForestData {
    pub trees: Vec<TreeData>,
}

/// Borrowed view of one node, resolved from the flat arrays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    /// Internal node splitting on `feature` at `threshold`.
    Split {
        feature: usize,
        threshold: f64,
        left: NodeId,
        right: NodeId,
    },
    /// Terminal node with its `[output][class]` counts.
    Leaf { values: &'a [Vec<f64>] },
}

impl TreeData {
    /// Builds a single-output tree from `[node][class]` counts.
    pub fn single_output(
        features: Vec<i64>,
        thresholds: Vec<f64>,
        children_left: Vec<i64>,
        children_right: Vec<i64>,
        values: Vec<Vec<f64>>,
    ) -> Self {
        TreeData {
            features,
            thresholds,
            children_left,
            children_right,
            values: values.into_iter().map(|v| vec![v]).collect(),
            n_node_samples: None,
        }
    }

    /// Number of nodes (internal + leaves).
    #[inline]
    pub fn node_count(&self) -> usize {
        self.features.len()
    }

    /// Checks that all parallel arrays have the same length and the tree is non-empty.
    ///
    /// This is a shape check only; links are verified lazily during traversal.
    pub fn check_shape(&self) -> Result<()> {
        let n = self.features.len();
        if n == 0 {
            return Err(RulesError::malformed("tree has no nodes"));
        }
        if self.thresholds.len() != n
            || self.children_left.len() != n
            || self.children_right.len() != n
            || self.values.len() != n
        {
            return Err(RulesError::malformed(format!(
                "inconsistent array lengths: features={}, thresholds={}, children_left={}, children_right={}, values={}",
                n,
                self.thresholds.len(),
                self.children_left.len(),
                self.children_right.len(),
                self.values.len()
            )));
        }
        if let Some(samples) = &self.n_node_samples {
            if samples.len() != n {
                return Err(RulesError::malformed(format!(
                    "n_node_samples has {} entries for {} nodes",
                    samples.len(),
                    n
                )));
            }
        }
        Ok(())
    }

    /// Checks if the node with the given id is a leaf.
    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.features[id] == FEATURE_LEAF_SENTINEL
    }

    /// Resolves node `id` into a `Node` view, checking child links.
    pub fn node(&self, id: NodeId) -> Result<Node<'_>> {
        if id >= self.node_count() {
            return Err(RulesError::malformed(format!(
                "node {} out of bounds ({} nodes)",
                id,
                self.node_count()
            )));
        }

        if self.is_leaf(id) {
            return Ok(Node::Leaf { values: &self.values[id] });
        }

        let feature = self.features[id];
        if feature < 0 {
            return Err(RulesError::malformed(format!(
                "unexpected negative feature index {} at node {}",
                feature, id
            )));
        }
        let left = self.child_index(id, self.children_left[id])?;
        let right = self.child_index(id, self.children_right[id])?;

        Ok(Node::Split {
            feature: feature as usize,
            threshold: self.thresholds[id],
            left,
            right,
        })
    }

    fn child_index(&self, parent: NodeId, raw: i64) -> Result<NodeId> {
        if raw == CHILD_LEAF_SENTINEL {
            return Err(RulesError::malformed(format!(
                "internal node {} is missing a child",
                parent
            )));
        }
        if raw < 0 || raw as usize >= self.node_count() {
            return Err(RulesError::malformed(format!(
                "internal node {} has invalid child index {}",
                parent, raw
            )));
        }
        Ok(raw as NodeId)
    }

    /// Number of training samples that reached the root.
    ///
    /// Uses `n_node_samples[0]` when present, otherwise the root's summed counts
    /// (which equals the sample count when the exporter stored raw counts).
    pub fn root_sample_count(&self) -> Option<f64> {
        if let Some(samples) = &self.n_node_samples {
            return samples.first().map(|&n| n as f64);
        }
        self.values
            .first()
            .map(|outputs| outputs.iter().flatten().sum())
    }
}

/// Loads one tree from a JSON file and checks its shape.
pub fn load_tree_data<P: AsRef<Path>>(filename: P) -> Result<TreeData> {
    let path = filename.as_ref();
    let content = fs::read_to_string(path).map_err(|source| RulesError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let tree: TreeData = serde_json::from_str(&content)?;
    tree.check_shape()?;
    debug!(path = ?path, nodes = tree.node_count(), "Loaded tree");
    Ok(tree)
}

/// Loads a forest from a JSON file and checks the shape of every tree.
pub fn load_forest_data<P: AsRef<Path>>(filename: P) -> Result<ForestData> {
    let path = filename.as_ref();
    let content = fs::read_to_string(path).map_err(|source| RulesError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let forest: ForestData = serde_json::from_str(&content)?;
    if forest.trees.is_empty() {
        warn!(path = ?path, "Forest file contains no trees");
    }
    for (idx, tree) in forest.trees.iter().enumerate() {
        tree.check_shape().map_err(|e| e.in_tree(idx))?;
    }
    debug!(path = ?path, trees = forest.trees.len(), "Loaded forest");
    Ok(forest)
}

/// Renders the tree as an indented outline, one line per node.
///
/// Feature indices are printed raw; this is a debugging aid, not a rule listing.
pub fn format_tree(tree: &TreeData) -> String {
    let mut out = String::new();
    let mut visited = vec![false; tree.node_count()];
    format_node_recursive(tree, 0, "", &mut visited, &mut out);
    out
}

fn format_node_recursive(
    tree: &TreeData,
    node_id: NodeId,
    prefix: &str,
    visited: &mut [bool],
    out: &mut String,
) {
    if node_id >= tree.node_count() {
        out.push_str(&format!("{}Invalid Node ID: {}\n", prefix, node_id));
        return;
    }
    if std::mem::replace(&mut visited[node_id], true) {
        out.push_str(&format!("{}-> Revisited Node [ID: {}]\n", prefix, node_id));
        return;
    }

    match tree.node(node_id) {
        Ok(Node::Leaf { values }) => {
            let counts: Vec<f64> = crate::utils::aggregate_outputs(values);
            out.push_str(&format!("{}Leaf(counts = {:?}) [ID: {}]\n", prefix, counts, node_id));
        }
        Ok(Node::Split { feature, threshold, left, right }) => {
            out.push_str(&format!(
                "{}Node(feature[{}] <= {:.4}?) [ID: {}]\n",
                prefix, feature, threshold, node_id
            ));
            let child_prefix_left = format!("{}  |-- True: ", prefix);
            let child_prefix_right = format!("{}  `-- False:", prefix);
            format_node_recursive(tree, left, &child_prefix_left, visited, out);
            format_node_recursive(tree, right, &child_prefix_right, visited, out);
        }
        Err(e) => out.push_str(&format!("{}Error: {} [ID: {}]\n", prefix, e, node_id)),
    }
}
