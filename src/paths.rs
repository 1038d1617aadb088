//! Structural root-to-leaf paths of a fitted tree.
//!
//! A `Path` records which way each split was taken, independent of how the
//! feature is later described to a human. `rules` turns paths into text.

use crate::error::{Result, RulesError};
use crate::tree::{Node, NodeId, TreeData};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,  // <= threshold
    Right, // > threshold
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Split {
    pub feature: usize,
    pub threshold: f64,
    pub direction: Direction,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    /// Splits taken, root first.
    pub splits: Vec<Split>,
    /// Leaf the path ends in.
    pub leaf: NodeId,
}

/// Collects every root-to-leaf path, depth-first, left before right.
///
/// Fails with `MalformedTree` if a child index is out of range or a node is
/// reached twice (shared subtree or cycle).
pub fn extract_paths(tree: &TreeData) -> Result<Vec<Path>> {
    tree.check_shape()?;

    let mut paths = Vec::new();
    let mut current_splits = Vec::new();
    let mut visited = vec![false; tree.node_count()];

    fn dfs(
        tree: &TreeData,
        node_id: NodeId,
        current_splits: &mut Vec<Split>,
        visited: &mut [bool],
        paths: &mut Vec<Path>,
    ) -> Result<()> {
        let node = tree.node(node_id)?;
        if std::mem::replace(&mut visited[node_id], true) {
            return Err(RulesError::malformed(format!(
                "node {} is reachable more than once",
                node_id
            )));
        }

        let (feature, threshold, left, right) = match node {
            Node::Leaf { .. } => {
                paths.push(Path {
                    splits: current_splits.clone(),
                    leaf: node_id,
                });
                return Ok(());
            }
            Node::Split { feature, threshold, left, right } => (feature, threshold, left, right),
        };

        current_splits.push(Split { feature, threshold, direction: Direction::Left });
        dfs(tree, left, current_splits, visited, paths)?;
        current_splits.pop();

        current_splits.push(Split { feature, threshold, direction: Direction::Right });
        dfs(tree, right, current_splits, visited, paths)?;
        current_splits.pop();

        Ok(())
    }

    dfs(tree, 0, &mut current_splits, &mut visited, &mut paths)?;
    Ok(paths)
}
