//! Turns a fitted tree into decision rules, one per leaf.
//!
//! Each rule reads
//! `(cond1) AND (cond2) -> Clase: <class> (n=[<class>: <count>, ...], <pct>%)`,
//! conditions listed root to leaf. Rules come out in depth-first,
//! left-before-right leaf order, so they partition the training samples and
//! their percentages add up to 100 (modulo rounding).
//!
//! Entry points:
//! 1. `extract`: one tree.
//! 2. `extract_forest`: every tree of a forest, in parallel.

mod features;
mod outcome;

pub use features::{ordinal_cut, Feature, FeatureKind, FeatureSet};
pub use outcome::{ClassCount, Outcome};

use rayon::prelude::*;
use std::fmt;
use tracing::debug;

use crate::config::{CONDITION_SEPARATOR, OUTCOME_ARROW};
use crate::error::{Result, RulesError};
use crate::paths::extract_paths;
use crate::tree::{ForestData, Node, TreeData};

/// One root-to-leaf path as text.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Condition strings, root first, each wrapped in parentheses.
    pub conditions: Vec<String>,
    pub outcome: Outcome,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // A leaf directly under the root has no conditions: "-> Clase: ..."
        if !self.conditions.is_empty() {
            write!(f, "{} ", self.conditions.join(CONDITION_SEPARATOR))?;
        }
        write!(f, "{} {}", OUTCOME_ARROW, self.outcome)
    }
}

/// Extracts one rule per leaf of `tree`.
///
/// # Arguments
/// * `tree` - The fitted tree.
/// * `features` - Descriptions aligned with the tree's feature indices.
/// * `class_names` - Display names aligned with the count columns.
/// * `total_samples` - Number of samples the tree was fitted on.
///
/// # Errors
/// `Configuration` when a split's feature or a leaf's predicted class has no
/// description, or `total_samples` is zero. `MalformedTree` when the node
/// links are broken.
pub fn extract(
    tree: &TreeData,
    features: &FeatureSet,
    class_names: &[String],
    total_samples: u64,
) -> Result<Vec<Rule>> {
    if total_samples == 0 {
        return Err(RulesError::config("total sample count must be positive"));
    }

    let paths = extract_paths(tree)?;
    let mut rules = Vec::with_capacity(paths.len());

    for path in &paths {
        let conditions = path
            .splits
            .iter()
            .map(|split| {
                features
                    .get(split.feature)
                    .map(|feature| feature.condition(split.threshold, split.direction))
            })
            .collect::<Result<Vec<String>>>()?;

        let outcome = match tree.node(path.leaf)? {
            Node::Leaf { values } => Outcome::from_leaf(values, class_names, total_samples)?,
            Node::Split { .. } => {
                return Err(RulesError::malformed(format!(
                    "path ends at internal node {}",
                    path.leaf
                )))
            }
        };

        rules.push(Rule { conditions, outcome });
    }

    debug!(rules = rules.len(), nodes = tree.node_count(), "Extracted rules");
    Ok(rules)
}

/// Extracts the rules of every tree in `forest`, one `Vec<Rule>` per tree in tree order.
///
/// Trees are processed in parallel; the first error aborts the whole extraction.
pub fn extract_forest(
    forest: &ForestData,
    features: &FeatureSet,
    class_names: &[String],
    total_samples: u64,
) -> Result<Vec<Vec<Rule>>> {
    forest
        .trees
        .par_iter()
        .enumerate()
        .map(|(idx, tree)| {
            extract(tree, features, class_names, total_samples).map_err(|e| e.in_tree(idx))
        })
        .collect()
}

/// Renders rules to their text form.
pub fn rule_strings(rules: &[Rule]) -> Vec<String> {
    rules.iter().map(Rule::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_names() -> Vec<String> {
        vec!["Yes".to_string(), "No".to_string()]
    }

    fn age_stump() -> TreeData {
        TreeData::single_output(
            vec![0, -2, -2],
            vec![30.0, -2.0, -2.0],
            vec![1, -1, -1],
            vec![2, -1, -1],
            vec![vec![10.0, 20.0], vec![10.0, 0.0], vec![0.0, 20.0]],
        )
    }

    #[test]
    fn test_age_stump_rules() {
        let rules = extract(&age_stump(), &FeatureSet::from_names(["age"]), &class_names(), 30).unwrap();
        assert_eq!(
            rule_strings(&rules),
            vec![
                "(age <= 30.00) -> Clase: Yes (n=[Yes: 10, No: 0], 33.3%)",
                "(age > 30.00) -> Clase: No (n=[Yes: 0, No: 20], 66.7%)",
            ]
        );
    }

    #[test]
    fn test_mixed_feature_kinds() {
        // size (ordinal) at the root, smoker (categorical) under its left branch.
        let tree = TreeData::single_output(
            vec![1, 2, -2, -2, -2],
            vec![0.2, 0.5, -2.0, -2.0, -2.0],
            vec![1, 2, -1, -1, -1],
            vec![4, 3, -1, -1, -1],
            vec![
                vec![6.0, 4.0],
                vec![4.0, 1.0],
                vec![4.0, 0.0],
                vec![0.0, 1.0],
                vec![2.0, 3.0],
            ],
        );
        let features = FeatureSet::new(vec![
            Feature::continuous("age"),
            Feature::ordinal("size", ["small", "medium", "large"]),
            Feature::categorical("smoker", [(0, "no"), (1, "yes")]),
        ]);

        let rules = extract(&tree, &features, &class_names(), 10).unwrap();
        assert_eq!(
            rule_strings(&rules),
            vec![
                "(size = small) AND (smoker == 'yes') -> Clase: Yes (n=[Yes: 4, No: 0], 40.0%)",
                "(size = small) AND (smoker == 'no') -> Clase: No (n=[Yes: 0, No: 1], 10.0%)",
                "(size = medium OR large) -> Clase: No (n=[Yes: 2, No: 3], 50.0%)",
            ]
        );
    }

    #[test]
    fn test_root_leaf_rule() {
        let tree = TreeData::single_output(vec![-2], vec![-2.0], vec![-1], vec![-1], vec![vec![3.0, 1.0]]);
        let rules = extract(&tree, &FeatureSet::default(), &class_names(), 4).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].to_string(), "-> Clase: Yes (n=[Yes: 3, No: 1], 100.0%)");
    }

    #[test]
    fn test_unknown_feature_is_configuration_error() {
        let result = extract(&age_stump(), &FeatureSet::default(), &class_names(), 30);
        assert!(matches!(result, Err(RulesError::Configuration(_))));
    }

    #[test]
    fn test_zero_samples_rejected() {
        let result = extract(&age_stump(), &FeatureSet::from_names(["age"]), &class_names(), 0);
        assert!(matches!(result, Err(RulesError::Configuration(_))));
    }

    #[test]
    fn test_extract_is_idempotent() {
        let features = FeatureSet::from_names(["age"]);
        let first = extract(&age_stump(), &features, &class_names(), 30).unwrap();
        let second = extract(&age_stump(), &features, &class_names(), 30).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_extract_forest_keeps_tree_order() {
        let leaf_only = TreeData::single_output(vec![-2], vec![-2.0], vec![-1], vec![-1], vec![vec![0.0, 30.0]]);
        let forest = ForestData { trees: vec![age_stump(), leaf_only] };

        let per_tree = extract_forest(&forest, &FeatureSet::from_names(["age"]), &class_names(), 30).unwrap();
        assert_eq!(per_tree.len(), 2);
        assert_eq!(per_tree[0].len(), 2);
        assert_eq!(per_tree[1][0].to_string(), "-> Clase: No (n=[Yes: 0, No: 30], 100.0%)");
    }

    #[test]
    fn test_extract_forest_reports_tree_index() {
        let mut broken = age_stump();
        broken.children_left[0] = 9;
        let forest = ForestData { trees: vec![age_stump(), broken] };

        match extract_forest(&forest, &FeatureSet::from_names(["age"]), &class_names(), 30) {
            Err(RulesError::MalformedTree(msg)) => assert!(msg.starts_with("tree 1:")),
            other => panic!("expected malformed tree error, got {:?}", other),
        }
    }
}
