//! The terminal part of a rule: predicted class, per-class counts and the
//! share of training samples reaching the leaf.

use std::fmt;

use crate::config::OUTCOME_KEYWORD;
use crate::error::{Result, RulesError};
use crate::utils::{aggregate_outputs, majority_class, percentage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassCount {
    pub class_name: String,
    /// Sample count, truncated to an integer.
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Predicted (majority) class.
    pub class_name: String,
    /// One entry per class, in class order.
    pub counts: Vec<ClassCount>,
    /// Share of all training samples that reach this leaf.
    pub percentage: f64,
}

impl Outcome {
    /// Builds the outcome for a leaf from its `[output][class]` counts.
    ///
    /// # Arguments
    /// * `values` - The leaf's counts; outputs are summed first.
    /// * `class_names` - Display names aligned with the count columns.
    /// * `total_samples` - Number of samples the tree was fitted on (non-zero).
    pub fn from_leaf(values: &[Vec<f64>], class_names: &[String], total_samples: u64) -> Result<Self> {
        let class_totals = aggregate_outputs(values);
        let leaf_total: f64 = class_totals.iter().sum();

        let winner = majority_class(&class_totals)
            .ok_or_else(|| RulesError::malformed("leaf has no class counts"))?;
        let class_name = class_names.get(winner).cloned().ok_or_else(|| {
            RulesError::config(format!(
                "predicted class index {} has no display name ({} class names given)",
                winner,
                class_names.len()
            ))
        })?;

        let counts = class_names
            .iter()
            .zip(&class_totals)
            .map(|(name, &count)| ClassCount {
                class_name: name.clone(),
                count: count as u64,
            })
            .collect();

        Ok(Outcome {
            class_name,
            counts,
            percentage: percentage(leaf_total, total_samples as f64),
        })
    }

    /// Total samples at the leaf, from the truncated counts.
    pub fn sample_count(&self) -> u64 {
        self.counts.iter().map(|c| c.count).sum()
    }

    /// `"Yes: 10, No: 0"`
    pub fn counts_text(&self) -> String {
        self.counts
            .iter()
            .map(|c| format!("{}: {}", c.class_name, c.count))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Outcome {
    /// `Clase: Yes (n=[Yes: 10, No: 0], 33.3%)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (n=[{}], {:.1}%)",
            OUTCOME_KEYWORD,
            self.class_name,
            self.counts_text(),
            self.percentage
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        vec!["Yes".to_string(), "No".to_string()]
    }

    #[test]
    fn test_outcome_text() {
        let outcome = Outcome::from_leaf(&[vec![10.0, 0.0]], &names(), 30).unwrap();
        assert_eq!(outcome.class_name, "Yes");
        assert_eq!(outcome.to_string(), "Clase: Yes (n=[Yes: 10, No: 0], 33.3%)");
        assert_eq!(outcome.sample_count(), 10);
    }

    #[test]
    fn test_outputs_are_summed() {
        let outcome = Outcome::from_leaf(&[vec![1.0, 4.0], vec![2.0, 0.0]], &names(), 7).unwrap();
        assert_eq!(outcome.class_name, "No");
        assert_eq!(outcome.counts_text(), "Yes: 3, No: 4");
        assert!((outcome.percentage - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_tie_prefers_first_class() {
        let outcome = Outcome::from_leaf(&[vec![5.0, 5.0]], &names(), 10).unwrap();
        assert_eq!(outcome.class_name, "Yes");
    }

    #[test]
    fn test_missing_class_name() {
        let result = Outcome::from_leaf(&[vec![0.0, 0.0, 9.0]], &names(), 9);
        assert!(matches!(result, Err(RulesError::Configuration(_))));
    }
}
