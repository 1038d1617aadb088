//! Feature descriptions and the translation of a numeric split into a
//! human-readable condition.
//!
//! The kind of a feature decides how its threshold reads:
//! * `Continuous`: `(f <= 3.14)` / `(f > 3.14)`.
//! * `Ordinal`: the split is on category rank, so each side lists the
//!   categories it covers, `(f = low OR mid)`.
//! * `Categorical`: a 0/1 membership indicator, `(f == 'yes')`.

use std::collections::BTreeMap;

use crate::config::FeatureConfig;
use crate::error::{Result, RulesError};
use crate::paths::Direction;

/// How a feature's split threshold is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureKind {
    Continuous,
    /// Ordered categories; the tree sees the rank `0..n`.
    Ordinal { categories: Vec<String> },
    /// Binary-encoded membership; `labels` maps the encoded value to its display label.
    Categorical { labels: BTreeMap<i64, String> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub name: String,
    pub kind: FeatureKind,
}

impl Feature {
    pub fn continuous(name: impl Into<String>) -> Self {
        Feature { name: name.into(), kind: FeatureKind::Continuous }
    }

    pub fn ordinal<S: Into<String>>(name: impl Into<String>, categories: impl IntoIterator<Item = S>) -> Self {
        Feature {
            name: name.into(),
            kind: FeatureKind::Ordinal {
                categories: categories.into_iter().map(Into::into).collect(),
            },
        }
    }

    pub fn categorical<S: Into<String>>(
        name: impl Into<String>,
        labels: impl IntoIterator<Item = (i64, S)>,
    ) -> Self {
        Feature {
            name: name.into(),
            kind: FeatureKind::Categorical {
                labels: labels.into_iter().map(|(v, l)| (v, l.into())).collect(),
            },
        }
    }

    /// Formats the condition satisfied by samples taking `direction` at `threshold`.
    pub fn condition(&self, threshold: f64, direction: Direction) -> String {
        let name = &self.name;
        match (&self.kind, direction) {
            (FeatureKind::Continuous, Direction::Left) => format!("({} <= {:.2})", name, threshold),
            (FeatureKind::Continuous, Direction::Right) => format!("({} > {:.2})", name, threshold),
            (FeatureKind::Ordinal { categories }, direction) => {
                let cut = ordinal_cut(threshold, categories.len());
                let side = match direction {
                    Direction::Left => &categories[..cut],
                    Direction::Right => &categories[cut..],
                };
                format!("({} = {})", name, side.join(" OR "))
            }
            // Left holds the encoded value 1, right the value 0.
            (FeatureKind::Categorical { labels }, Direction::Left) => {
                format!("({} == '{}')", name, category_label(labels, 1))
            }
            (FeatureKind::Categorical { labels }, Direction::Right) => {
                format!("({} == '{}')", name, category_label(labels, 0))
            }
        }
    }
}

/// Number of ordinal categories on the left side of a split at `threshold`.
///
/// The left side ends at the first rank `i` with `threshold < i + 0.5`; if no
/// rank qualifies every category goes left. The right side is the remainder.
pub fn ordinal_cut(threshold: f64, n_categories: usize) -> usize {
    (0..n_categories)
        .find(|&i| threshold < i as f64 + 0.5)
        .map_or(n_categories, |i| i + 1)
}

fn category_label(labels: &BTreeMap<i64, String>, value: i64) -> String {
    labels
        .get(&value)
        .cloned()
        .unwrap_or_else(|| format!("Unknown({})", value))
}

/// Features aligned by index with the tree's feature indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSet {
    features: Vec<Feature>,
}

impl FeatureSet {
    pub fn new(features: Vec<Feature>) -> Self {
        FeatureSet { features }
    }

    /// All features continuous.
    pub fn from_names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        FeatureSet {
            features: names.into_iter().map(Feature::continuous).collect(),
        }
    }

    /// Builds the set from a loaded config.
    ///
    /// Rejects descriptors naming unknown features, features described as both
    /// ordinal and categorical, and ordinal features without categories.
    pub fn from_config(config: &FeatureConfig) -> Result<Self> {
        for name in config.ordinal.keys().chain(config.categorical.keys()) {
            if !config.feature_names.iter().any(|n| n == name) {
                return Err(RulesError::config(format!(
                    "descriptor given for unknown feature '{}'",
                    name
                )));
            }
        }

        let mut features = Vec::with_capacity(config.feature_names.len());
        for name in &config.feature_names {
            let feature = match (config.ordinal.get(name), config.categorical.get(name)) {
                (Some(_), Some(_)) => {
                    return Err(RulesError::config(format!(
                        "feature '{}' is described as both ordinal and categorical",
                        name
                    )))
                }
                (Some(categories), None) => {
                    if categories.is_empty() {
                        return Err(RulesError::config(format!(
                            "ordinal feature '{}' has no categories",
                            name
                        )));
                    }
                    Feature::ordinal(name.as_str(), categories.iter().cloned())
                }
                (None, Some(labels)) => {
                    Feature::categorical(name.as_str(), labels.iter().map(|(&v, l)| (v, l.clone())))
                }
                (None, None) => Feature::continuous(name.as_str()),
            };
            features.push(feature);
        }
        Ok(FeatureSet { features })
    }

    /// Looks up the feature a split refers to.
    pub fn get(&self, index: usize) -> Result<&Feature> {
        self.features.get(index).ok_or_else(|| {
            RulesError::config(format!(
                "split uses feature index {} but only {} features are described",
                index,
                self.features.len()
            ))
        })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
