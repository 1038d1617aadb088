//! Node identity: the normalized text key that makes two rules share a node.

use serde::Serialize;
use std::fmt;

/// Canonical key of a graph node.
///
/// Only ASCII letters, digits and `_ = < >` survive normalization, which also
/// makes the key safe to use as a bare DOT identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeIdentity(String);

impl NodeIdentity {
    /// Keeps only the characters allowed in an identity.
    pub fn normalize(text: &str) -> Self {
        NodeIdentity(
            text.chars()
                .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '=' | '<' | '>'))
                .collect(),
        )
    }

    /// Identity of a cleaned condition: spaces become `_` and `==` becomes `eq`
    /// before normalizing, so `smoker == yes` keys as `smoker_eq_yes`.
    pub fn for_condition(cleaned: &str) -> Self {
        Self::normalize(&cleaned.replace(' ', "_").replace("==", "eq"))
    }

    /// Identity of an outcome node, namespaced with `class_`.
    pub fn for_outcome(label: &str) -> Self {
        Self::normalize(&format!("class_{}", label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strips surrounding whitespace, parentheses and single quotes from a condition.
pub fn clean_condition(condition: &str) -> String {
    condition
        .trim()
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '\''))
        .collect()
}
