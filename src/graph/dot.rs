//! DOT source for the external Graphviz renderer.

use std::fmt::Write;

use super::{NodeShape, RuleGraph};

/// Comment written on the first line of every DOT document.
pub const DOT_COMMENT: &str = "Decision Tree";

impl RuleGraph {
    /// Serializes the graph as a Graphviz `digraph`.
    ///
    /// Identifiers are always quoted: normalized identities may contain `<`,
    /// `>` or `=`, or start with a digit.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(out, "// {}", DOT_COMMENT);
        out.push_str("digraph {\n");
        for node in &self.nodes {
            let _ = write!(out, "\t\"{}\" [label=\"{}\"", node.id, escape_label(&node.label));
            if node.shape == NodeShape::Box {
                out.push_str(" shape=box");
            }
            let _ = writeln!(out, " fillcolor=\"{}\" style=filled]", node.fill_color);
        }
        for edge in &self.edges {
            let _ = writeln!(out, "\t\"{}\" -> \"{}\"", edge.from, edge.to);
        }
        out.push_str("}\n");
        out
    }
}

fn escape_label(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped
}
