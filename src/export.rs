//! Writes extracted rules and the rule graph to disk.
//!
//! Three formats:
//! * plain text, one rule string per line;
//! * DOT source, ready for Graphviz (`external::render_dot`);
//! * JSON, the graph's nodes and edges for tools that do their own layout.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::graph::RuleGraph;
use crate::rules::Rule;

/// Writes one rule per line.
pub fn write_rules_text<P: AsRef<Path>>(rules: &[Rule], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    for rule in rules {
        writeln!(writer, "{}", rule)?;
    }
    writer.flush()?;
    info!(path = ?path, rules = rules.len(), "Wrote rules");
    Ok(())
}

/// Writes the graph as DOT source.
pub fn write_dot<P: AsRef<Path>>(graph: &RuleGraph, path: P) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, graph.to_dot())?;
    info!(path = ?path, nodes = graph.node_count(), edges = graph.edge_count(), "Wrote DOT graph");
    Ok(())
}

/// Exports the graph's nodes and edges as pretty-printed JSON.
///
/// ```json
/// { "nodes": [{ "id": "age_<=_3000", "label": "age <= 30.00", "kind": "condition",
///               "shape": "ellipse", "fill_color": "lightblue", "level": 0 }, ...],
///   "edges": [{ "from": "age_<=_3000", "to": "class_Yes" }, ...] }
/// ```
pub fn export_graph_to_json<P: AsRef<Path>>(graph: &RuleGraph, path: P) -> Result<()> {
    let path = path.as_ref();
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, graph)?;
    info!(path = ?path, "Exported graph JSON");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build;
    use crate::rules::{extract, rule_strings, FeatureSet};
    use crate::tree::TreeData;

    fn sample_rules() -> Vec<Rule> {
        let tree = TreeData::single_output(
            vec![0, -2, -2],
            vec![30.0, -2.0, -2.0],
            vec![1, -1, -1],
            vec![2, -1, -1],
            vec![vec![10.0, 20.0], vec![10.0, 0.0], vec![0.0, 20.0]],
        );
        let classes = vec!["Yes".to_string(), "No".to_string()];
        extract(&tree, &FeatureSet::from_names(["age"]), &classes, 30).unwrap()
    }

    #[test]
    fn test_write_rules_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.txt");
        write_rules_text(&sample_rules(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "(age <= 30.00) -> Clase: Yes (n=[Yes: 10, No: 0], 33.3%)\n\
             (age > 30.00) -> Clase: No (n=[Yes: 0, No: 20], 66.7%)\n"
        );
    }

    #[test]
    fn test_graph_json_and_dot() {
        let graph = build(&rule_strings(&sample_rules()));
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("rules.json");
        export_graph_to_json(&graph, &json_path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 4);
        assert_eq!(value["edges"].as_array().unwrap().len(), 2);
        assert_eq!(value["nodes"][0]["kind"], "condition");
        assert_eq!(value["nodes"][0]["level"], 0);
        assert!(value.get("index").is_none());

        let dot_path = dir.path().join("rules.dot");
        write_dot(&graph, &dot_path).unwrap();
        assert!(std::fs::read_to_string(&dot_path).unwrap().starts_with("// Decision Tree\ndigraph {"));
    }
}
