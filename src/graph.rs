//! Folds a list of rule strings into one directed graph.
//!
//! Conditions with the same normalized text (`NodeIdentity`) become one node
//! shared by every rule that passes through it, and each rule ends in an
//! outcome node. The result is plain data; drawing it is left to an external
//! renderer (see `to_dot` and `external::render_dot`).
//!
//! Edge creation rules:
//! * an edge into a condition node is added only when that node is created,
//!   from the previous condition of the rule that created it;
//! * an edge into an outcome node is added for every rule, so parallel
//!   duplicate edges are possible.

mod dot;
mod identity;
mod outcome_label;

pub use identity::{clean_condition, NodeIdentity};
pub use outcome_label::OutcomeParser;

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::debug;

use crate::config::{
    CONDITION_SEPARATOR, LEVEL_PALETTE, NEGATIVE_OUTCOME_COLOR, OUTCOME_ARROW,
    POSITIVE_OUTCOME_COLOR, POSITIVE_OUTCOME_PREFIX,
};

/// Colors used by the builder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStyle {
    /// Condition node fill colors, indexed by position in the rule modulo length.
    pub level_palette: Vec<String>,
    pub positive_outcome_color: String,
    pub negative_outcome_color: String,
    /// Outcome labels starting with this prefix get `positive_outcome_color`.
    pub positive_outcome_prefix: String,
}

impl Default for GraphStyle {
    fn default() -> Self {
        GraphStyle {
            level_palette: LEVEL_PALETTE.iter().map(|c| c.to_string()).collect(),
            positive_outcome_color: POSITIVE_OUTCOME_COLOR.to_string(),
            negative_outcome_color: NEGATIVE_OUTCOME_COLOR.to_string(),
            positive_outcome_prefix: POSITIVE_OUTCOME_PREFIX.to_string(),
        }
    }
}

impl GraphStyle {
    fn level_color(&self, level: usize) -> &str {
        if self.level_palette.is_empty() {
            return "white";
        }
        &self.level_palette[level % self.level_palette.len()]
    }

    fn outcome_color(&self, label: &str) -> &str {
        if label.starts_with(self.positive_outcome_prefix.as_str()) {
            &self.positive_outcome_color
        } else {
            &self.negative_outcome_color
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    Ellipse,
    Box,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Condition,
    Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: NodeIdentity,
    pub label: String,
    pub kind: NodeKind,
    pub shape: NodeShape,
    pub fill_color: String,
    /// Position in the rule that created the node; `None` for outcome nodes.
    pub level: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub from: NodeIdentity,
    pub to: NodeIdentity,
}

/// Nodes and edges in creation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuleGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    #[serde(skip)]
    index: FxHashMap<NodeIdentity, usize>,
}

impl RuleGraph {
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, id: &NodeIdentity) -> Option<&GraphNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of edges `from → to`, counting parallel duplicates.
    pub fn edge_multiplicity(&self, from: &NodeIdentity, to: &NodeIdentity) -> usize {
        self.edges.iter().filter(|e| &e.from == from && &e.to == to).count()
    }

    fn push_node(&mut self, node: GraphNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn add_edge(&mut self, from: NodeIdentity, to: NodeIdentity) {
        self.edges.push(GraphEdge { from, to });
    }
}

/// Per-build bookkeeping: which identities already have a node, and the
/// level each condition node was created at.
///
/// Lives only for one `build` call; its node index is handed to the finished
/// `RuleGraph` for lookups.
#[derive(Debug, Default)]
struct NodeTracker {
    nodes: FxHashMap<NodeIdentity, usize>,
    levels: FxHashMap<NodeIdentity, usize>,
}

impl NodeTracker {
    fn contains(&self, id: &NodeIdentity) -> bool {
        self.nodes.contains_key(id)
    }

    fn level(&self, id: &NodeIdentity) -> Option<&usize> {
        self.levels.get(id)
    }

    fn record(&mut self, id: NodeIdentity, index: usize, level: Option<usize>) {
        if let Some(level) = level {
            self.levels.insert(id.clone(), level);
        }
        self.nodes.insert(id, index);
    }
}

/// Builds the graph for `rules` with the default style.
pub fn build<S: AsRef<str>>(rules: &[S]) -> RuleGraph {
    build_with_style(rules, &GraphStyle::default())
}

/// Builds the graph for `rules`, processed in order.
///
/// An empty rule list yields an empty graph.
pub fn build_with_style<S: AsRef<str>>(rules: &[S], style: &GraphStyle) -> RuleGraph {
    let parser = OutcomeParser::new();
    let mut graph = RuleGraph::default();
    let mut tracker = NodeTracker::default();

    for rule in rules {
        add_rule(&mut graph, &mut tracker, &parser, style, rule.as_ref());
    }
    graph.index = tracker.nodes;

    debug!(
        rules = rules.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Built rule graph"
    );
    graph
}

fn add_rule(
    graph: &mut RuleGraph,
    tracker: &mut NodeTracker,
    parser: &OutcomeParser,
    style: &GraphStyle,
    rule: &str,
) {
    let mut parts = rule.split(OUTCOME_ARROW);
    let conditions_text = parts.next().unwrap_or_default();
    let outcome_text = parts.next().unwrap_or_default().trim();

    let mut prev_node: Option<NodeIdentity> = None;
    for (level, condition) in conditions_text.split(CONDITION_SEPARATOR).enumerate() {
        let cleaned = clean_condition(condition);
        if cleaned.is_empty() {
            // Leaf directly under the root.
            continue;
        }
        let node_id = NodeIdentity::for_condition(&cleaned);

        if !tracker.contains(&node_id) {
            let index = graph.push_node(GraphNode {
                id: node_id.clone(),
                label: cleaned,
                kind: NodeKind::Condition,
                shape: NodeShape::Ellipse,
                fill_color: style.level_color(level).to_string(),
                level: Some(level),
            });
            tracker.record(node_id.clone(), index, Some(level));

            if let Some(prev) = &prev_node {
                graph.add_edge(prev.clone(), node_id.clone());
            }
        } else if let Some(&first_level) = tracker.level(&node_id) {
            if first_level != level {
                debug!(node = %node_id, first_level, level, "Condition reused at a different depth");
            }
        }
        prev_node = Some(node_id);
    }

    let final_label = parser.label(outcome_text);
    let outcome_id = NodeIdentity::for_outcome(&final_label);
    if !tracker.contains(&outcome_id) {
        let fill_color = style.outcome_color(&final_label).to_string();
        let index = graph.push_node(GraphNode {
            id: outcome_id.clone(),
            label: final_label,
            kind: NodeKind::Outcome,
            shape: NodeShape::Box,
            fill_color,
            level: None,
        });
        tracker.record(outcome_id.clone(), index, None);
    }

    if let Some(prev) = prev_node {
        graph.add_edge(prev, outcome_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeIdentity {
        NodeIdentity::normalize(s)
    }

    #[test]
    fn test_empty_rules_give_empty_graph() {
        let graph = build::<&str>(&[]);
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_shared_prefix_node() {
        let rules = [
            "(age <= 30.00) AND (smoker == 'yes') -> Clase: Si (n=[Si: 4, No: 0], 40.0%)",
            "(age <= 30.00) AND (smoker == 'no') -> Clase: No (n=[Si: 0, No: 1], 10.0%)",
        ];
        let graph = build(&rules);

        let age = id("age_<=_3000");
        assert!(graph.node(&age).is_some());
        assert_eq!(graph.nodes().iter().filter(|n| n.id == age).count(), 1);
        // age, smoker==yes, smoker==no, two outcomes
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_multiplicity(&age, &id("smoker_eq_yes")), 1);
        assert_eq!(graph.edge_multiplicity(&age, &id("smoker_eq_no")), 1);
    }

    #[test]
    fn test_two_outcomes_from_shared_condition() {
        let rules = [
            "(age <= 30.00) -> Clase: Yes (n=[Yes: 10, No: 0], 33.3%)",
            "(age <= 30.00) -> Clase: No (n=[Yes: 0, No: 20], 66.7%)",
        ];
        let graph = build(&rules);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);

        let outcomes: Vec<&GraphNode> =
            graph.nodes().iter().filter(|n| n.kind == NodeKind::Outcome).collect();
        assert_eq!(outcomes.len(), 2);
        for outcome in outcomes {
            assert_eq!(graph.edge_multiplicity(&id("age_<=_3000"), &outcome.id), 1);
        }
    }

    #[test]
    fn test_condition_colors_follow_position() {
        let rules = ["(a > 1.00) AND (b > 2.00) -> Clase: No"];
        let graph = build(&rules);
        let a = graph.node(&id("a_>_100")).unwrap();
        let b = graph.node(&id("b_>_200")).unwrap();
        assert_eq!(a.fill_color, "lightblue");
        assert_eq!(a.level, Some(0));
        assert_eq!(b.fill_color, "lightyellow");
        assert_eq!(b.level, Some(1));
    }

    #[test]
    fn test_existing_node_keeps_first_color_and_gets_no_new_edge() {
        // "(b > 2.00)" is created at level 1 under a, then met at level 0.
        let rules = [
            "(a > 1.00) AND (b > 2.00) -> Clase: No",
            "(b > 2.00) AND (c > 3.00) -> Clase: No",
            "(d > 4.00) AND (b > 2.00) -> Clase: Si",
        ];
        let graph = build(&rules);
        let b = id("b_>_200");
        assert_eq!(graph.node(&b).unwrap().level, Some(1));
        assert_eq!(graph.edge_multiplicity(&id("a_>_100"), &b), 1);
        // d → b is never drawn because b already existed.
        assert_eq!(graph.edge_multiplicity(&id("d_>_400"), &b), 0);
        // b → Si still is: outcome edges are added for every rule.
        assert_eq!(graph.edge_multiplicity(&b, &id("class_Si")), 1);
    }

    #[test]
    fn test_outcome_edges_are_not_deduplicated() {
        let rules = ["(a > 1.00) -> Clase: No", "(a > 1.00) -> Clase: No"];
        let graph = build(&rules);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_multiplicity(&id("a_>_100"), &id("class_No")), 2);
    }

    #[test]
    fn test_outcome_colors_and_shape() {
        let rules = [
            "(a > 1.00) -> Clase: Si (n=[Si: 3, No: 1], 40.0%)",
            "(a <= 1.00) -> Clase: No (n=[Si: 1, No: 5], 60.0%)",
        ];
        let graph = build(&rules);
        let si = graph.node(&id("class_SiSi3No1400")).unwrap();
        assert_eq!(si.label, "Si\n[Si: 3\nNo: 1]\n40.0%");
        assert_eq!(si.fill_color, "#ccffcc");
        assert_eq!(si.shape, NodeShape::Box);
        let no = graph.node(&id("class_NoSi1No5600")).unwrap();
        assert_eq!(no.fill_color, "#ffcccc");
    }

    #[test]
    fn test_root_only_rule_has_no_edges() {
        let graph = build(&["-> Clase: Yes (n=[Yes: 3, No: 1], 100.0%)"]);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.nodes()[0].kind, NodeKind::Outcome);
    }

    #[test]
    fn test_custom_style() {
        let style = GraphStyle {
            level_palette: vec!["red".into()],
            positive_outcome_color: "green".into(),
            negative_outcome_color: "gray".into(),
            positive_outcome_prefix: "Y".into(),
        };
        let graph = build_with_style(&["(a > 1.00) AND (b > 1.00) -> Clase: Yes"], &style);
        assert!(graph
            .nodes()
            .iter()
            .filter(|n| n.kind == NodeKind::Condition)
            .all(|n| n.fill_color == "red"));
        assert_eq!(graph.node(&id("class_Yes")).unwrap().fill_color, "green");
    }
}
