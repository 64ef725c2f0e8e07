use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;

use crate::Result;

/// The only relation the builder emits.
pub const RELATED_TO: &str = "related_to";

/// `(subject, relation, object)` produced per text before graph assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Triple {
    pub subject: String,
    pub relation: String,
    pub object: String,
}

impl Triple {
    pub fn related(subject: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            relation: RELATED_TO.to_string(),
            object: object.into(),
        }
    }
}

/// Undirected edge; `from`/`to` keep the order of the last insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub relation: String,
}

/// Simple undirected graph of entity strings.
///
/// Node identity is the exact string. Re-adding an edge overwrites it, loops
/// are allowed. Nodes and edges iterate in first-insertion order.
#[derive(Debug, Default, Clone)]
pub struct KnowledgeGraph {
    nodes: Vec<String>,
    node_index: HashMap<String, usize>,
    edges: Vec<Edge>,
    edge_index: HashMap<(String, String), usize>,
}

#[derive(Serialize)]
struct GraphJson<'a> {
    nodes: &'a [String],
    edges: &'a [Edge],
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_triples(triples: &[Triple]) -> Self {
        let mut graph = Self::new();
        for triple in triples {
            graph.add_triple(triple);
        }
        graph
    }

    pub fn add_triple(&mut self, triple: &Triple) {
        self.add_edge(&triple.subject, &triple.object, &triple.relation);
    }

    pub fn add_node(&mut self, name: &str) {
        if !self.node_index.contains_key(name) {
            self.node_index.insert(name.to_string(), self.nodes.len());
            self.nodes.push(name.to_string());
        }
    }

    pub fn add_edge(&mut self, a: &str, b: &str, relation: &str) {
        self.add_node(a);
        self.add_node(b);

        let edge = Edge {
            from: a.to_string(),
            to: b.to_string(),
            relation: relation.to_string(),
        };
        let key = ordered(a.to_string(), b.to_string());
        match self.edge_index.get(&key).copied() {
            Some(idx) => self.edges[idx] = edge,
            None => {
                self.edge_index.insert(key, self.edges.len());
                self.edges.push(edge);
            }
        }
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

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.node_index.contains_key(name)
    }

    /// Order-insensitive edge lookup.
    pub fn contains_edge(&self, a: &str, b: &str) -> bool {
        self.edge_index
            .contains_key(&ordered(a.to_string(), b.to_string()))
    }

    /// Adjacent nodes in edge insertion order.
    pub fn neighbors(&self, name: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter_map(|edge| {
                if edge.from == name {
                    Some(edge.to.as_str())
                } else if edge.to == name {
                    Some(edge.from.as_str())
                } else {
                    None
                }
            })
            .collect()
    }

    /// Undirected Graphviz graph with spring layout and labeled edges.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("graph knowledge {\n");
        out.push_str("    layout=neato;\n");
        out.push_str("    overlap=false;\n");
        out.push_str("    node [shape=ellipse, fontsize=8, width=0.7];\n");
        out.push_str("    edge [fontsize=8];\n");

        for node in &self.nodes {
            out.push_str(&format!("    {};\n", dot_quote(node)));
        }
        for edge in &self.edges {
            out.push_str(&format!(
                "    {} -- {} [label={}];\n",
                dot_quote(&edge.from),
                dot_quote(&edge.to),
                dot_quote(&edge.relation)
            ));
        }

        out.push_str("}\n");
        out
    }

    pub fn to_json(&self) -> Result<String> {
        let json = GraphJson {
            nodes: &self.nodes,
            edges: &self.edges,
        };
        Ok(serde_json::to_string_pretty(&json)?)
    }

    /// Write `subject,relation,object` rows with a header.
    pub fn write_csv_triples<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["subject", "relation", "object"])?;
        for edge in &self.edges {
            csv.write_record([&edge.from, &edge.relation, &edge.to])?;
        }
        csv.flush()?;
        Ok(())
    }
}

fn ordered(a: String, b: String) -> (String, String) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn dot_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_undirected_and_overwrite() {
        let mut graph = KnowledgeGraph::new();
        graph.add_edge("Alice", "Bob", RELATED_TO);
        graph.add_edge("Bob", "Alice", RELATED_TO);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.contains_edge("Alice", "Bob"));
        assert!(graph.contains_edge("Bob", "Alice"));
        assert_eq!(graph.edges()[0].from, "Bob");
    }

    #[test]
    fn node_identity_is_exact_string() {
        let graph = KnowledgeGraph::from_triples(&[
            Triple::related("Paris", "paris"),
            Triple::related("Paris ", "Paris"),
        ]);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn self_pair_is_a_loop() {
        let graph = KnowledgeGraph::from_triples(&[Triple::related("Bob", "Bob")]);

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.contains_edge("Bob", "Bob"));
        assert_eq!(graph.neighbors("Bob"), vec!["Bob"]);
    }

    #[test]
    fn neighbors_follow_edges_both_ways() {
        let graph = KnowledgeGraph::from_triples(&[
            Triple::related("A", "B"),
            Triple::related("C", "B"),
        ]);

        assert_eq!(graph.neighbors("B"), vec!["A", "C"]);
        assert!(graph.neighbors("Z").is_empty());
    }

    #[test]
    fn dot_output_is_undirected_with_labels() {
        let graph = KnowledgeGraph::from_triples(&[Triple::related("Ada \"the\" Countess", "London")]);
        let dot = graph.to_dot();

        assert!(dot.starts_with("graph knowledge {"));
        assert!(dot.contains("layout=neato;"));
        assert!(dot.contains("fontsize=8"));
        assert!(dot.contains(r#""Ada \"the\" Countess" -- "London" [label="related_to"];"#));
    }

    #[test]
    fn json_output_lists_nodes_and_edges() {
        let graph = KnowledgeGraph::from_triples(&[Triple::related("A", "B")]);
        let value: serde_json::Value = serde_json::from_str(&graph.to_json().unwrap()).unwrap();

        assert_eq!(value["nodes"], serde_json::json!(["A", "B"]));
        assert_eq!(value["edges"][0]["relation"], "related_to");
    }

    #[test]
    fn csv_triples_have_header_and_rows() {
        let graph = KnowledgeGraph::from_triples(&[
            Triple::related("A", "B"),
            Triple::related("B", "C, Inc."),
        ]);

        let mut buffer = Vec::new();
        graph.write_csv_triples(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(
            text,
            "subject,relation,object\nA,related_to,B\nB,related_to,\"C, Inc.\"\n"
        );
    }

    #[test]
    fn empty_graph_renders() {
        let graph = KnowledgeGraph::new();

        assert!(graph.is_empty());
        assert_eq!(graph.to_dot().lines().last(), Some("}"));
        let value: serde_json::Value = serde_json::from_str(&graph.to_json().unwrap()).unwrap();
        assert_eq!(value["edges"], serde_json::json!([]));
    }
}
