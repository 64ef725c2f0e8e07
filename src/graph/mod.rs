//! Entity co-occurrence graph.
//!
//! Each text is run through NER and every entity is linked to the one that
//! follows it with an undirected `related_to` edge. Edges from all texts are
//! merged into a single simple graph.

pub mod builder;
pub mod knowledge_graph;
pub mod ner;

pub use builder::{build_graph, extract_triples, triples_from_entities};
pub use knowledge_graph::{Edge, KnowledgeGraph, Triple, RELATED_TO};
pub use ner::{EntityRecognizer, RuleRecognizer};
