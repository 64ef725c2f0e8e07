use tracing::info;

use super::knowledge_graph::{KnowledgeGraph, Triple};
use super::ner::EntityRecognizer;
use crate::Result;

/// Link each entity to the next one: `[A, B, C]` gives `(A,B)` and `(B,C)`.
pub fn triples_from_entities(entities: &[String]) -> Vec<Triple> {
    entities
        .windows(2)
        .map(|pair| Triple::related(pair[0].as_str(), pair[1].as_str()))
        .collect()
}

/// Run NER over every text and chain its entities. Texts are independent;
/// no edge joins the last entity of one text to the first of the next.
pub async fn extract_triples<S: AsRef<str>>(
    texts: &[S],
    recognizer: &EntityRecognizer,
) -> Result<Vec<Triple>> {
    let mut triples = Vec::new();
    for text in texts {
        let entities = recognizer.recognize(text.as_ref()).await?;
        triples.extend(triples_from_entities(&entities));
    }
    Ok(triples)
}

/// Extract triples from all texts and merge them into one graph.
pub async fn build_graph<S: AsRef<str>>(
    texts: &[S],
    recognizer: &EntityRecognizer,
) -> Result<KnowledgeGraph> {
    let triples = extract_triples(texts, recognizer).await?;
    let graph = KnowledgeGraph::from_triples(&triples);

    info!(
        "Knowledge graph: {} nodes, {} edges from {} texts",
        graph.node_count(),
        graph.edge_count(),
        texts.len()
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RELATED_TO;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn chain_links_only_adjacent_entities() {
        let graph = KnowledgeGraph::from_triples(&triples_from_entities(&strings(&["A", "B", "C"])));

        assert!(graph.contains_edge("A", "B"));
        assert!(graph.contains_edge("B", "C"));
        assert!(!graph.contains_edge("A", "C"));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn triples_use_related_to() {
        let triples = triples_from_entities(&strings(&["A", "B"]));
        assert_eq!(triples, vec![Triple::related("A", "B")]);
        assert_eq!(triples[0].relation, RELATED_TO);
    }

    #[test]
    fn fewer_than_two_entities_give_no_triples() {
        assert!(triples_from_entities(&strings(&["A"])).is_empty());
        assert!(triples_from_entities(&[]).is_empty());
    }

    #[tokio::test]
    async fn shared_entity_merges_across_texts() {
        let ner = EntityRecognizer::rules("en").unwrap();
        let texts = ["Alice met Bob", "Bob visited Carol"];

        let graph = build_graph(&texts, &ner).await.unwrap();

        assert_eq!(graph.node_count(), 3);
        assert!(graph.contains_edge("Alice", "Bob"));
        assert!(graph.contains_edge("Bob", "Carol"));
        assert_eq!(graph.neighbors("Bob"), vec!["Alice", "Carol"]);
    }

    #[tokio::test]
    async fn texts_are_not_chained_together() {
        let ner = EntityRecognizer::rules("en").unwrap();
        let texts = ["Alice", "Bob"];

        let triples = extract_triples(&texts, &ner).await.unwrap();

        assert!(triples.is_empty());
    }

    #[tokio::test]
    async fn empty_texts_give_empty_graph() {
        let ner = EntityRecognizer::rules("en").unwrap();
        let texts: Vec<String> = vec![String::new(), "   ".to_string(), "no names here".to_string()];

        let graph = build_graph(&texts, &ner).await.unwrap();

        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }
}
