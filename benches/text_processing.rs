use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pdf_chatbot::graph::{triples_from_entities, KnowledgeGraph, RuleRecognizer};
use pdf_chatbot::rag::{Chunker, LocalEmbedder};

fn chunker_benchmark(c: &mut Criterion) {
    let chunker = Chunker::default();
    let text = "Retrieval augmented generation splits each page into overlapping windows. \
        Paragraphs are kept together when they fit.\n\n"
        .repeat(200);

    c.bench_function("chunker_split_long_page", |b| {
        b.iter(|| {
            let chunks = chunker.chunk(black_box(text.as_str()), "bench#page=1");
            black_box(chunks.len());
        });
    });
}

fn recognizer_benchmark(c: &mut Criterion) {
    let recognizer = RuleRecognizer::new("en").expect("english rules");
    let text = "Ada Lovelace wrote notes on the Analytical Engine for Charles Babbage \
        in London while the Royal Society met in 1843."
        .repeat(32);

    c.bench_function("rule_ner_dense_text", |b| {
        b.iter(|| {
            let entities = recognizer.recognize(black_box(&text));
            black_box(entities.len());
        });
    });
}

fn graph_benchmark(c: &mut Criterion) {
    let entities: Vec<String> = (0..2_000).map(|i| format!("Entity{}", i % 300)).collect();

    c.bench_function("graph_from_chain", |b| {
        b.iter(|| {
            let graph = KnowledgeGraph::from_triples(&triples_from_entities(black_box(&entities)));
            black_box((graph.node_count(), graph.edge_count()));
        });
    });
}

fn embedder_benchmark(c: &mut Criterion) {
    let embedder = LocalEmbedder::new(384);
    let text = "hashed bag of words embedding for offline retrieval ".repeat(16);

    c.bench_function("local_embedder_chunk", |b| {
        b.iter(|| black_box(embedder.embed(black_box(&text))));
    });
}

criterion_group!(
    benches,
    chunker_benchmark,
    recognizer_benchmark,
    graph_benchmark,
    embedder_benchmark
);
criterion_main!(benches);
