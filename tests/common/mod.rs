//! Shared fixtures for integration tests.

use httpmock::prelude::*;
use httpmock::Mock;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use pdf_chatbot::{EntityRecognizer, Embedder, Generator, Models, OllamaClient};

/// Build a PDF with one page per entry; an empty entry yields a page
/// without any text operators.
pub fn pdf_bytes(page_texts: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in page_texts {
        let mut operations = Vec::new();
        if !text.is_empty() {
            operations.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 11.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ]);
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_texts.len() as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Offline embedder and rule NER; generation goes to the mock server.
pub fn offline_models(server: &MockServer) -> Models {
    Models::new(
        Embedder::local(256),
        Generator::ollama(
            OllamaClient::with_url(&server.base_url()).unwrap(),
            "qwen2.5:3b",
        ),
        EntityRecognizer::rules("en").unwrap(),
    )
}

/// Generator stub that answers every prompt with `reply`.
pub fn mock_generation<'a>(server: &'a MockServer, reply: &str) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(POST).path("/api/generate");
        then.status(200)
            .json_body(serde_json::json!({ "response": reply }));
    })
}
