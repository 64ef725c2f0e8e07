//! Check that configured model services are reachable.

use anyhow::Result;

use crate::config::{Config, EmbeddingBackendKind, GenerationBackendKind, NerBackendKind};
use crate::integrations::OllamaClient;

pub async fn run(config: &Config) -> Result<()> {
    let report = check(config).await?;
    for line in &report.lines {
        println!("{}", line);
    }
    if !report.ok {
        anyhow::bail!("some configured models are not available");
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct Report {
    pub ok: bool,
    pub lines: Vec<String>,
}

/// Models the configuration expects Ollama to serve.
fn required_ollama_models(config: &Config) -> Vec<&str> {
    let mut models = Vec::new();
    if config.embedding_backend == EmbeddingBackendKind::Ollama {
        models.push(config.embedding_model.as_str());
    }
    if config.generation_backend == GenerationBackendKind::Ollama {
        models.push(config.generation_model.as_str());
    }
    if config.ner_backend == NerBackendKind::Ollama {
        models.push(config.ner_model.as_str());
    }
    models.sort_unstable();
    models.dedup();
    models
}

pub async fn check(config: &Config) -> Result<Report> {
    let mut report = Report {
        ok: true,
        lines: Vec::new(),
    };

    let required = required_ollama_models(config);
    if required.is_empty() {
        report.lines.push("Ollama: not used".to_string());
    } else {
        let client = OllamaClient::with_url(&config.ollama_url)?;
        if !client.is_running().await {
            report.ok = false;
            report
                .lines
                .push(format!("Ollama: not reachable at {}", client.base_url()));
            return Ok(report);
        }

        let available = client.list_models().await?;
        for model in required {
            // Ollama reports `name:tag`; an untagged name means `:latest`
            let found = available
                .iter()
                .any(|m| m == model || m.strip_suffix(":latest") == Some(model));
            if !found {
                report.ok = false;
            }
            report.lines.push(format!(
                "Ollama model {}: {}",
                model,
                if found { "ok" } else { "missing (ollama pull)" }
            ));
        }
    }

    let needs_openai = config.embedding_backend == EmbeddingBackendKind::OpenAI
        || config.generation_backend == GenerationBackendKind::OpenAI;
    if needs_openai {
        let has_key = config.openai_api_key.is_some();
        report.ok &= has_key;
        report.lines.push(format!(
            "OpenAI key: {}",
            if has_key { "set" } else { "missing" }
        ));
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn config_for(server: &MockServer) -> Config {
        let mut config = Config::defaults();
        config.ollama_url = server.base_url();
        config
    }

    #[tokio::test]
    async fn reports_missing_model() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/tags");
            then.status(200)
                .json_body(json!({ "models": [{ "name": "all-minilm:latest" }] }));
        });

        let report = check(&config_for(&server)).await.unwrap();

        assert!(!report.ok);
        assert!(report.lines.contains(&"Ollama model all-minilm: ok".to_string()));
        assert!(report
            .lines
            .iter()
            .any(|l| l.starts_with("Ollama model qwen2.5:3b: missing")));
    }

    #[tokio::test]
    async fn all_models_present_is_ok() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/tags");
            then.status(200).json_body(json!({
                "models": [{ "name": "all-minilm:latest" }, { "name": "qwen2.5:3b" }]
            }));
        });

        let report = check(&config_for(&server)).await.unwrap();
        assert!(report.ok);
    }

    #[tokio::test]
    async fn local_only_setup_skips_ollama() {
        let mut config = Config::defaults();
        config.embedding_backend = EmbeddingBackendKind::Local;
        config.generation_backend = GenerationBackendKind::OpenAI;
        config.openai_api_key = None;

        let report = check(&config).await.unwrap();

        assert!(!report.ok);
        assert_eq!(report.lines, vec!["Ollama: not used", "OpenAI key: missing"]);
    }

    #[test]
    fn shared_model_is_listed_once() {
        let mut config = Config::defaults();
        config.ner_backend = NerBackendKind::Ollama;
        config.embedding_model = "qwen2.5:3b".to_string();
        config.generation_model = "llama3.2".to_string();
        config.ner_model = "qwen2.5:3b".to_string();

        assert_eq!(required_ollama_models(&config), vec!["llama3.2", "qwen2.5:3b"]);
    }
}
