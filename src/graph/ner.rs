use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::integrations::OllamaClient;
use crate::prompts::{render, Prompt};
use crate::{Error, Result};

/// Opening bracket of a string array (or an empty one).
static ARRAY_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\[\s*(?:"|\])"#).expect("Invalid entity array regex"));

const EN_STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "he", "her", "his",
    "i", "if", "in", "into", "is", "it", "its", "my", "no", "not", "of", "on", "or", "our", "she",
    "so", "that", "the", "their", "then", "there", "these", "they", "this", "to", "was", "we",
    "were", "what", "when", "where", "which", "who", "why", "with", "you", "your",
];

const RU_STOPWORDS: &[&str] = &[
    "а", "без", "в", "во", "все", "да", "для", "до", "если", "же", "за", "и", "из", "или", "как",
    "к", "ко", "на", "над", "не", "но", "о", "об", "он", "она", "они", "от", "по", "под", "при",
    "про", "с", "со", "так", "то", "у", "что", "это", "эти", "я",
];

/// Named entity recognizer. Returns surface strings in document order,
/// repeats included.
#[derive(Debug, Clone)]
pub enum EntityRecognizer {
    Rules(RuleRecognizer),
    Ollama {
        client: OllamaClient,
        model: String,
        language: String,
        template: String,
    },
}

impl EntityRecognizer {
    pub fn rules(language: &str) -> Result<Self> {
        Ok(Self::Rules(RuleRecognizer::new(language)?))
    }

    pub fn ollama(client: OllamaClient, model: impl Into<String>, language: impl Into<String>) -> Self {
        Self::Ollama {
            client,
            model: model.into(),
            language: language.into(),
            template: Prompt::Entities.default_template().to_string(),
        }
    }

    /// Replace the entity prompt; no-op for the rule recognizer.
    pub fn with_template(mut self, new_template: impl Into<String>) -> Self {
        if let Self::Ollama { template, .. } = &mut self {
            *template = new_template.into();
        }
        self
    }

    pub async fn recognize(&self, text: &str) -> Result<Vec<String>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        match self {
            EntityRecognizer::Rules(rules) => Ok(rules.recognize(text)),
            EntityRecognizer::Ollama {
                client,
                model,
                language,
                template,
            } => {
                let prompt = render(
                    template,
                    &[("language", language.as_str()), ("text", text)],
                );
                let reply = client
                    .generate(&prompt, model, 0.0, 512)
                    .await
                    .map_err(|e| Error::Ner(e.to_string()))?;
                parse_entity_list(&reply)
            }
        }
    }
}

/// Offline recognizer based on capitalization.
///
/// An entity is a maximal run of capitalized tokens, or a single handle,
/// hashtag or token containing digits. Punctuation ends a run.
#[derive(Debug, Clone)]
pub struct RuleRecognizer {
    language: String,
    stopwords: HashSet<&'static str>,
}

impl RuleRecognizer {
    pub fn new(language: &str) -> Result<Self> {
        let language = language.trim().to_lowercase();
        let words = match language.as_str() {
            "en" => EN_STOPWORDS,
            "ru" => RU_STOPWORDS,
            other => {
                return Err(Error::Config(format!(
                    "no NER rules for language '{}'",
                    other
                )))
            }
        };

        Ok(Self {
            language,
            stopwords: words.iter().copied().collect(),
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn recognize(&self, text: &str) -> Vec<String> {
        let mut entities = Vec::new();
        let mut run: Vec<&str> = Vec::new();

        for raw in text.split_whitespace() {
            let token =
                raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '@' && c != '#');
            let ends_run = raw
                .chars()
                .last()
                .map(|c| matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | ')' | '"'))
                .unwrap_or(false);

            if self.is_name_part(token) {
                run.push(token);
            } else {
                flush(&mut run, &mut entities);
                if self.is_tagged(token) {
                    entities.push(token.to_string());
                }
            }

            if ends_run {
                flush(&mut run, &mut entities);
            }
        }
        flush(&mut run, &mut entities);

        debug!("Rule NER found {} entities", entities.len());
        entities
    }

    fn is_name_part(&self, token: &str) -> bool {
        token.chars().count() >= 2
            && token.chars().next().map(char::is_uppercase).unwrap_or(false)
            && token.chars().all(|c| c.is_alphabetic() || c == '-' || c == '\'')
            && !self.stopwords.contains(token.to_lowercase().as_str())
    }

    fn is_tagged(&self, token: &str) -> bool {
        token.chars().count() >= 2
            && (token.starts_with('@')
                || token.starts_with('#')
                || token.chars().any(|c| c.is_ascii_digit()))
    }
}

fn flush(run: &mut Vec<&str>, entities: &mut Vec<String>) {
    if !run.is_empty() {
        entities.push(run.join(" "));
        run.clear();
    }
}

/// Pull the first JSON array of strings out of a model reply.
///
/// Anything after the array, including other bracketed text, is ignored.
fn parse_entity_list(reply: &str) -> Result<Vec<String>> {
    let Some(found) = ARRAY_START.find(reply) else {
        warn!("NER reply has no JSON array: {}", reply);
        return Err(Error::Ner("model reply has no JSON array".to_string()));
    };

    let values = serde_json::Deserializer::from_str(&reply[found.start()..])
        .into_iter::<Vec<serde_json::Value>>()
        .next()
        .ok_or_else(|| Error::Ner("model reply has no JSON array".to_string()))?
        .map_err(|e| Error::Ner(format!("invalid entity list: {}", e)))?;

    Ok(values
        .into_iter()
        .filter_map(|v| match v {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
        .collect())
}
