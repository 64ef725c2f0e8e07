//! Загрузчик шаблонов промптов из файлов.
//!
//! Шаблоны хранятся в каталоге `prompts/` в корне проекта. Если файла нет,
//! используется встроенный шаблон.

use std::path::PathBuf;

use tracing::debug;

use crate::{Error, Result};

/// Встроенный шаблон ответа по контексту.
pub const ANSWER_TEMPLATE: &str = "Answer ONLY from the context below.
If not found, say \"Answer not found in the documents.\"

Context:
{context}

Question:
{question}

Answer:";

/// Встроенный шаблон извлечения сущностей через LLM.
pub const ENTITIES_TEMPLATE: &str = "List the named entities (people, organizations, places, products, dates) \
that appear in the text below, in the order they appear. Keep repeats. \
The text language is \"{language}\". Copy each entity exactly as written.
Respond with a JSON array of strings only.

Text:
{text}";

/// Доступные промпты.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// Ответ строго по найденным фрагментам.
    Answer,
    /// Список сущностей для графа.
    Entities,
}

impl Prompt {
    /// Имя файла промпта (Markdown).
    pub fn filename(&self) -> &'static str {
        match self {
            Prompt::Answer => "answer.md",
            Prompt::Entities => "entities.md",
        }
    }

    pub fn default_template(&self) -> &'static str {
        match self {
            Prompt::Answer => ANSWER_TEMPLATE,
            Prompt::Entities => ENTITIES_TEMPLATE,
        }
    }

    /// Загрузить промпт из файла.
    pub fn load(&self) -> Result<String> {
        load_prompt(self.filename())
    }

    /// Шаблон из файла, либо встроенный.
    pub fn template(&self) -> String {
        match self.load() {
            Ok(template) => template,
            Err(err) => {
                debug!("{}; using built-in template", err);
                self.default_template().to_string()
            }
        }
    }
}

/// Загрузить промпт по имени файла.
pub fn load_prompt(filename: &str) -> Result<String> {
    let path = prompts_dir().join(filename);
    let content = std::fs::read_to_string(&path).map_err(|e| {
        Error::InvalidArgument(format!("Не удалось загрузить промпт {}: {}", filename, e))
    })?;
    Ok(content.trim_end().to_string())
}

/// Путь к каталогу промптов.
pub fn prompts_dir() -> PathBuf {
    // Ищем prompts/ относительно текущей директории или родительской
    let candidates = [
        PathBuf::from("prompts"),
        PathBuf::from("../prompts"),
        PathBuf::from("../../prompts"),
    ];

    for path in candidates {
        if path.exists() {
            return path;
        }
    }

    PathBuf::from("prompts")
}

/// Список всех доступных промптов.
pub fn list_prompts() -> Vec<Prompt> {
    vec![Prompt::Answer, Prompt::Entities]
}

/// Подставить `{name}` за один проход.
///
/// Подставленный текст повторно не разбирается, поэтому фигурные скобки
/// внутри документов остаются как есть. Неизвестные плейсхолдеры не трогаем.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Промпт ответа: контекст и вопрос.
pub fn render_answer_prompt(template: &str, context: &str, question: &str) -> String {
    render(template, &[("context", context), ("question", question)])
}
