//! Dump extracted page texts (no models involved).

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::read_sources;
use crate::pdf::{extract_texts, PageText};

pub fn run(pdfs: &[PathBuf], max_chars: Option<usize>) -> Result<()> {
    let sources = read_sources(pdfs)?;
    let pages = extract_texts(&sources).context("failed to extract text")?;

    for page in &pages {
        print!("{}", format_page(page, max_chars));
    }
    println!("{} pages", pages.len());
    Ok(())
}

pub fn format_page(page: &PageText, max_chars: Option<usize>) -> String {
    let text = page.text.trim();
    let body = if text.is_empty() {
        "(no text layer)".to_string()
    } else {
        match max_chars {
            Some(limit) if text.chars().count() > limit => {
                format!("{}…", text.chars().take(limit).collect::<String>())
            }
            _ => text.to_string(),
        }
    };
    format!("=== {} ===\n{}\n\n", page.label(), body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(text: &str) -> PageText {
        PageText {
            source: "doc.pdf".to_string(),
            page: 3,
            text: text.to_string(),
        }
    }

    #[test]
    fn empty_page_is_marked() {
        assert_eq!(
            format_page(&page("  "), None),
            "=== doc.pdf#page=3 ===\n(no text layer)\n\n"
        );
    }

    #[test]
    fn long_page_is_truncated_by_chars() {
        let out = format_page(&page("абвгдеж"), Some(3));
        assert!(out.contains("\nабв…\n"));
    }
}
