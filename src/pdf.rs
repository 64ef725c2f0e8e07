//! PDF text extraction.
//!
//! Every uploaded file becomes a list of page texts. Pages without a text
//! layer (scanned images) come back as empty strings and are kept, so the
//! number of page texts always equals the number of pages.

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{Error, Result};

/// One uploaded PDF: a display name plus its raw bytes.
#[derive(Debug, Clone)]
pub struct PdfSource {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl PdfSource {
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a PDF from disk; the file name becomes the source label.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document.pdf")
            .to_string();
        Ok(Self { name, bytes })
    }
}

/// Text of a single page, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// File label (`PdfSource::name`)
    pub source: String,
    /// 1-based page number inside the file
    pub page: usize,
    pub text: String,
}

impl PageText {
    /// Opaque source label attached to chunks.
    pub fn label(&self) -> String {
        format!("{}#page={}", self.source, self.page)
    }
}

/// Extract one string per page from a single PDF.
///
/// A corrupt or unreadable file is an error for the whole file; there is no
/// partial recovery.
pub fn extract_pages(source: &PdfSource) -> Result<Vec<String>> {
    let bytes = source.bytes.as_slice();
    // pdf-extract panics on some malformed inputs instead of returning Err
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }));

    match outcome {
        Ok(Ok(pages)) => {
            debug!("{}: extracted {} pages", source.name, pages.len());
            Ok(pages)
        }
        Ok(Err(err)) => Err(Error::Pdf(format!("{}: {:?}", source.name, err))),
        Err(_) => Err(Error::Pdf(format!(
            "{}: parser aborted on malformed document",
            source.name
        ))),
    }
}

/// Extract page texts from all files, in file-then-page order.
///
/// The first failing file aborts the whole batch.
pub fn extract_texts(sources: &[PdfSource]) -> Result<Vec<PageText>> {
    let mut texts = Vec::new();

    for source in sources {
        let pages = extract_pages(source)?;
        let empty = pages.iter().filter(|p| p.trim().is_empty()).count();
        if empty > 0 {
            debug!("{}: {} pages without a text layer", source.name, empty);
        }

        texts.extend(pages.into_iter().enumerate().map(|(idx, text)| PageText {
            source: source.name.clone(),
            page: idx + 1,
            text,
        }));
    }

    info!(
        "Extracted {} pages from {} PDF files",
        texts.len(),
        sources.len()
    );
    Ok(texts)
}

/// Expand CLI inputs: files are kept as given, directories are walked for
/// `*.pdf` files (sorted by name).
pub fn collect_pdf_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry.map_err(|e| Error::Io(e.into()))?;
                if entry.file_type().is_file() && is_pdf(entry.path()) {
                    paths.push(entry.into_path());
                }
            }
        } else if input.is_file() {
            paths.push(input.clone());
        } else {
            return Err(Error::InvalidArgument(format!(
                "PDF path does not exist: {}",
                input.display()
            )));
        }
    }

    Ok(paths)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}
