// PDF → plain text for the scoreboard parser.
// Two extractors are tried in turn; callers that must not fail use
// `safe_extract_text`, which degrades to an empty string.

use anyhow::{anyhow, Context};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("PDF load error: {0}")]
    Load(#[from] lopdf::Error),

    #[error("PDF has no pages")]
    NoPages,

    #[error("No page text could be extracted ({failed} of {pages} pages failed)")]
    NoText { pages: usize, failed: usize },
}

/// Returns true if the bytes start with the `%PDF-` signature.
pub fn is_pdf(head: &[u8]) -> bool {
    head.starts_with(b"%PDF-")
}

/// Primary extractor: the `pdf-extract` crate over in-memory bytes.
/// Panics raised inside the extractor on malformed files are reported as errors.
pub fn extract_text_from_pdf_mem(bytes: &[u8]) -> anyhow::Result<String> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)))
        .map_err(|_| anyhow!("pdf-extract panicked while reading the document"))?;
    let text = outcome.context("failed to extract text from PDF bytes using pdf-extract")?;
    Ok(text)
}

/// Secondary extractor: page-by-page text through `lopdf`.
/// Pages that fail are skipped; the call fails only if every page does.
pub fn extract_text_fallback(bytes: &[u8]) -> Result<String, ExtractError> {
    let document = lopdf::Document::load_mem(bytes)?;
    let pages: Vec<u32> = document.get_pages().keys().copied().collect();
    if pages.is_empty() {
        return Err(ExtractError::NoPages);
    }

    let mut out = Vec::with_capacity(pages.len());
    let mut failed = 0usize;
    for page in &pages {
        match document.extract_text(&[*page]) {
            Ok(text) => out.push(text),
            Err(e) => {
                warn!(target: "pdf", page = *page, "lopdf page extraction failed: {}", e);
                failed += 1;
            }
        }
    }

    if out.is_empty() {
        return Err(ExtractError::NoText {
            pages: pages.len(),
            failed,
        });
    }
    Ok(out.join("\n"))
}

/// Extracts text with the primary extractor, then the fallback, and finally
/// gives up with an empty string. Never fails; an empty string tells the caller
/// nothing usable came out of the file.
pub fn safe_extract_text(bytes: &[u8]) -> String {
    let started = Instant::now();
    match extract_text_from_pdf_mem(bytes) {
        Ok(text) => {
            info!(target: "pdf", size = bytes.len(), elapsed_ms = started.elapsed().as_millis() as u64, "PDF extraction succeeded");
            return text;
        }
        Err(e) => warn!(target: "pdf", "pdf-extract failed; falling back to lopdf: {:#}", e),
    }

    match extract_text_fallback(bytes) {
        Ok(text) => {
            info!(target: "pdf", size = bytes.len(), elapsed_ms = started.elapsed().as_millis() as u64, "Fallback PDF extraction succeeded");
            text
        }
        Err(e) => {
            error!(target: "pdf", "lopdf also failed: {}", e);
            String::new()
        }
    }
}
