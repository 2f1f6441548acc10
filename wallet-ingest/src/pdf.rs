//! PDF text extraction.

use std::path::Path;
use tracing::debug;

use wallet_core::{Error, Result};

/// Extract the text of every page. Pages are separated by form feeds in the
/// extracted text; a document without them comes back as a single page.
pub fn extract_pages(path: &Path) -> Result<Vec<String>> {
    let text = pdf_extract::extract_text(path)
        .map_err(|e| Error::extraction(format!("cannot read PDF {}: {e}", path.display())))?;
    let pages = split_pages(&text);
    debug!(path = %path.display(), pages = pages.len(), "PDF text extracted");
    Ok(pages)
}

pub fn split_pages(text: &str) -> Vec<String> {
    text.split('\u{c}')
        .filter(|page| !page.trim().is_empty())
        .map(str::to_string)
        .collect()
}
