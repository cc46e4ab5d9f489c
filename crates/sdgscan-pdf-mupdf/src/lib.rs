use std::path::Path;

use mupdf::{Document, TextPageFlags};

use sdgscan_core::{BackendError, PdfBackend};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate isolates the AGPL-3.0 mupdf dependency from the rest of the
/// workspace.
///
/// Each page is rendered as its text lines in reading order, every line
/// terminated by `\n`; pages are joined with `\n`, so a page break shows up
/// as a blank line.
#[derive(Debug, Clone, Default)]
pub struct MupdfBackend {
    /// Stop after this many pages. `None` reads the whole document.
    page_limit: Option<usize>,
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only read the first `pages` pages. Pass `0` to read everything.
    pub fn with_page_limit(mut self, pages: usize) -> Self {
        self.page_limit = (pages > 0).then_some(pages);
        self
    }
}

impl PdfBackend for MupdfBackend {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let limit = self.page_limit.unwrap_or(usize::MAX);
        let mut pages_text = Vec::new();

        for page_result in document
            .pages()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?
            .take(limit)
        {
            let page = page_result.map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

            let mut page_text = String::new();
            for block in text_page.blocks() {
                for line in block.lines() {
                    page_text.extend(line.chars().map(|c| c.char().unwrap_or('\u{FFFD}')));
                    page_text.push('\n');
                }
            }
            pages_text.push(page_text);
        }

        tracing::debug!(
            path = %path.display(),
            pages = pages_text.len(),
            "pdf text extracted"
        );
        Ok(pages_text.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_open_error() {
        let err = MupdfBackend::new()
            .extract_text(Path::new("/nonexistent/definitely-missing.pdf"))
            .unwrap_err();
        assert!(matches!(err, BackendError::OpenError(_)), "got {err:?}");
    }

    #[test]
    fn zero_page_limit_reads_everything() {
        assert_eq!(MupdfBackend::new().with_page_limit(0).page_limit, None);
        assert_eq!(MupdfBackend::new().with_page_limit(2).page_limit, Some(2));
    }
}
