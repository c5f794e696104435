// Text source trait: the swap-ready seam between documents on disk and the
// keyword passes.
//
// Like the summarizer, this is async because the PDF implementation runs its
// parser on the blocking pool under a timeout. Tests use an in-memory source.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;

/// Key/value document metadata (title, subject, keywords, ...).
pub type Metadata = BTreeMap<String, String>;

/// Outcome of extracting one document's text.
///
/// A failure is kept distinct from successfully extracting an empty string,
/// even though both are matched as empty text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Text(String),
    Failed { reason: String },
}

impl Extraction {
    /// The extracted text, or "" for a failed extraction.
    pub fn text(&self) -> &str {
        match self {
            Extraction::Text(text) => text,
            Extraction::Failed { .. } => "",
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Extraction::Text(_) => None,
            Extraction::Failed { reason } => Some(reason),
        }
    }
}

/// One document for the duration of its processing pass.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// File name used in reports.
    pub name: String,
    pub extraction: Extraction,
    pub metadata: Metadata,
}

impl SourceDocument {
    /// Body text followed by every metadata value, space separated.
    pub fn combined_text(&self) -> String {
        let mut combined = self.extraction.text().to_string();
        for value in self.metadata.values() {
            if value.is_empty() {
                continue;
            }
            combined.push(' ');
            combined.push_str(value);
        }
        combined
    }
}

/// Trait for loading the text (and optional metadata) of one document.
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Whether this source handles the file (by extension, usually).
    fn accepts(&self, path: &Path) -> bool;

    /// Load a document. Never fails: problems become `Extraction::Failed`.
    async fn load(&self, path: &Path) -> SourceDocument;
}

/// File name of `path` for display, falling back to the full path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_extraction_reads_as_empty() {
        let failed = Extraction::Failed {
            reason: "corrupt xref".to_string(),
        };
        assert_eq!(failed.text(), "");
        assert_eq!(failed.failure(), Some("corrupt xref"));
        assert_eq!(Extraction::Text(String::new()).failure(), None);
    }

    #[test]
    fn test_combined_text_appends_metadata() {
        let mut metadata = Metadata::new();
        metadata.insert("Title".to_string(), "Global burned area".to_string());
        metadata.insert("Subject".to_string(), String::new());
        let doc = SourceDocument {
            name: "a.pdf".to_string(),
            extraction: Extraction::Text("body".to_string()),
            metadata,
        };
        assert_eq!(doc.combined_text(), "body Global burned area");
    }
}
