// PDF text source: body text via pdf-extract, metadata via the PDF Info
// dictionary (lopdf).
//
// Parsing runs on the blocking pool under a timeout. A corrupt file, a parser
// panic or a timeout all degrade to Extraction::Failed so the batch keeps
// going. Metadata problems are logged and yield empty metadata without
// failing the text extraction.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use lopdf::Object;
use tokio::task::JoinError;
use tracing::{debug, warn};

use super::corpus::has_extension;
use super::traits::{display_name, Extraction, Metadata, SourceDocument, TextSource};

/// Loads PDFs from disk with a per-document time limit.
pub struct PdfSource {
    timeout: Duration,
}

impl PdfSource {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl TextSource for PdfSource {
    fn accepts(&self, path: &Path) -> bool {
        has_extension(path, "pdf")
    }

    async fn load(&self, path: &Path) -> SourceDocument {
        let name = display_name(path);
        let owned = path.to_path_buf();
        let task = tokio::task::spawn_blocking(move || read_pdf(&owned));
        let (extraction, metadata) = within_deadline(self.timeout, task).await;

        if let Some(reason) = extraction.failure() {
            warn!(file = %name, reason, "Text extraction failed; treating as empty text");
        } else {
            debug!(
                file = %name,
                chars = extraction.text().len(),
                metadata_fields = metadata.len(),
                "Extracted PDF"
            );
        }

        SourceDocument {
            name,
            extraction,
            metadata,
        }
    }
}

/// Await a parse task, turning a timeout or an aborted task into a failure.
async fn within_deadline<F>(timeout: Duration, task: F) -> (Extraction, Metadata)
where
    F: Future<Output = Result<(Extraction, Metadata), JoinError>>,
{
    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(parsed)) => parsed,
        Ok(Err(join_error)) => (
            Extraction::Failed {
                reason: format!("PDF parser aborted: {join_error}"),
            },
            Metadata::new(),
        ),
        Err(_) => (
            Extraction::Failed {
                reason: format!("timed out after {timeout:?}"),
            },
            Metadata::new(),
        ),
    }
}

fn read_pdf(path: &Path) -> (Extraction, Metadata) {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            return (
                Extraction::Failed {
                    reason: format!("read failed: {e}"),
                },
                Metadata::new(),
            )
        }
    };

    let extraction = match pdf_extract::extract_text_from_mem(&bytes) {
        Ok(text) => Extraction::Text(text),
        Err(e) => Extraction::Failed {
            reason: e.to_string(),
        },
    };

    let metadata = read_info(&bytes).unwrap_or_else(|e| {
        warn!(file = %path.display(), error = %e, "Metadata extraction failed");
        Metadata::new()
    });

    (extraction, metadata)
}

/// Read string entries of the document Info dictionary.
fn read_info(bytes: &[u8]) -> Result<Metadata> {
    let doc = lopdf::Document::load_mem(bytes).context("Failed to parse PDF structure")?;

    let Ok(info) = doc.trailer.get(b"Info") else {
        return Ok(Metadata::new());
    };
    let dict = match info {
        Object::Reference(id) => doc
            .get_dictionary(*id)
            .context("Info entry does not point to a dictionary")?,
        Object::Dictionary(dict) => dict,
        _ => return Ok(Metadata::new()),
    };

    let mut metadata = Metadata::new();
    for (key, value) in dict.iter() {
        if let Object::String(raw, _) = value {
            let text = decode_pdf_string(raw);
            if !text.trim().is_empty() {
                metadata.insert(String::from_utf8_lossy(key).into_owned(), text);
            }
        }
    }
    Ok(metadata)
}

/// Decode a PDF text string: UTF-16BE with BOM, UTF-8 with BOM, otherwise
/// PDFDocEncoding (treated as Latin-1).
fn decode_pdf_string(raw: &[u8]) -> String {
    if let Some(body) = raw.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = body
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if let Some(body) = raw.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(body).into_owned();
    }
    raw.iter().map(|&b| b as char).collect()
}
