// Summarizer trait: the external summarization collaborator.
//
// The summaries run forwards a whole document to a summarization service
// and stores whatever string comes back. Nothing about the algorithm lives
// here; the trait only makes the service swappable (HTTP today, a fake in
// tests).

use anyhow::Result;
use async_trait::async_trait;

/// Stored in place of a summary when the service call fails or is skipped.
pub const ANALYSIS_FAILED: &str = "LLM analysis failed.";

/// Trait for summarizing document text. Async because providers are remote.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize one document's text.
    async fn summarize(&self, text: &str) -> Result<String>;
}

/// Summarize `text`, degrading any failure to the `ANALYSIS_FAILED` sentinel.
///
/// Empty text never reaches the service.
pub async fn summarize_or_sentinel(summarizer: &dyn Summarizer, file: &str, text: &str) -> String {
    if text.trim().is_empty() {
        tracing::warn!(file, "No text to summarize");
        return ANALYSIS_FAILED.to_string();
    }
    match summarizer.summarize(text).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::warn!(file, error = %e, "Summarization failed");
            ANALYSIS_FAILED.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait]
    impl Summarizer for Failing {
        async fn summarize(&self, _text: &str) -> Result<String> {
            anyhow::bail!("service unavailable")
        }
    }

    struct Echo;

    #[async_trait]
    impl Summarizer for Echo {
        async fn summarize(&self, text: &str) -> Result<String> {
            Ok(format!("summary of {} chars", text.len()))
        }
    }

    #[tokio::test]
    async fn test_failure_becomes_sentinel() {
        let out = summarize_or_sentinel(&Failing, "a.pdf", "some text").await;
        assert_eq!(out, ANALYSIS_FAILED);
    }

    #[tokio::test]
    async fn test_empty_text_skips_service() {
        let out = summarize_or_sentinel(&Echo, "a.pdf", "   ").await;
        assert_eq!(out, ANALYSIS_FAILED);
    }

    #[tokio::test]
    async fn test_summary_is_stored_verbatim() {
        let out = summarize_or_sentinel(&Echo, "a.pdf", "abcd").await;
        assert_eq!(out, "summary of 4 chars");
    }
}
