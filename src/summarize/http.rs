// HTTP summarizer: hosted inference endpoint (Hugging Face style).
//
// Sends the document text with fixed length bounds and returns the first
// `summary_text` in the response. Every call is paced by the rate limiter and
// bounded by the client timeout. There are no retries; a failure is reported
// to the caller, who stores the failure sentinel for that document only.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rate_limiter::RateLimiter;
use super::traits::Summarizer;
use crate::output::truncate_chars;

/// Default endpoint: BART fine-tuned on CNN/DailyMail.
pub const DEFAULT_SUMMARIZER_URL: &str =
    "https://api-inference.huggingface.co/models/facebook/bart-large-cnn";

/// Summary length bounds, in model tokens.
const MIN_SUMMARY_LENGTH: u32 = 100;
const MAX_SUMMARY_LENGTH: u32 = 200;

/// The model's context window is small; longer inputs are cut before sending.
const MAX_INPUT_CHARS: usize = 4000;

/// Summarizer backed by a remote inference endpoint.
pub struct HttpSummarizer {
    client: Client,
    url: String,
    api_token: Option<String>,
    rate_limiter: RateLimiter,
}

impl HttpSummarizer {
    pub fn new(
        url: &str,
        api_token: Option<String>,
        timeout: Duration,
        requests_per_second: f64,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent("papersift/0.1")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.to_string(),
            api_token: api_token.filter(|t| !t.is_empty()),
            rate_limiter: RateLimiter::new(requests_per_second)?,
        })
    }
}

#[async_trait]
impl Summarizer for HttpSummarizer {
    async fn summarize(&self, text: &str) -> Result<String> {
        self.rate_limiter.acquire().await;

        let request = SummaryRequest {
            inputs: truncate_chars(text, MAX_INPUT_CHARS).to_string(),
            parameters: SummaryParameters {
                min_length: MIN_SUMMARY_LENGTH,
                max_length: MAX_SUMMARY_LENGTH,
                do_sample: false,
            },
        };

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .context("Failed to call summarization service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Summarization service returned {}: {}", status, body);
        }

        let summaries: Vec<SummaryResponse> = response
            .json()
            .await
            .context("Failed to parse summarization response")?;

        let summary = summaries
            .into_iter()
            .next()
            .map(|s| s.summary_text)
            .context("Summarization response contained no summaries")?;

        debug!(input_chars = text.len(), summary_chars = summary.len(), "Summarized document");
        Ok(summary)
    }
}

// --- Inference API request/response types ---

#[derive(Serialize)]
struct SummaryRequest {
    inputs: String,
    parameters: SummaryParameters,
}

#[derive(Serialize)]
struct SummaryParameters {
    min_length: u32,
    max_length: u32,
    do_sample: bool,
}

#[derive(Deserialize)]
struct SummaryResponse {
    summary_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = SummaryRequest {
            inputs: "text".to_string(),
            parameters: SummaryParameters {
                min_length: MIN_SUMMARY_LENGTH,
                max_length: MAX_SUMMARY_LENGTH,
                do_sample: false,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["inputs"], "text");
        assert_eq!(json["parameters"]["max_length"], 200);
        assert_eq!(json["parameters"]["do_sample"], false);
    }

    #[test]
    fn test_response_parses_first_summary() {
        let parsed: Vec<SummaryResponse> =
            serde_json::from_str(r#"[{"summary_text": "Fires spread."}]"#).unwrap();
        assert_eq!(parsed[0].summary_text, "Fires spread.");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let summarizer = HttpSummarizer::new(
            "http://127.0.0.1:9/summarize",
            None,
            Duration::from_secs(2),
            0.0,
        )
        .unwrap();
        assert!(summarizer.summarize("some text").await.is_err());
    }
}
