use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::summarize::http::DEFAULT_SUMMARIZER_URL;
use crate::summarize::rate_limiter::spacing_for;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// setting has a default; a numeric value that does not parse is fatal.
#[derive(Debug, Clone)]
pub struct Config {
    /// Keyword catalog (JSON).
    pub keywords_path: PathBuf,
    /// Where reports, exports and charts are written.
    pub output_dir: PathBuf,
    /// Upper bound on extracting one PDF.
    pub extract_timeout: Duration,
    pub summarizer_url: String,
    /// Bearer token for the summarization endpoint, if it needs one.
    pub summarizer_api_token: Option<String>,
    pub summarizer_timeout: Duration,
    /// Summarization requests per second; 0 disables pacing.
    pub summarizer_rps: f64,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let summarizer_rps = parse_or("SUMMARIZER_RPS", var("SUMMARIZER_RPS"), 1.0f64)?;
        spacing_for(summarizer_rps).context("SUMMARIZER_RPS is out of range")?;

        Ok(Self {
            keywords_path: var("PAPERSIFT_KEYWORDS")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./keywords.json")),
            output_dir: var("PAPERSIFT_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./output")),
            extract_timeout: Duration::from_secs(parse_or(
                "PAPERSIFT_EXTRACT_TIMEOUT_SECS",
                var("PAPERSIFT_EXTRACT_TIMEOUT_SECS"),
                60u64,
            )?),
            summarizer_url: var("SUMMARIZER_URL")
                .unwrap_or_else(|| DEFAULT_SUMMARIZER_URL.to_string()),
            summarizer_api_token: var("SUMMARIZER_API_TOKEN"),
            summarizer_timeout: Duration::from_secs(parse_or(
                "SUMMARIZER_TIMEOUT_SECS",
                var("SUMMARIZER_TIMEOUT_SECS"),
                120u64,
            )?),
            summarizer_rps,
        })
    }

    /// Check that the keyword catalog exists before any run starts.
    pub fn require_keywords(&self) -> Result<()> {
        if !self.keywords_path.is_file() {
            anyhow::bail!(
                "Keyword file not found at {}\n\
                 Set PAPERSIFT_KEYWORDS in your .env file or copy keywords.json there.",
                self.keywords_path.display()
            );
        }
        Ok(())
    }

    /// Path of an output artifact inside the output directory.
    pub fn output_path(&self, file_name: impl AsRef<Path>) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number, got '{raw}'")),
        None => Ok(default),
    }
}
