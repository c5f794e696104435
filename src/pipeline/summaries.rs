// Summaries run: collect every PDE and SDE subcategory a paper mentions and
// attach the summary returned by the external summarization service.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use super::progress_bar;
use crate::keywords::catalog::{KeywordCatalog, ListName};
use crate::matching::matcher::Matcher;
use crate::source::traits::{SourceDocument, TextSource};
use crate::summarize::traits::{summarize_or_sentinel, Summarizer, ANALYSIS_FAILED};

/// Per-paper outcome of the summaries run.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResult {
    pub file: String,
    pub pde_subcategories: Vec<String>,
    pub sde_subcategories: Vec<String>,
    /// Verbatim service output, or the failure sentinel.
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_error: Option<String>,
}

impl SummaryResult {
    pub fn summary_failed(&self) -> bool {
        self.summary == ANALYSIS_FAILED
    }
}

pub struct SummaryAnalyzer {
    pde: Matcher,
    sde: Matcher,
}

impl SummaryAnalyzer {
    pub const REQUIRED_LISTS: [ListName; 2] = [ListName::PdeCategories, ListName::SdeCategories];

    pub fn from_catalog(catalog: &KeywordCatalog) -> Result<Self> {
        catalog.require(&Self::REQUIRED_LISTS)?;
        Ok(Self {
            pde: Matcher::bounded(catalog.list(ListName::PdeCategories)?)?,
            sde: Matcher::bounded(catalog.list(ListName::SdeCategories)?)?,
        })
    }

    /// Keyword passes plus one summarization call.
    pub async fn analyze(&self, doc: &SourceDocument, summarizer: &dyn Summarizer) -> SummaryResult {
        let text = doc.extraction.text();
        SummaryResult {
            file: doc.name.clone(),
            pde_subcategories: self.pde.all_matches(text),
            sde_subcategories: self.sde.all_matches(text),
            summary: summarize_or_sentinel(summarizer, &doc.name, text).await,
            extraction_error: doc.extraction.failure().map(str::to_string),
        }
    }
}

/// Run the summaries analysis over `files`, one service call at a time.
pub async fn run(
    source: &dyn TextSource,
    files: &[PathBuf],
    analyzer: &SummaryAnalyzer,
    summarizer: &dyn Summarizer,
) -> Vec<SummaryResult> {
    let mut results = Vec::with_capacity(files.len());

    let pb = progress_bar(files.len(), "Papers");
    for path in files {
        let doc = source.load(path).await;
        pb.set_message(doc.name.clone());
        results.push(analyzer.analyze(&doc, summarizer).await);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let failed = results.iter().filter(|r| r.summary_failed()).count();
    info!(
        documents = results.len(),
        summaries_failed = failed,
        "Summary analysis complete"
    );
    results
}
