// Themes run: tag every paper (body text plus metadata) against the themes,
// datasets and regions dimensions, count the custom term groups, decide the
// regional focus and track label co-occurrence.
//
// Every document feeds the counters. Only documents with at least one
// finding, or a failed extraction, are kept as per-document results.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use super::progress_bar;
use super::tally::LabelTally;
use crate::keywords::catalog::{CustomTerm, KeywordCatalog, ListName};
use crate::matching::cooccurrence::{CooccurrenceTracker, DocumentLabels};
use crate::matching::focus::{self, FocusTally, RegionalFocus};
use crate::matching::matcher::Matcher;
use crate::matching::tagger::{DatasetMention, MentionExtractor, Tagger};
use crate::source::traits::{SourceDocument, TextSource};

pub const THEMES: &str = "themes";
pub const DATASETS: &str = "datasets";
pub const REGIONS: &str = "regions";

/// Within-dimension co-occurrence is tracked for themes only.
pub const WITHIN_PAIRS: [&str; 1] = [THEMES];
/// Cross-dimension pairs, left label first.
pub const CROSS_PAIRS: [(&str, &str); 2] = [(THEMES, DATASETS), (REGIONS, DATASETS)];

/// Per-paper findings of the themes run.
#[derive(Debug, Clone, Serialize)]
pub struct ThemeResult {
    pub file: String,
    pub themes: Vec<String>,
    pub datasets: Vec<String>,
    pub regions: Vec<String>,
    pub dataset_mentions: Vec<DatasetMention>,
    pub custom_terms: Vec<CustomTerm>,
    pub focus: RegionalFocus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_error: Option<String>,
}

impl ThemeResult {
    /// Whether the paper is listed in the per-document section of the report.
    ///
    /// A failed extraction is always listed so it is not read as a paper that
    /// matched nothing.
    pub fn has_findings(&self) -> bool {
        self.extraction_error.is_some()
            || !self.themes.is_empty()
            || !self.datasets.is_empty()
            || !self.regions.is_empty()
            || !self.dataset_mentions.is_empty()
    }

    pub fn labels(&self) -> DocumentLabels {
        let mut labels = DocumentLabels::new();
        labels.insert(THEMES, &self.themes);
        labels.insert(DATASETS, &self.datasets);
        labels.insert(REGIONS, &self.regions);
        labels
    }
}

/// Compiled keyword passes for the themes run.
pub struct ThemeAnalyzer {
    themes: Tagger,
    datasets: Tagger,
    regions: Tagger,
    terms: Vec<(CustomTerm, Matcher)>,
    mentions: MentionExtractor,
}

impl ThemeAnalyzer {
    pub fn required_lists() -> Vec<ListName> {
        let mut lists = vec![
            ListName::Themes,
            ListName::Datasets,
            ListName::Regions,
            ListName::DatasetVariations,
        ];
        lists.extend(CustomTerm::ALL.iter().map(|term| term.list_name()));
        lists
    }

    pub fn from_catalog(catalog: &KeywordCatalog) -> Result<Self> {
        catalog.require(&Self::required_lists())?;

        let terms = CustomTerm::ALL
            .iter()
            .map(|term| Ok((*term, Matcher::bounded(catalog.list(term.list_name())?)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            themes: Tagger::new(&catalog.dimension(ListName::Themes)?)?,
            datasets: Tagger::new(&catalog.dimension(ListName::Datasets)?)?,
            regions: Tagger::new(&catalog.dimension(ListName::Regions)?)?,
            terms,
            mentions: MentionExtractor::new(catalog.list(ListName::DatasetVariations)?)?,
        })
    }

    pub fn analyze(&self, doc: &SourceDocument) -> ThemeResult {
        let text = doc.combined_text();

        let regions = self.regions.tag(&text);
        let focus = focus::determine(&regions, &text);
        let custom_terms = self
            .terms
            .iter()
            .filter(|(_, matcher)| matcher.first_match_exists(&text))
            .map(|(term, _)| *term)
            .collect();

        ThemeResult {
            file: doc.name.clone(),
            themes: self.themes.tag(&text),
            datasets: self.datasets.tag(&text),
            regions,
            dataset_mentions: self.mentions.extract(&text),
            custom_terms,
            focus,
            extraction_error: doc.extraction.failure().map(str::to_string),
        }
    }
}

/// Document count for one custom term group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub term: CustomTerm,
    pub documents: u32,
}

/// Run-wide state of the themes run.
#[derive(Debug, Clone, Serialize)]
pub struct ThemeRun {
    pub documents: u32,
    pub extraction_failures: u32,
    pub themes: LabelTally,
    pub datasets: LabelTally,
    pub regions: LabelTally,
    pub terms: Vec<TermCount>,
    pub focus: FocusTally,
    #[serde(skip)]
    pub cooccurrence: CooccurrenceTracker,
}

impl ThemeRun {
    pub fn new(analyzer: &ThemeAnalyzer) -> Self {
        Self {
            documents: 0,
            extraction_failures: 0,
            themes: LabelTally::new(analyzer.themes.labels()),
            datasets: LabelTally::new(analyzer.datasets.labels()),
            regions: LabelTally::new(analyzer.regions.labels()),
            terms: CustomTerm::ALL
                .iter()
                .map(|term| TermCount {
                    term: *term,
                    documents: 0,
                })
                .collect(),
            focus: FocusTally::default(),
            cooccurrence: CooccurrenceTracker::new(&WITHIN_PAIRS, &CROSS_PAIRS),
        }
    }

    /// Fold one paper's result into the run, whether or not it had findings.
    pub fn record(&mut self, result: &ThemeResult) {
        self.documents += 1;
        if result.extraction_error.is_some() {
            self.extraction_failures += 1;
        }

        self.themes.record(&result.themes);
        self.datasets.record(&result.datasets);
        self.regions.record(&result.regions);

        for count in self.terms.iter_mut() {
            if result.custom_terms.contains(&count.term) {
                count.documents += 1;
            }
        }

        self.focus.record(result.focus);
        self.cooccurrence.record(&result.labels());
    }

    pub fn term_count(&self, term: CustomTerm) -> u32 {
        self.terms
            .iter()
            .find(|c| c.term == term)
            .map(|c| c.documents)
            .unwrap_or(0)
    }
}

/// Run the themes analysis over `files`. Returns papers with findings and
/// papers whose extraction failed.
pub async fn run(
    source: &dyn TextSource,
    files: &[PathBuf],
    analyzer: &ThemeAnalyzer,
) -> (Vec<ThemeResult>, ThemeRun) {
    let mut state = ThemeRun::new(analyzer);
    let mut results = Vec::new();

    let pb = progress_bar(files.len(), "Papers");
    for path in files {
        let doc = source.load(path).await;
        pb.set_message(doc.name.clone());

        let result = analyzer.analyze(&doc);
        state.record(&result);
        if result.has_findings() {
            results.push(result);
        } else {
            debug!(file = %doc.name, "No themes, datasets or regions found");
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(
        documents = state.documents,
        listed = results.len(),
        failures = state.extraction_failures,
        "Theme analysis complete"
    );
    (results, state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_result(extraction_error: Option<&str>) -> ThemeResult {
        ThemeResult {
            file: "paper.pdf".to_string(),
            themes: vec![],
            datasets: vec![],
            regions: vec![],
            dataset_mentions: vec![],
            custom_terms: vec![],
            focus: RegionalFocus::Unclear,
            extraction_error: extraction_error.map(str::to_string),
        }
    }

    #[test]
    fn test_failed_extraction_is_listed() {
        assert!(!empty_result(None).has_findings());
        assert!(empty_result(Some("not a PDF")).has_findings());
    }

    #[test]
    fn test_any_label_counts_as_finding() {
        let mut result = empty_result(None);
        result.regions = vec!["Canada".to_string()];
        assert!(result.has_findings());
    }
}
