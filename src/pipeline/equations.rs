// Equations run: classify each paper as PDE / SDE / (Sensor) / both / neither
// and tally which subcategory keywords each paper mentions.
//
// The category comes from the ranked classifier (first-match presence per
// base). Subcategories are collected exhaustively (all matches) so the report
// can show every equation family a paper touches.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use super::progress_bar;
use super::tally::LabelTally;
use crate::keywords::catalog::{KeywordCatalog, ListName};
use crate::matching::classifier::{self, BaseCategory, EquationCategory, EquationClassifier};
use crate::matching::matcher::Matcher;
use crate::source::traits::{SourceDocument, TextSource};

/// Subcategory keywords of one base category found in a paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubcategoryMatches {
    pub base: BaseCategory,
    pub found: Vec<String>,
}

/// Per-paper outcome of the equations run.
#[derive(Debug, Clone, Serialize)]
pub struct EquationResult {
    pub file: String,
    pub category: EquationCategory,
    pub subcategories: Vec<SubcategoryMatches>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_error: Option<String>,
}

impl EquationResult {
    pub fn found(&self, base: BaseCategory) -> &[String] {
        self.subcategories
            .iter()
            .find(|s| s.base == base)
            .map(|s| s.found.as_slice())
            .unwrap_or(&[])
    }
}

/// Compiled keyword passes for the equations run.
pub struct EquationAnalyzer {
    classifier: EquationClassifier,
    subcategories: Vec<(BaseCategory, Matcher)>,
}

impl EquationAnalyzer {
    pub fn required_lists(with_sensors: bool) -> Vec<ListName> {
        let mut lists = vec![ListName::PdeCategories, ListName::SdeCategories];
        if with_sensors {
            lists.push(ListName::SensorCategories);
        }
        lists
    }

    pub fn from_catalog(catalog: &KeywordCatalog, with_sensors: bool) -> Result<Self> {
        catalog.require(&Self::required_lists(with_sensors))?;
        let pde = catalog.list(ListName::PdeCategories)?;
        let sde = catalog.list(ListName::SdeCategories)?;

        let mut subcategories = vec![
            (BaseCategory::Pde, Matcher::bounded(pde)?),
            (BaseCategory::Sde, Matcher::bounded(sde)?),
        ];

        let classifier = if with_sensors {
            let sensor = catalog.list(ListName::SensorCategories)?;
            subcategories.push((BaseCategory::Sensor, Matcher::bounded(sensor)?));
            classifier::three_way(pde, sde, sensor)?
        } else {
            classifier::two_way(pde, sde)?
        };

        Ok(Self {
            classifier,
            subcategories,
        })
    }

    pub fn categories(&self) -> Vec<EquationCategory> {
        self.classifier.labels()
    }

    pub fn bases(&self) -> Vec<BaseCategory> {
        self.subcategories.iter().map(|(base, _)| *base).collect()
    }

    pub fn analyze(&self, doc: &SourceDocument) -> EquationResult {
        let text = doc.extraction.text();
        EquationResult {
            file: doc.name.clone(),
            category: self.classifier.classify(text),
            subcategories: self
                .subcategories
                .iter()
                .map(|(base, matcher)| SubcategoryMatches {
                    base: *base,
                    found: matcher.all_matches(text),
                })
                .collect(),
            extraction_error: doc.extraction.failure().map(str::to_string),
        }
    }

    fn subcategory_labels(&self) -> Vec<(BaseCategory, Vec<String>)> {
        self.subcategories
            .iter()
            .map(|(base, matcher)| (*base, matcher.keywords()))
            .collect()
    }
}

/// Document count and file names for one category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub category: EquationCategory,
    pub documents: u32,
    pub files: Vec<String>,
}

/// Subcategory document counts for one base category.
#[derive(Debug, Clone, Serialize)]
pub struct SubcategoryCounts {
    pub base: BaseCategory,
    pub counts: LabelTally,
}

/// Run-wide state of the equations run.
#[derive(Debug, Clone, Serialize)]
pub struct EquationRun {
    pub documents: u32,
    pub extraction_failures: u32,
    pub categories: Vec<CategoryCount>,
    pub subcategories: Vec<SubcategoryCounts>,
}

impl EquationRun {
    pub fn new(analyzer: &EquationAnalyzer) -> Self {
        Self {
            documents: 0,
            extraction_failures: 0,
            categories: analyzer
                .categories()
                .into_iter()
                .map(|category| CategoryCount {
                    category,
                    documents: 0,
                    files: Vec::new(),
                })
                .collect(),
            subcategories: analyzer
                .subcategory_labels()
                .into_iter()
                .map(|(base, labels)| SubcategoryCounts {
                    base,
                    counts: LabelTally::new(labels),
                })
                .collect(),
        }
    }

    /// Fold one paper's result into the run.
    pub fn record(&mut self, result: &EquationResult) {
        self.documents += 1;
        if result.extraction_error.is_some() {
            self.extraction_failures += 1;
        }

        if let Some(entry) = self
            .categories
            .iter_mut()
            .find(|c| c.category == result.category)
        {
            entry.documents += 1;
            entry.files.push(result.file.clone());
        }

        for matches in &result.subcategories {
            if let Some(entry) = self.subcategories.iter_mut().find(|s| s.base == matches.base) {
                entry.counts.record(&matches.found);
            }
        }
    }

    pub fn category_count(&self, category: EquationCategory) -> u32 {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.documents)
            .unwrap_or(0)
    }

    pub fn subcategory_counts(&self, base: BaseCategory) -> Option<&LabelTally> {
        self.subcategories
            .iter()
            .find(|s| s.base == base)
            .map(|s| &s.counts)
    }
}

/// Run the equations analysis over `files`.
pub async fn run(
    source: &dyn TextSource,
    files: &[PathBuf],
    analyzer: &EquationAnalyzer,
) -> (Vec<EquationResult>, EquationRun) {
    let mut state = EquationRun::new(analyzer);
    let mut results = Vec::with_capacity(files.len());

    let pb = progress_bar(files.len(), "Papers");
    for path in files {
        let doc = source.load(path).await;
        pb.set_message(doc.name.clone());

        let result = analyzer.analyze(&doc);
        state.record(&result);
        results.push(result);
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(
        documents = state.documents,
        failures = state.extraction_failures,
        "Equation analysis complete"
    );
    (results, state)
}
