// Structured exports: JSON for every PDF run, combined CSV for the metadata
// run.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::matching::cooccurrence::CooccurrenceTracker;
use crate::pipeline::metadata::{ClassifiedRow, DATA_TYPE_COLUMN, METHOD_COLUMN, REGION_COLUMN};
use crate::pipeline::summaries::SummaryResult;
use crate::pipeline::themes::{ThemeRun, CROSS_PAIRS, WITHIN_PAIRS};

/// Separator between labels inside one CSV cell.
pub const LABEL_SEPARATOR: &str = "; ";

/// Top-level shape of every JSON export.
#[derive(Debug, Serialize)]
pub struct Export<'a, R: Serialize, A: Serialize> {
    pub generated_at: String,
    pub results: &'a R,
    pub aggregates: A,
}

impl<'a, R: Serialize, A: Serialize> Export<'a, R, A> {
    pub fn new(results: &'a R, aggregates: A) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            results,
            aggregates,
        }
    }
}

/// Pretty-printed JSON to `path`, creating the parent directory.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value).context("Failed to serialize export")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// One co-occurrence counter in export form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairCount {
    pub dimensions: String,
    pub left: String,
    pub right: String,
    pub documents: u32,
}

/// Flatten every within- and cross-dimension counter of a themes run.
pub fn pair_counts(tracker: &CooccurrenceTracker) -> Vec<PairCount> {
    let mut pairs = Vec::new();
    for dimension in WITHIN_PAIRS {
        for (pair, documents) in tracker.within(dimension) {
            pairs.push(PairCount {
                dimensions: format!("{dimension}x{dimension}"),
                left: pair.first.clone(),
                right: pair.second.clone(),
                documents,
            });
        }
    }
    for (left_dim, right_dim) in CROSS_PAIRS {
        for ((left, right), documents) in tracker.cross(left_dim, right_dim) {
            pairs.push(PairCount {
                dimensions: format!("{left_dim}x{right_dim}"),
                left: left.clone(),
                right: right.clone(),
                documents,
            });
        }
    }
    pairs
}

/// Aggregates of a themes run, co-occurrence included.
#[derive(Debug, Serialize)]
pub struct ThemeAggregates<'a> {
    #[serde(flatten)]
    pub run: &'a ThemeRun,
    pub cooccurrence: Vec<PairCount>,
}

impl<'a> ThemeAggregates<'a> {
    pub fn new(run: &'a ThemeRun) -> Self {
        Self {
            run,
            cooccurrence: pair_counts(&run.cooccurrence),
        }
    }
}

/// Aggregates of a summaries run.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SummaryTotals {
    pub documents: usize,
    pub summaries_failed: usize,
}

impl SummaryTotals {
    pub fn from_results(results: &[SummaryResult]) -> Self {
        Self {
            documents: results.len(),
            summaries_failed: results.iter().filter(|r| r.summary_failed()).count(),
        }
    }
}

/// Write every original column plus Method, Data Type and Region.
///
/// An input column that already carries one of those names is replaced.
pub fn write_classified_csv(path: &Path, headers: &[String], rows: &[ClassifiedRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let added = [METHOD_COLUMN, DATA_TYPE_COLUMN, REGION_COLUMN];
    let original: Vec<&String> = headers
        .iter()
        .filter(|h| !added.contains(&h.as_str()))
        .collect();

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let mut header_row: Vec<&str> = original.iter().map(|h| h.as_str()).collect();
    header_row.extend(added);
    writer.write_record(&header_row).context("Failed to write CSV header")?;

    for classified in rows {
        let labels = &classified.labels;
        let mut record: Vec<String> = original
            .iter()
            .map(|h| classified.row.get(h).to_string())
            .collect();
        record.push(labels.methods.join(LABEL_SEPARATOR));
        record.push(labels.data_types.join(LABEL_SEPARATOR));
        record.push(labels.regions.join(LABEL_SEPARATOR));
        writer.write_record(&record).context("Failed to write CSV row")?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
