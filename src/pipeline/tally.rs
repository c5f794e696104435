// Per-label document counters shared by every run.

use serde::Serialize;

/// How many documents carried one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub documents: u32,
}

/// Document counts for a fixed, ordered set of labels.
///
/// Counts are documents, not occurrences: a label found twice in one
/// document's result is still counted once for that document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LabelTally {
    counts: Vec<LabelCount>,
}

impl LabelTally {
    /// Start every label at zero so unseen labels still appear in reports.
    pub fn new(labels: Vec<String>) -> Self {
        Self {
            counts: labels
                .into_iter()
                .map(|label| LabelCount {
                    label,
                    documents: 0,
                })
                .collect(),
        }
    }

    /// Count one document's labels.
    pub fn record(&mut self, found: &[String]) {
        for (i, label) in found.iter().enumerate() {
            if found[..i].contains(label) {
                continue;
            }
            match self.counts.iter_mut().find(|c| &c.label == label) {
                Some(count) => count.documents += 1,
                None => self.counts.push(LabelCount {
                    label: label.clone(),
                    documents: 1,
                }),
            }
        }
    }

    pub fn get(&self, label: &str) -> u32 {
        self.counts
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.documents)
            .unwrap_or(0)
    }

    pub fn counts(&self) -> &[LabelCount] {
        &self.counts
    }
}
