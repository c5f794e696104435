// Co-occurrence tracker: pairwise tallies of labels found in one document.
//
// Two kinds of pairs are counted:
//   - within a dimension (theme x theme): unordered, (A, B) == (B, A)
//   - across two dimensions (theme x dataset): ordered by dimension position
// Every pair is counted at most once per document, so counts are numbers of
// documents, not numbers of keyword occurrences.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// An unordered pair of distinct labels, stored in sorted order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct UnorderedPair {
    pub first: String,
    pub second: String,
}

impl UnorderedPair {
    pub fn new(a: &str, b: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            first: first.to_string(),
            second: second.to_string(),
        }
    }
}

impl std::fmt::Display for UnorderedPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

/// Labels found in one document, keyed by dimension name.
#[derive(Debug, Clone, Default)]
pub struct DocumentLabels {
    by_dimension: BTreeMap<String, Vec<String>>,
}

impl DocumentLabels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the labels of one dimension; repeated labels are dropped.
    pub fn insert(&mut self, dimension: &str, labels: &[String]) {
        let mut unique: Vec<String> = Vec::with_capacity(labels.len());
        for label in labels {
            if !unique.contains(label) {
                unique.push(label.clone());
            }
        }
        self.by_dimension.insert(dimension.to_string(), unique);
    }

    pub fn get(&self, dimension: &str) -> &[String] {
        self.by_dimension
            .get(dimension)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// (left label, right label) for cross-dimension pairs.
pub type CrossKey = (String, String);

/// Run-wide pair counters for a fixed plan of dimensions.
#[derive(Debug, Clone, Default)]
pub struct CooccurrenceTracker {
    within: BTreeMap<String, BTreeMap<UnorderedPair, u32>>,
    cross: BTreeMap<CrossKey, BTreeMap<CrossKey, u32>>,
}

impl CooccurrenceTracker {
    /// Track unordered pairs inside each `within` dimension and ordered pairs
    /// for each `(left, right)` dimension combination in `cross`.
    pub fn new(within: &[&str], cross: &[(&str, &str)]) -> Self {
        Self {
            within: within
                .iter()
                .map(|d| (d.to_string(), BTreeMap::new()))
                .collect(),
            cross: cross
                .iter()
                .map(|(a, b)| ((a.to_string(), b.to_string()), BTreeMap::new()))
                .collect(),
        }
    }

    /// Fold one document's labels into the counters.
    pub fn record(&mut self, doc: &DocumentLabels) {
        for (dimension, counts) in self.within.iter_mut() {
            let labels = doc.get(dimension);
            let pairs: BTreeSet<UnorderedPair> = labels
                .iter()
                .enumerate()
                .flat_map(|(i, a)| {
                    labels[i + 1..]
                        .iter()
                        .filter(move |b| *b != a)
                        .map(move |b| UnorderedPair::new(a, b))
                })
                .collect();
            for pair in pairs {
                *counts.entry(pair).or_insert(0) += 1;
            }
        }

        for ((left_dim, right_dim), counts) in self.cross.iter_mut() {
            let lefts = doc.get(left_dim);
            let rights = doc.get(right_dim);
            let pairs: BTreeSet<CrossKey> = lefts
                .iter()
                .flat_map(|l| rights.iter().map(move |r| (l.clone(), r.clone())))
                .collect();
            for pair in pairs {
                *counts.entry(pair).or_insert(0) += 1;
            }
        }
    }

    /// Unordered pair counts for one dimension, sorted by pair.
    pub fn within(&self, dimension: &str) -> Vec<(&UnorderedPair, u32)> {
        self.within
            .get(dimension)
            .map(|counts| counts.iter().map(|(p, c)| (p, *c)).collect())
            .unwrap_or_default()
    }

    /// Ordered pair counts for a dimension combination, sorted by pair.
    pub fn cross(&self, left: &str, right: &str) -> Vec<(&CrossKey, u32)> {
        self.cross
            .get(&(left.to_string(), right.to_string()))
            .map(|counts| counts.iter().map(|(p, c)| (p, *c)).collect())
            .unwrap_or_default()
    }

    pub fn within_count(&self, dimension: &str, a: &str, b: &str) -> u32 {
        self.within
            .get(dimension)
            .and_then(|counts| counts.get(&UnorderedPair::new(a, b)))
            .copied()
            .unwrap_or(0)
    }

    pub fn cross_count(&self, left: &str, right: &str, l: &str, r: &str) -> u32 {
        self.cross
            .get(&(left.to_string(), right.to_string()))
            .and_then(|counts| counts.get(&(l.to_string(), r.to_string())))
            .copied()
            .unwrap_or(0)
    }
}
