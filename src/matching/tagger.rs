// Multi-label tagging and dataset-mention extraction.
//
// A Tagger applies one Dimension to a text and returns every label whose
// keywords are present. Unlike the classifier, labels are not exclusive; a
// document can carry any number of themes, datasets or regions. Each
// dimension is tagged on its own and only combined later by the
// co-occurrence tracker.
//
// Dataset mentions are the one pass that looks at occurrences rather than
// presence: every hit of a variation yields a snippet of the words that
// follow it.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::matcher::Matcher;
use crate::keywords::list::{Dimension, KeywordList};

/// Number of trailing words captured after each dataset mention.
pub const MENTION_WINDOW_WORDS: usize = 5;

/// A compiled label dimension.
#[derive(Debug, Clone)]
pub struct Tagger {
    dimension: String,
    labels: Vec<(String, Matcher)>,
}

impl Tagger {
    pub fn new(dimension: &Dimension) -> Result<Self> {
        let labels = dimension
            .groups()
            .iter()
            .map(|group| Ok((group.label.clone(), Matcher::bounded(&group.keywords)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            dimension: dimension.name().to_string(),
            labels,
        })
    }

    pub fn dimension(&self) -> &str {
        &self.dimension
    }

    /// Labels in declaration order.
    pub fn labels(&self) -> Vec<String> {
        self.labels.iter().map(|(label, _)| label.clone()).collect()
    }

    /// Every label with at least one keyword present, in declaration order.
    ///
    /// Within a label the scan stops at the first keyword found.
    pub fn tag(&self, text: &str) -> Vec<String> {
        self.labels
            .iter()
            .filter(|(_, matcher)| matcher.first_match_exists(text))
            .map(|(label, _)| label.clone())
            .collect()
    }
}

/// One occurrence of a dataset variation plus the words that follow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMention {
    /// The matched text as it appears in the document.
    pub matched: String,
    /// Up to `MENTION_WINDOW_WORDS` words after the match.
    pub following: Vec<String>,
}

impl std::fmt::Display for DatasetMention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.matched, self.following.join(" "))
    }
}

/// Extracts a trailing-context snippet for every occurrence of a variation.
#[derive(Debug, Clone)]
pub struct MentionExtractor {
    variations: Vec<Regex>,
    word: Regex,
    window: usize,
}

impl MentionExtractor {
    pub fn new(variations: &KeywordList) -> Result<Self> {
        Self::with_window(variations, MENTION_WINDOW_WORDS)
    }

    pub fn with_window(variations: &KeywordList, window: usize) -> Result<Self> {
        let variations = variations
            .keywords()
            .iter()
            .map(|v| {
                Regex::new(&format!("(?i){}", regex::escape(v)))
                    .with_context(|| format!("Failed to compile dataset variation '{v}'"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            variations,
            word: Regex::new(r"\w+").context("Failed to compile word pattern")?,
            window,
        })
    }

    /// One mention per occurrence, grouped by variation in list order.
    ///
    /// Occurrences with no words after them are skipped.
    pub fn extract(&self, text: &str) -> Vec<DatasetMention> {
        let mut mentions = Vec::new();
        for variation in &self.variations {
            for hit in variation.find_iter(text) {
                let following: Vec<String> = self
                    .word
                    .find_iter(&text[hit.end()..])
                    .take(self.window)
                    .map(|w| w.as_str().to_string())
                    .collect();
                if following.is_empty() {
                    continue;
                }
                mentions.push(DatasetMention {
                    matched: hit.as_str().to_string(),
                    following,
                });
            }
        }
        mentions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regions() -> Dimension {
        Dimension::grouped(
            "regions",
            vec![
                (
                    "USA".to_string(),
                    vec!["california".to_string(), "oregon".to_string()],
                ),
                (
                    "Canada".to_string(),
                    vec!["canada".to_string(), "british columbia".to_string()],
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_tag_reports_label_not_keyword() {
        let tagger = Tagger::new(&regions()).unwrap();
        assert_eq!(tagger.tag("fires across British Columbia"), vec!["Canada"]);
    }

    #[test]
    fn test_tag_is_multi_label() {
        let tagger = Tagger::new(&regions()).unwrap();
        let found = tagger.tag("Canada and California both burned; Oregon too");
        assert_eq!(found, vec!["USA", "Canada"]);
    }

    #[test]
    fn test_mention_captures_five_following_words() {
        let variations = KeywordList::from_strs("dataset_variations", &["MODIS"]).unwrap();
        let extractor = MentionExtractor::new(&variations).unwrap();
        let mentions = extractor.extract("MODIS imagery used for training the model daily");
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].to_string(), "MODIS: imagery used for training the");
    }

    #[test]
    fn test_mention_per_occurrence() {
        let variations = KeywordList::from_strs("dataset_variations", &["dataset"]).unwrap();
        let extractor = MentionExtractor::new(&variations).unwrap();
        let mentions =
            extractor.extract("The Dataset of fires. A second dataset covers drought years.");
        assert_eq!(mentions.len(), 2);
        assert_eq!(mentions[0].matched, "Dataset");
        assert_eq!(mentions[1].following, vec!["covers", "drought", "years"]);
    }

    #[test]
    fn test_mention_at_end_of_text_is_skipped() {
        let variations = KeywordList::from_strs("dataset_variations", &["data"]).unwrap();
        let extractor = MentionExtractor::new(&variations).unwrap();
        assert!(extractor.extract("we release the data.").is_empty());
    }
}
