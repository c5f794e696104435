// Keyword matcher: case-insensitive presence testing of a keyword list.
//
// Each keyword is compiled once into a Unicode-aware regex, so case folding
// and word boundaries hold for accented keywords too. Bounded mode wraps the
// keyword in word boundaries so "class" does not fire inside "classifier", while
// punctuation-adjacent hits like "SVM-based" still count. Substring mode is
// reserved for free-text phrase search.
//
// Two operations stay separate:
//   - first_match_exists: short-circuits on the first keyword found
//   - all_matches: reports every keyword present, in list order
// Neither counts occurrences; presence is all that matters per document.

use anyhow::{Context, Result};
use regex::Regex;

use crate::keywords::list::KeywordList;

/// How a keyword must sit in the text to count as a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Delimited token or phrase (the default for every dimension).
    Bounded,
    /// Anywhere in the text, including inside larger words.
    Substring,
}

#[derive(Debug, Clone)]
struct CompiledKeyword {
    keyword: String,
    pattern: Regex,
}

/// A keyword list compiled for repeated matching against many documents.
#[derive(Debug, Clone)]
pub struct Matcher {
    name: String,
    keywords: Vec<CompiledKeyword>,
}

impl Matcher {
    pub fn new(list: &KeywordList, mode: MatchMode) -> Result<Self> {
        let keywords = list
            .keywords()
            .iter()
            .map(|keyword| {
                let pattern = Regex::new(&keyword_pattern(keyword, mode)).with_context(|| {
                    format!("Failed to compile keyword '{keyword}' in '{}'", list.name())
                })?;
                Ok(CompiledKeyword {
                    keyword: keyword.clone(),
                    pattern,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: list.name().to_string(),
            keywords,
        })
    }

    /// Bounded matcher, the default for every keyword pass.
    pub fn bounded(list: &KeywordList) -> Result<Self> {
        Self::new(list, MatchMode::Bounded)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The keywords this matcher tests, in list order.
    pub fn keywords(&self) -> Vec<String> {
        self.keywords.iter().map(|k| k.keyword.clone()).collect()
    }

    /// True as soon as any keyword of the list is present.
    pub fn first_match_exists(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    /// The first keyword (in list order) present in the text.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        if text.is_empty() {
            return None;
        }
        self.keywords
            .iter()
            .find(|k| k.pattern.is_match(text))
            .map(|k| k.keyword.as_str())
    }

    /// Every keyword present in the text, each once, in list order.
    pub fn all_matches(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        self.keywords
            .iter()
            .filter(|k| k.pattern.is_match(text))
            .map(|k| k.keyword.clone())
            .collect()
    }
}

/// Find every keyword of `list` in `text` (bounded, case-insensitive).
///
/// One-shot helper; compile a `Matcher` once when scanning many documents.
pub fn find_matches(text: &str, list: &KeywordList) -> Result<Vec<String>> {
    Ok(Matcher::bounded(list)?.all_matches(text))
}

/// Build the regex source for one keyword.
///
/// A boundary is only asserted on a side where the keyword itself starts or
/// ends with a word character; `\b` next to punctuation would never match.
fn keyword_pattern(keyword: &str, mode: MatchMode) -> String {
    let escaped = regex::escape(keyword);
    match mode {
        MatchMode::Substring => format!("(?i){escaped}"),
        MatchMode::Bounded => {
            let lead = if keyword.chars().next().is_some_and(is_word_char) {
                r"\b"
            } else {
                ""
            };
            let trail = if keyword.chars().last().is_some_and(is_word_char) {
                r"\b"
            } else {
                ""
            };
            format!("(?i){lead}{escaped}{trail}")
        }
    }
}

/// Mirrors the regex `\w` class closely enough to decide where `\b` applies.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
