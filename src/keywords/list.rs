// Keyword lists and label dimensions.
//
// A KeywordList is an ordered set of distinct trigger strings. A Dimension
// groups keyword lists under labels (e.g. "Canada" -> ["canada", "alberta"]),
// so that tagging reports labels rather than raw keywords. A flat list is the
// degenerate dimension where every keyword is its own label.

use std::collections::{HashMap, HashSet};

use anyhow::Result;

/// An ordered sequence of distinct, non-blank keywords.
///
/// Immutable once built. Duplicates are rejected case-insensitively because
/// matching itself is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordList {
    name: String,
    keywords: Vec<String>,
}

impl KeywordList {
    pub fn new(name: impl Into<String>, keywords: Vec<String>) -> Result<Self> {
        let name = name.into();
        if keywords.is_empty() {
            anyhow::bail!("Keyword list '{name}' is empty");
        }

        let mut seen = HashSet::new();
        for keyword in &keywords {
            if keyword.trim().is_empty() {
                anyhow::bail!("Keyword list '{name}' contains a blank keyword");
            }
            if !seen.insert(keyword.to_lowercase()) {
                anyhow::bail!("Keyword list '{name}' contains duplicate keyword '{keyword}'");
            }
        }

        Ok(Self { name, keywords })
    }

    /// Convenience constructor for literal lists (tests, built-in defaults).
    pub fn from_strs(name: &str, keywords: &[&str]) -> Result<Self> {
        Self::new(name, keywords.iter().map(|k| k.to_string()).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// One label of a dimension together with the keywords that trigger it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelGroup {
    pub label: String,
    pub keywords: KeywordList,
}

/// A named, non-exclusive label dimension (themes, datasets, regions, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    name: String,
    groups: Vec<LabelGroup>,
}

impl Dimension {
    /// Build a dimension from labelled keyword groups, in the given order.
    pub fn grouped(name: impl Into<String>, groups: Vec<(String, Vec<String>)>) -> Result<Self> {
        let name = name.into();
        if groups.is_empty() {
            anyhow::bail!("Dimension '{name}' has no labels");
        }

        let mut labels = HashSet::new();
        // keyword (lower-cased) -> label that claimed it first
        let mut owners: HashMap<String, String> = HashMap::new();
        let mut built = Vec::with_capacity(groups.len());
        for (label, keywords) in groups {
            if !labels.insert(label.to_lowercase()) {
                anyhow::bail!("Dimension '{name}' contains duplicate label '{label}'");
            }
            let keywords = KeywordList::new(format!("{name}.{label}"), keywords)?;
            for keyword in keywords.keywords() {
                if let Some(owner) = owners.insert(keyword.to_lowercase(), label.clone()) {
                    anyhow::bail!(
                        "Dimension '{name}' lists keyword '{keyword}' under both '{owner}' and '{label}'"
                    );
                }
            }
            built.push(LabelGroup { label, keywords });
        }

        Ok(Self {
            name,
            groups: built,
        })
    }

    /// Every keyword of `list` becomes a label of its own.
    pub fn flat(list: &KeywordList) -> Self {
        let groups = list
            .keywords()
            .iter()
            .map(|keyword| LabelGroup {
                label: keyword.clone(),
                keywords: KeywordList {
                    name: format!("{}.{}", list.name(), keyword),
                    keywords: vec![keyword.clone()],
                },
            })
            .collect();

        Self {
            name: list.name().to_string(),
            groups,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn groups(&self) -> &[LabelGroup] {
        &self.groups
    }

    /// Labels in declaration order.
    pub fn labels(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.label.clone()).collect()
    }

    /// Total number of trigger keywords across all labels.
    pub fn keyword_count(&self) -> usize {
        self.groups.iter().map(|g| g.keywords.len()).sum()
    }
}
