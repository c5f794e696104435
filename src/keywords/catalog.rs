// Keyword catalog: every keyword list a run can use, loaded once at startup.
//
// The catalog file is a JSON object keyed by list name. Values are ordered
// string arrays; label dimensions may instead be an object of
// label -> keyword array. Anything malformed is a fatal load error, and each
// command checks for the lists it needs before touching a document.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::list::{Dimension, KeywordList};

/// The fixed set of list names a catalog may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListName {
    PdeCategories,
    SdeCategories,
    SensorCategories,
    Themes,
    Datasets,
    Regions,
    Methods,
    DataTypes,
    DatasetVariations,
    DetectionVariations,
    PreventionVariations,
    PredictionVariations,
    ManagementVariations,
    VegetationVariations,
    ElevationVariations,
}

impl ListName {
    pub const ALL: [ListName; 15] = [
        ListName::PdeCategories,
        ListName::SdeCategories,
        ListName::SensorCategories,
        ListName::Themes,
        ListName::Datasets,
        ListName::Regions,
        ListName::Methods,
        ListName::DataTypes,
        ListName::DatasetVariations,
        ListName::DetectionVariations,
        ListName::PreventionVariations,
        ListName::PredictionVariations,
        ListName::ManagementVariations,
        ListName::VegetationVariations,
        ListName::ElevationVariations,
    ];

    /// The key used in the catalog file.
    pub fn key(self) -> &'static str {
        match self {
            ListName::PdeCategories => "pde_categories",
            ListName::SdeCategories => "sde_categories",
            ListName::SensorCategories => "sensor_categories",
            ListName::Themes => "themes",
            ListName::Datasets => "datasets",
            ListName::Regions => "regions",
            ListName::Methods => "methods",
            ListName::DataTypes => "data_types",
            ListName::DatasetVariations => "dataset_variations",
            ListName::DetectionVariations => "detection_variations",
            ListName::PreventionVariations => "prevention_variations",
            ListName::PredictionVariations => "prediction_variations",
            ListName::ManagementVariations => "management_variations",
            ListName::VegetationVariations => "vegetation_variations",
            ListName::ElevationVariations => "elevation_variations",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.key() == key)
    }

    /// Whether this list may be written as a label -> keywords object.
    pub fn is_dimension(self) -> bool {
        matches!(
            self,
            ListName::Themes
                | ListName::Datasets
                | ListName::Regions
                | ListName::Methods
                | ListName::DataTypes
        )
    }
}

impl std::fmt::Display for ListName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Boolean term groups counted once per document in the themes run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomTerm {
    Detection,
    Prevention,
    Prediction,
    Management,
    Vegetation,
    Elevation,
}

impl CustomTerm {
    pub const ALL: [CustomTerm; 6] = [
        CustomTerm::Detection,
        CustomTerm::Prevention,
        CustomTerm::Prediction,
        CustomTerm::Management,
        CustomTerm::Vegetation,
        CustomTerm::Elevation,
    ];

    pub fn list_name(self) -> ListName {
        match self {
            CustomTerm::Detection => ListName::DetectionVariations,
            CustomTerm::Prevention => ListName::PreventionVariations,
            CustomTerm::Prediction => ListName::PredictionVariations,
            CustomTerm::Management => ListName::ManagementVariations,
            CustomTerm::Vegetation => ListName::VegetationVariations,
            CustomTerm::Elevation => ListName::ElevationVariations,
        }
    }

    /// Human-readable name used in reports.
    pub fn label(self) -> &'static str {
        match self {
            CustomTerm::Detection => "Detection",
            CustomTerm::Prevention => "Prevention",
            CustomTerm::Prediction => "Prediction",
            CustomTerm::Management => "Long-term Management",
            CustomTerm::Vegetation => "Vegetation/Fuel",
            CustomTerm::Elevation => "Elevation/Topography",
        }
    }
}

#[derive(Debug, Clone)]
enum Entry {
    List(KeywordList),
    Labelled(Dimension),
}

/// All keyword lists for a run, validated at load time.
#[derive(Debug, Clone)]
pub struct KeywordCatalog {
    entries: BTreeMap<ListName, Entry>,
}

impl KeywordCatalog {
    /// Load and validate a catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read keyword file {}", path.display()))?;
        Self::from_json(&raw)
            .with_context(|| format!("Invalid keyword file {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let root: Map<String, Value> =
            serde_json::from_str(json).context("Keyword file must be a JSON object")?;

        let mut entries = BTreeMap::new();
        for (key, value) in root {
            let Some(name) = ListName::from_key(&key) else {
                let known: Vec<&str> = ListName::ALL.iter().map(|n| n.key()).collect();
                anyhow::bail!("Unknown keyword list '{key}' (expected one of: {})", known.join(", "));
            };

            let entry = match value {
                Value::Array(items) => Entry::List(KeywordList::new(key.as_str(), strings(&key, items)?)?),
                Value::Object(groups) if name.is_dimension() => {
                    let mut parsed = Vec::with_capacity(groups.len());
                    for (label, keywords) in groups {
                        let Value::Array(items) = keywords else {
                            anyhow::bail!("Label '{label}' in '{key}' must be an array of strings");
                        };
                        let keywords = strings(&format!("{key}.{label}"), items)?;
                        parsed.push((label, keywords));
                    }
                    Entry::Labelled(Dimension::grouped(key.as_str(), parsed)?)
                }
                _ => anyhow::bail!("Keyword list '{key}' must be an array of strings"),
            };

            entries.insert(name, entry);
        }

        Ok(Self { entries })
    }

    pub fn contains(&self, name: ListName) -> bool {
        self.entries.contains_key(&name)
    }

    /// Fail with every missing name at once, so the user fixes the file in one go.
    pub fn require(&self, names: &[ListName]) -> Result<()> {
        let missing: Vec<&str> = names
            .iter()
            .filter(|name| !self.contains(**name))
            .map(|name| name.key())
            .collect();

        if !missing.is_empty() {
            anyhow::bail!(
                "Keyword file is missing required list(s): {}",
                missing.join(", ")
            );
        }
        Ok(())
    }

    /// A flat keyword list.
    pub fn list(&self, name: ListName) -> Result<&KeywordList> {
        match self.entries.get(&name) {
            Some(Entry::List(list)) => Ok(list),
            Some(Entry::Labelled(_)) => {
                anyhow::bail!("Keyword list '{name}' is labelled; expected a flat array")
            }
            None => anyhow::bail!("Keyword file is missing required list: {name}"),
        }
    }

    /// A label dimension. Flat arrays become one label per keyword.
    pub fn dimension(&self, name: ListName) -> Result<Dimension> {
        match self.entries.get(&name) {
            Some(Entry::List(list)) => Ok(Dimension::flat(list)),
            Some(Entry::Labelled(dim)) => Ok(dim.clone()),
            None => anyhow::bail!("Keyword file is missing required list: {name}"),
        }
    }

    /// (list, label count, keyword count) for every loaded list.
    pub fn summary(&self) -> Vec<(ListName, usize, usize)> {
        self.entries
            .iter()
            .map(|(name, entry)| match entry {
                Entry::List(list) => (*name, list.len(), list.len()),
                Entry::Labelled(dim) => (*name, dim.groups().len(), dim.keyword_count()),
            })
            .collect()
    }
}

fn strings(context: &str, items: Vec<Value>) -> Result<Vec<String>> {
    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            other => anyhow::bail!("'{context}' contains a non-string entry: {other}"),
        })
        .collect()
}
