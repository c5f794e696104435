// CSV metadata run: tag each search-result row's abstract with methods,
// data types and regions.
//
// Rows are already in memory, so this run is synchronous. The output keeps
// every original column and appends one column per dimension.

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use super::tally::LabelTally;
use crate::keywords::catalog::{KeywordCatalog, ListName};
use crate::matching::tagger::Tagger;
use crate::source::table::{CsvColumns, Table, TableRow};

pub const METHOD_COLUMN: &str = "Method";
pub const DATA_TYPE_COLUMN: &str = "Data Type";
pub const REGION_COLUMN: &str = "Region";

/// Labels found in one abstract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaperLabels {
    pub methods: Vec<String>,
    pub data_types: Vec<String>,
    pub regions: Vec<String>,
}

/// Tags abstracts against the method, data type and region dimensions.
pub struct PaperClassifier {
    methods: Tagger,
    data_types: Tagger,
    regions: Tagger,
}

impl PaperClassifier {
    pub const REQUIRED_LISTS: [ListName; 3] =
        [ListName::Methods, ListName::DataTypes, ListName::Regions];

    pub fn from_catalog(catalog: &KeywordCatalog) -> Result<Self> {
        catalog.require(&Self::REQUIRED_LISTS)?;
        Ok(Self {
            methods: Tagger::new(&catalog.dimension(ListName::Methods)?)?,
            data_types: Tagger::new(&catalog.dimension(ListName::DataTypes)?)?,
            regions: Tagger::new(&catalog.dimension(ListName::Regions)?)?,
        })
    }

    pub fn classify(&self, text: &str) -> PaperLabels {
        PaperLabels {
            methods: self.methods.tag(text),
            data_types: self.data_types.tag(text),
            regions: self.regions.tag(text),
        }
    }
}

/// One input row with its labels.
#[derive(Debug, Clone)]
pub struct ClassifiedRow {
    pub row: TableRow,
    pub labels: PaperLabels,
}

/// Label counts over every classified row.
#[derive(Debug, Clone, Serialize)]
pub struct MetadataRun {
    pub rows: u32,
    pub methods: LabelTally,
    pub data_types: LabelTally,
    pub regions: LabelTally,
}

impl MetadataRun {
    pub fn new(classifier: &PaperClassifier) -> Self {
        Self {
            rows: 0,
            methods: LabelTally::new(classifier.methods.labels()),
            data_types: LabelTally::new(classifier.data_types.labels()),
            regions: LabelTally::new(classifier.regions.labels()),
        }
    }

    pub fn record(&mut self, labels: &PaperLabels) {
        self.rows += 1;
        self.methods.record(&labels.methods);
        self.data_types.record(&labels.data_types);
        self.regions.record(&labels.regions);
    }
}

/// Classify every row of `table` by its abstract column.
pub fn run(
    table: Table,
    columns: &CsvColumns,
    classifier: &PaperClassifier,
) -> (Vec<ClassifiedRow>, MetadataRun) {
    let mut state = MetadataRun::new(classifier);

    let rows: Vec<ClassifiedRow> = table
        .rows
        .into_iter()
        .map(|row| {
            let labels = classifier.classify(row.get(&columns.abstract_text));
            state.record(&labels);
            ClassifiedRow { row, labels }
        })
        .collect();

    info!(rows = state.rows, "Metadata classification complete");
    (rows, state)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "methods": {
            "machine learning": ["machine learning", "neural network", "SVM"],
            "simulation": ["simulation", "BurnP3", "FARSITE"]
        },
        "data_types": {
            "satellite data": ["satellite data", "MODIS", "Landsat"],
            "weather data": ["weather data", "wind speed"]
        },
        "regions": {
            "USA": ["california", "oregon"],
            "Canada": ["canada", "alberta", "british columbia"]
        }
    }"#;

    fn classifier() -> PaperClassifier {
        PaperClassifier::from_catalog(&KeywordCatalog::from_json(CATALOG).unwrap()).unwrap()
    }

    #[test]
    fn test_abstract_gets_all_three_dimensions() {
        let labels = classifier().classify("A BurnP3 simulation of wind speed in Alberta");
        assert_eq!(labels.methods, vec!["simulation"]);
        assert_eq!(labels.data_types, vec!["weather data"]);
        assert_eq!(labels.regions, vec!["Canada"]);
    }

    #[test]
    fn test_run_counts_rows_per_label() {
        let columns = CsvColumns::default();
        let row = |text: &str| {
            TableRow::new(
                "a.csv",
                [(columns.abstract_text.clone(), text.to_string())]
                    .into_iter()
                    .collect(),
            )
        };
        let table = Table {
            headers: vec![columns.abstract_text.clone()],
            rows: vec![row("SVM over MODIS in Oregon"), row("neural network"), row("")],
        };

        let (rows, state) = run(table, &columns, &classifier());
        assert_eq!(rows.len(), 3);
        assert_eq!(state.rows, 3);
        assert_eq!(state.methods.get("machine learning"), 2);
        assert_eq!(state.regions.get("USA"), 1);
        assert_eq!(rows[2].labels, PaperLabels::default());
    }
}
