// CSV metadata source: search-result exports with a title and an abstract
// column, combined across every .csv file in a folder.
//
// Columns are unioned across files in first-seen order, so exports with
// slightly different layouts still combine. A file that cannot be read or
// lacks the required columns is skipped with a warning.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::corpus::{has_extension, list_files};
use super::traits::display_name;

/// Names of the columns the classifier reads.
#[derive(Debug, Clone)]
pub struct CsvColumns {
    pub title: String,
    pub abstract_text: String,
}

impl Default for CsvColumns {
    fn default() -> Self {
        Self {
            title: "Document Title".to_string(),
            abstract_text: "Abstract".to_string(),
        }
    }
}

/// One row of a combined table.
#[derive(Debug, Clone, Default)]
pub struct TableRow {
    /// File the row came from.
    pub source: String,
    cells: HashMap<String, String>,
}

impl TableRow {
    pub fn new(source: impl Into<String>, cells: HashMap<String, String>) -> Self {
        Self {
            source: source.into(),
            cells,
        }
    }

    /// Cell value, or "" when this row's file had no such column.
    pub fn get(&self, column: &str) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }
}

/// All rows of all accepted files.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl Table {
    fn absorb(&mut self, headers: Vec<String>, rows: Vec<TableRow>) {
        for header in headers {
            if !self.headers.contains(&header) {
                self.headers.push(header);
            }
        }
        self.rows.extend(rows);
    }
}

/// Combine every `.csv` file in `dir` into one table.
pub fn load_folder(dir: &Path, columns: &CsvColumns) -> Result<Table> {
    let files = list_files(dir, |p| has_extension(p, "csv"))?;
    let mut table = Table::default();

    for path in &files {
        match read_file(path, columns) {
            Ok((headers, rows)) => {
                info!(file = %display_name(path), rows = rows.len(), "Loaded CSV");
                table.absorb(headers, rows);
            }
            Err(e) => warn!(file = %display_name(path), error = %e, "Skipping CSV file"),
        }
    }

    Ok(table)
}

fn read_file(path: &Path, columns: &CsvColumns) -> Result<(Vec<String>, Vec<TableRow>)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV header row")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    for required in [&columns.title, &columns.abstract_text] {
        if !headers.contains(required) {
            anyhow::bail!("missing required column '{required}'");
        }
    }

    let source = display_name(path);
    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(file = %source, row = index + 1, error = %e, "Skipping malformed CSV row");
                continue;
            }
        };
        let cells = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push(TableRow::new(source.clone(), cells));
    }

    Ok((headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combines_files_and_unions_columns() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.csv"),
            "\u{feff}Document Title,Abstract,Year\nFire A,about fire,2020\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("b.csv"),
            "Document Title,Abstract,DOI\nFire B,about smoke,10.1/x\nFire C,short\n",
        )
        .unwrap();

        let table = load_folder(dir.path(), &CsvColumns::default()).unwrap();
        assert_eq!(table.headers, vec!["Document Title", "Abstract", "Year", "DOI"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].get("Year"), "2020");
        assert_eq!(table.rows[1].get("Year"), "");
        assert_eq!(table.rows[2].get("DOI"), "");
        assert_eq!(table.rows[2].get("Abstract"), "short");
    }

    #[test]
    fn test_file_without_abstract_column_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.csv"), "Title,Summary\nx,y\n").unwrap();
        std::fs::write(
            dir.path().join("good.csv"),
            "Document Title,Abstract\nFire,text\n",
        )
        .unwrap();

        let table = load_folder(dir.path(), &CsvColumns::default()).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].source, "good.csv");
    }
}
