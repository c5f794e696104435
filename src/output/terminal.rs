// Colored terminal output for run summaries.
//
// Reports on disk carry the full detail; the terminal gets counts, bars and
// a short preview. main.rs display calls delegate here.

use colored::Colorize;

use super::{format_list, preview};
use crate::keywords::catalog::CustomTerm;
use crate::matching::classifier::EquationCategory;
use crate::pipeline::equations::EquationRun;
use crate::pipeline::metadata::{ClassifiedRow, MetadataRun};
use crate::pipeline::summaries::SummaryResult;
use crate::pipeline::tally::LabelTally;
use crate::pipeline::themes::ThemeRun;
use crate::source::table::CsvColumns;

const BAR_WIDTH: usize = 20;

/// Rows shown by the CSV preview.
pub const PREVIEW_ROWS: usize = 5;

/// Fixed-width bar for `count` out of `max`.
fn bar(count: u32, max: u32) -> String {
    let filled = if max == 0 {
        0
    } else {
        ((count as f64 / max as f64) * BAR_WIDTH as f64).round() as usize
    };
    format!(
        "[{}{}]",
        "=".repeat(filled),
        " ".repeat(BAR_WIDTH.saturating_sub(filled))
    )
}

/// One labelled bar per count, skipping labels nobody mentioned.
fn display_tally(title: &str, tally: &LabelTally) {
    let max = tally.counts().iter().map(|c| c.documents).max().unwrap_or(0);
    println!("\n  {}", title.bold());
    if max == 0 {
        println!("    {}", "none found".dimmed());
        return;
    }
    for count in tally.counts().iter().filter(|c| c.documents > 0) {
        println!(
            "    {:<32} {} {}",
            count.label,
            bar(count.documents, max).bright_green(),
            count.documents
        );
    }
}

fn colorize_category(category: EquationCategory) -> colored::ColoredString {
    let label = category.as_str();
    match category {
        EquationCategory::Both => label.bright_magenta().bold(),
        EquationCategory::PdeOnly => label.bright_blue(),
        EquationCategory::SdeOnly => label.bright_yellow(),
        EquationCategory::SensorOnly => label.cyan(),
        EquationCategory::Neither => label.dimmed(),
    }
}

fn display_failures(failures: u32) {
    if failures > 0 {
        println!(
            "  {} {} documents could not be extracted (counted as empty text)",
            "!".yellow(),
            failures
        );
    }
}

pub fn display_equation_summary(run: &EquationRun) {
    println!(
        "\n{}",
        format!("=== Equation Categories ({} papers) ===", run.documents).bold()
    );
    let max = run.categories.iter().map(|c| c.documents).max().unwrap_or(0);
    for entry in &run.categories {
        println!(
            "  {:<18} {} {}",
            colorize_category(entry.category),
            bar(entry.documents, max),
            entry.documents
        );
    }
    for entry in &run.subcategories {
        display_tally(&format!("{} subcategories", entry.base.as_str()), &entry.counts);
    }
    display_failures(run.extraction_failures);
}

pub fn display_theme_summary(run: &ThemeRun, listed: usize) {
    println!(
        "\n{}",
        format!(
            "=== Themes ({} papers, {} with findings) ===",
            run.documents, listed
        )
        .bold()
    );
    display_tally("Themes", &run.themes);
    display_tally("Datasets", &run.datasets);
    display_tally("Regions", &run.regions);

    println!("\n  {}", "Focus".bold());
    println!("    Regional: {}", run.focus.regional.to_string().green());
    println!("    Global:   {}", run.focus.global);
    println!("    Unclear:  {}", run.focus.unclear.to_string().yellow());

    println!("\n  {}", "Custom terms".bold());
    for term in CustomTerm::ALL {
        println!("    {:<22} {}", term.label(), run.term_count(term));
    }
    display_failures(run.extraction_failures);
}

pub fn display_summary_results(results: &[SummaryResult]) {
    println!(
        "\n{}",
        format!("=== Summaries ({} papers) ===", results.len()).bold()
    );
    for result in results {
        let summary = if result.summary_failed() {
            result.summary.red()
        } else {
            preview(&result.summary, 100).dimmed()
        };
        println!("  {}", result.file.bold());
        println!("    {}", summary);
    }
}

/// Title and labels of the first few classified rows, then label counts.
pub fn display_classified_preview(rows: &[ClassifiedRow], columns: &CsvColumns, run: &MetadataRun) {
    println!(
        "\n{}",
        format!("=== Classified Papers ({} rows) ===", run.rows).bold()
    );
    if rows.is_empty() {
        println!("  No rows found. Check the CSV folder and column names.");
        return;
    }

    for classified in rows.iter().take(PREVIEW_ROWS) {
        let labels = &classified.labels;
        println!("  {}", preview(classified.row.get(&columns.title), 90).bold());
        println!(
            "    Method: {}  |  Data Type: {}  |  Region: {}",
            format_list(&labels.methods),
            format_list(&labels.data_types),
            format_list(&labels.regions)
        );
    }

    display_tally("Methods", &run.methods);
    display_tally("Data types", &run.data_types);
    display_tally("Regions", &run.regions);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scales_to_max() {
        assert_eq!(bar(10, 10), format!("[{}]", "=".repeat(BAR_WIDTH)));
        assert_eq!(bar(0, 10), format!("[{}]", " ".repeat(BAR_WIDTH)));
        assert_eq!(bar(5, 10).matches('=').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn test_bar_with_zero_max_is_empty() {
        assert_eq!(bar(0, 0).matches('=').count(), 0);
    }
}
