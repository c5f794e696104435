// Plain-text run reports.
//
// Layout is the same for every run: one block per document ("File: name"
// followed by indented "Label: a, b" lines), a blank line, then the
// aggregate sections. Counters follow keyword-list order; co-occurrence
// pairs are sorted.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::format_list;
use crate::keywords::catalog::CustomTerm;
use crate::matching::cooccurrence::CooccurrenceTracker;
use crate::pipeline::equations::{EquationResult, EquationRun};
use crate::pipeline::summaries::SummaryResult;
use crate::pipeline::tally::LabelTally;
use crate::pipeline::themes::{ThemeResult, ThemeRun, DATASETS, REGIONS, THEMES};

/// Create `path` (and its parent directory) and fill it with `write`.
pub fn save<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write(&mut out).with_context(|| format!("Failed to write {}", path.display()))?;
    out.flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn write_extraction<W: Write>(out: &mut W, error: Option<&str>) -> std::io::Result<()> {
    if let Some(reason) = error {
        writeln!(out, "  Extraction: failed ({reason})")?;
    }
    Ok(())
}

fn write_tally<W: Write>(out: &mut W, tally: &LabelTally) -> std::io::Result<()> {
    for count in tally.counts() {
        writeln!(out, "{}: {}", count.label, count.documents)?;
    }
    Ok(())
}

pub fn write_equations<W: Write>(
    out: &mut W,
    results: &[EquationResult],
    run: &EquationRun,
) -> std::io::Result<()> {
    for result in results {
        writeln!(out, "File: {}", result.file)?;
        writeln!(out, "  Category: {}", result.category)?;
        for matches in &result.subcategories {
            writeln!(
                out,
                "  {} Subcategories: {}",
                matches.base.as_str(),
                format_list(&matches.found)
            )?;
        }
        write_extraction(out, result.extraction_error.as_deref())?;
        writeln!(out)?;
    }

    writeln!(out, "\nPaper Categorization Summary:")?;
    for entry in &run.categories {
        writeln!(out, "{}: {}", entry.category, entry.documents)?;
        writeln!(out, "  Files: {}", format_list(&entry.files))?;
    }

    for entry in &run.subcategories {
        writeln!(out, "\n{} Subcategory Counts:", entry.base.as_str())?;
        write_tally(out, &entry.counts)?;
    }

    if run.extraction_failures > 0 {
        writeln!(
            out,
            "\nExtraction failures: {} of {} documents",
            run.extraction_failures, run.documents
        )?;
    }
    Ok(())
}

fn write_pairs<W: Write>(
    out: &mut W,
    heading: &str,
    tracker: &CooccurrenceTracker,
    dimensions: (&str, &str),
) -> std::io::Result<()> {
    writeln!(out, "\n{heading}:")?;
    let (left, right) = dimensions;
    if left == right {
        for (pair, count) in tracker.within(left) {
            writeln!(out, "{pair}: {count}")?;
        }
    } else {
        for ((l, r), count) in tracker.cross(left, right) {
            writeln!(out, "({l}, {r}): {count}")?;
        }
    }
    Ok(())
}

pub fn write_themes<W: Write>(
    out: &mut W,
    results: &[ThemeResult],
    run: &ThemeRun,
) -> std::io::Result<()> {
    for result in results {
        let mentions: Vec<String> = result.dataset_mentions.iter().map(|m| m.to_string()).collect();
        writeln!(out, "File: {}", result.file)?;
        writeln!(out, "  Themes: {}", format_list(&result.themes))?;
        writeln!(out, "  Datasets: {}", format_list(&result.datasets))?;
        writeln!(out, "  Regions: {}", format_list(&result.regions))?;
        writeln!(out, "  Dataset Mentions: {}", format_list(&mentions))?;
        write_extraction(out, result.extraction_error.as_deref())?;
        writeln!(out)?;
    }

    writeln!(out, "Summary of Theme Mentions (Number of PDFs that mention each theme):")?;
    write_tally(out, &run.themes)?;
    writeln!(out, "\nSummary of Dataset Mentions (Number of PDFs that mention each dataset):")?;
    write_tally(out, &run.datasets)?;
    writeln!(out, "\nSummary of Region Mentions (Number of PDFs that mention each region):")?;
    write_tally(out, &run.regions)?;

    writeln!(
        out,
        "\nNumber of papers mentioning specific regions or countries: {}",
        run.focus.regional
    )?;
    writeln!(
        out,
        "Number of papers that don't explicitly indicate either a regional or global focus: {}",
        run.focus.unclear
    )?;
    writeln!(out, "Number of papers with an explicit global focus: {}", run.focus.global)?;

    write_pairs(
        out,
        "Summary of Theme Co-occurrences (Pairs of themes appearing together)",
        &run.cooccurrence,
        (THEMES, THEMES),
    )?;
    write_pairs(
        out,
        "Summary of Theme-Dataset Co-occurrences (Themes and Datasets appearing together)",
        &run.cooccurrence,
        (THEMES, DATASETS),
    )?;
    write_pairs(
        out,
        "Summary of Region-Dataset Co-occurrences (Regions and Datasets appearing together)",
        &run.cooccurrence,
        (REGIONS, DATASETS),
    )?;

    writeln!(
        out,
        "\nSummary of Custom Term Mentions (Number of PDFs that mention detection, prevention, etc.):"
    )?;
    for term in CustomTerm::ALL {
        writeln!(out, "{} Mentions: {}", term.label(), run.term_count(term))?;
    }

    writeln!(
        out,
        "\nDocuments analyzed: {} ({} listed above, {} extraction failures)",
        run.documents,
        results.len(),
        run.extraction_failures
    )?;
    Ok(())
}

pub fn write_summaries<W: Write>(out: &mut W, results: &[SummaryResult]) -> std::io::Result<()> {
    for result in results {
        writeln!(out, "File: {}", result.file)?;
        writeln!(out, "  PDE Subcategories: {}", format_list(&result.pde_subcategories))?;
        writeln!(out, "  SDE Subcategories: {}", format_list(&result.sde_subcategories))?;
        writeln!(out, "  Summary: {}", result.summary)?;
        write_extraction(out, result.extraction_error.as_deref())?;
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::classifier::{BaseCategory, EquationCategory};
    use crate::pipeline::equations::{CategoryCount, SubcategoryCounts, SubcategoryMatches};

    fn render<F>(write: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>,
    {
        let mut buf = Vec::new();
        write(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_equation_block_layout() {
        let results = vec![EquationResult {
            file: "a.pdf".to_string(),
            category: EquationCategory::PdeOnly,
            subcategories: vec![
                SubcategoryMatches {
                    base: BaseCategory::Pde,
                    found: vec!["heat equation".to_string()],
                },
                SubcategoryMatches {
                    base: BaseCategory::Sde,
                    found: vec![],
                },
            ],
            extraction_error: None,
        }];
        let mut counts = LabelTally::new(vec!["heat equation".to_string()]);
        counts.record(&["heat equation".to_string()]);
        let run = EquationRun {
            documents: 1,
            extraction_failures: 0,
            categories: vec![CategoryCount {
                category: EquationCategory::PdeOnly,
                documents: 1,
                files: vec!["a.pdf".to_string()],
            }],
            subcategories: vec![SubcategoryCounts {
                base: BaseCategory::Pde,
                counts,
            }],
        };

        let text = render(|out| write_equations(out, &results, &run));
        assert!(text.starts_with(
            "File: a.pdf\n  Category: PDE-only\n  PDE Subcategories: heat equation\n  SDE Subcategories: None\n\n"
        ));
        assert!(text.contains("PDE-only: 1\n  Files: a.pdf\n"));
        assert!(text.contains("\nPDE Subcategory Counts:\nheat equation: 1\n"));
        assert!(!text.contains("Extraction failures"));
    }

    #[test]
    fn test_failed_extraction_is_reported() {
        let results = vec![SummaryResult {
            file: "broken.pdf".to_string(),
            pde_subcategories: vec![],
            sde_subcategories: vec![],
            summary: "LLM analysis failed.".to_string(),
            extraction_error: Some("not a PDF".to_string()),
        }];
        let text = render(|out| write_summaries(out, &results));
        assert!(text.contains("  Summary: LLM analysis failed.\n"));
        assert!(text.contains("  Extraction: failed (not a PDF)\n"));
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.txt");
        save(&path, |out| writeln!(out, "hello")).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello\n");
    }
}
