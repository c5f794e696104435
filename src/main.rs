use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use papersift::config::Config;
use papersift::keywords::catalog::KeywordCatalog;
use papersift::output::{charts, export, report, terminal};
use papersift::pipeline::{equations, metadata, summaries, themes};
use papersift::source::corpus::list_files;
use papersift::source::pdf::PdfSource;
use papersift::source::table::{self, CsvColumns};
use papersift::source::traits::TextSource;
use papersift::summarize::http::HttpSummarizer;

/// Papersift: keyword tallies for research paper collections.
///
/// Classifies papers by the equation families they use, tags themes,
/// datasets and regions, and writes plain-text reports, exports and charts.
#[derive(Parser)]
#[command(name = "papersift", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify PDFs as PDE / SDE / both / neither and count subcategories
    Equations {
        /// Folder of PDF papers
        dir: PathBuf,

        /// Add the Sensor category (ranked below PDE and SDE)
        #[arg(long)]
        sensors: bool,

        /// Also write a JSON export
        #[arg(long)]
        json: bool,

        /// Skip the SVG charts
        #[arg(long)]
        no_charts: bool,
    },

    /// Tag themes, datasets and regions in PDFs and track co-occurrence
    Themes {
        /// Folder of PDF papers
        dir: PathBuf,

        /// Also write a JSON export
        #[arg(long)]
        json: bool,

        /// Also draw theme, dataset and region charts
        #[arg(long)]
        charts: bool,
    },

    /// Collect PDE/SDE subcategories and an external summary for each PDF
    Summarize {
        /// Folder of PDF papers
        dir: PathBuf,
    },

    /// Tag methods, data types and regions in CSV search-result exports
    ClassifyCsv {
        /// Folder of CSV files
        dir: PathBuf,

        /// Title column name
        #[arg(long, default_value = "Document Title")]
        title_column: String,

        /// Abstract column name
        #[arg(long, default_value = "Abstract")]
        abstract_column: String,

        /// Output file (default: <output dir>/classified_papers.csv)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show configuration and keyword list sizes
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("papersift=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Equations {
            dir,
            sensors,
            json,
            no_charts,
        } => {
            let catalog = load_catalog(&config)?;
            let analyzer = equations::EquationAnalyzer::from_catalog(&catalog, sensors)?;
            let source = PdfSource::new(config.extract_timeout);
            let files = pdf_files(&source, &dir)?;

            info!(papers = files.len(), sensors, "Starting equation analysis");
            let (results, run) = equations::run(&source, &files, &analyzer).await;

            let report_path = config.output_path("equation_analysis_summary.txt");
            report::save(&report_path, |out| report::write_equations(out, &results, &run))?;
            println!("Report saved to {}", report_path.display());

            if json {
                let path = config.output_path("equation_analysis_results.json");
                export::write_json(&path, &export::Export::new(&results, &run))?;
                println!("JSON export saved to {}", path.display());
            }

            if !no_charts {
                let bars: Vec<charts::Bar> = run
                    .categories
                    .iter()
                    .map(|c| (c.category.to_string(), c.documents))
                    .collect();
                draw(charts::category_chart(
                    &config.output_path("paper_categorization.svg"),
                    "Paper Categorization",
                    "Category",
                    &bars,
                ));
                for entry in &run.subcategories {
                    let name = entry.base.as_str();
                    draw(charts::label_chart(
                        &config.output_path(format!(
                            "{}_subcategory_distribution.svg",
                            name.to_lowercase()
                        )),
                        &format!("{name} Subcategory Distribution"),
                        "Subcategories",
                        &tally_bars(&entry.counts),
                    ));
                }
            }

            terminal::display_equation_summary(&run);
        }

        Commands::Themes {
            dir,
            json,
            charts: draw_charts,
        } => {
            let catalog = load_catalog(&config)?;
            let analyzer = themes::ThemeAnalyzer::from_catalog(&catalog)?;
            let source = PdfSource::new(config.extract_timeout);
            let files = pdf_files(&source, &dir)?;

            info!(papers = files.len(), "Starting theme analysis");
            let (results, run) = themes::run(&source, &files, &analyzer).await;

            let report_path = config.output_path("pdf_analysis_report.txt");
            report::save(&report_path, |out| report::write_themes(out, &results, &run))?;
            println!("Report saved to {}", report_path.display());

            if json {
                let path = config.output_path("pdf_analysis_results.json");
                let aggregates = export::ThemeAggregates::new(&run);
                export::write_json(&path, &export::Export::new(&results, aggregates))?;
                println!("JSON export saved to {}", path.display());
            }

            if draw_charts {
                for (file, title, tally) in [
                    ("theme_frequency.svg", "Theme Mentions", &run.themes),
                    ("dataset_frequency.svg", "Dataset Mentions", &run.datasets),
                    ("region_frequency.svg", "Region Mentions", &run.regions),
                ] {
                    draw(charts::label_chart(
                        &config.output_path(file),
                        title,
                        "Label",
                        &tally_bars(tally),
                    ));
                }
            }

            terminal::display_theme_summary(&run, results.len());
        }

        Commands::Summarize { dir } => {
            let catalog = load_catalog(&config)?;
            let analyzer = summaries::SummaryAnalyzer::from_catalog(&catalog)?;
            let summarizer = HttpSummarizer::new(
                &config.summarizer_url,
                config.summarizer_api_token.clone(),
                config.summarizer_timeout,
                config.summarizer_rps,
            )?;
            let source = PdfSource::new(config.extract_timeout);
            let files = pdf_files(&source, &dir)?;

            info!(papers = files.len(), url = %config.summarizer_url, "Starting summary analysis");
            let results = summaries::run(&source, &files, &analyzer, &summarizer).await;

            let report_path = config.output_path("llm_analysis_summary.txt");
            report::save(&report_path, |out| report::write_summaries(out, &results))?;
            let json_path = config.output_path("llm_analysis_results.json");
            export::write_json(
                &json_path,
                &export::Export::new(&results, export::SummaryTotals::from_results(&results)),
            )?;
            println!("Report saved to {}", report_path.display());
            println!("JSON results saved to {}", json_path.display());

            terminal::display_summary_results(&results);
        }

        Commands::ClassifyCsv {
            dir,
            title_column,
            abstract_column,
            output,
        } => {
            let catalog = load_catalog(&config)?;
            let classifier = metadata::PaperClassifier::from_catalog(&catalog)?;
            let columns = CsvColumns {
                title: title_column,
                abstract_text: abstract_column,
            };

            let table = table::load_folder(&dir, &columns)?;
            if table.rows.is_empty() {
                warn!(folder = %dir.display(), "No CSV rows to classify");
            }
            let headers = table.headers.clone();
            let (rows, run) = metadata::run(table, &columns, &classifier);

            let path = output.unwrap_or_else(|| config.output_path("classified_papers.csv"));
            export::write_classified_csv(&path, &headers, &rows)?;

            terminal::display_classified_preview(&rows, &columns, &run);
            println!("\nClassified data saved to {}", path.display());
        }

        Commands::Status => {
            println!("{}", "=== Papersift Status ===".bold());
            papersift::status::show(&config)?;
        }
    }

    Ok(())
}

/// Load the keyword catalog named by the config. Any problem is fatal.
fn load_catalog(config: &Config) -> Result<KeywordCatalog> {
    config.require_keywords()?;
    let catalog = KeywordCatalog::load(&config.keywords_path)?;
    info!(path = %config.keywords_path.display(), lists = catalog.summary().len(), "Loaded keyword catalog");
    Ok(catalog)
}

/// PDF files in `dir`, in sorted order.
fn pdf_files(source: &PdfSource, dir: &Path) -> Result<Vec<PathBuf>> {
    let files = list_files(dir, |p| source.accepts(p))?;
    if files.is_empty() {
        warn!(folder = %dir.display(), "No PDF files found");
    }
    Ok(files)
}

fn tally_bars(tally: &papersift::pipeline::tally::LabelTally) -> Vec<charts::Bar> {
    tally
        .counts()
        .iter()
        .map(|c| (c.label.clone(), c.documents))
        .collect()
}

/// Charts are optional output: a drawing failure is logged, not fatal.
fn draw(result: Result<()>) {
    if let Err(e) = result {
        warn!(error = %e, "Failed to render chart");
    }
}
