// Status display: effective configuration and the loaded keyword catalog.

use anyhow::Result;
use colored::Colorize;

use crate::config::Config;
use crate::keywords::catalog::{KeywordCatalog, ListName};

/// Display configuration and keyword list sizes.
pub fn show(config: &Config) -> Result<()> {
    println!("Keyword file: {}", config.keywords_path.display());
    println!("Output directory: {}", config.output_dir.display());
    println!("PDF extraction timeout: {}s", config.extract_timeout.as_secs());
    println!("Summarizer: {}", config.summarizer_url);
    println!(
        "  Token: {}  |  Timeout: {}s  |  Rate: {} req/s",
        if config.summarizer_api_token.is_some() {
            "set".green()
        } else {
            "not set".dimmed()
        },
        config.summarizer_timeout.as_secs(),
        config.summarizer_rps
    );

    if !config.keywords_path.is_file() {
        println!("\nKeyword lists: {}", "keyword file not found".red());
        return Ok(());
    }

    let catalog = KeywordCatalog::load(&config.keywords_path)?;
    println!("\nKeyword lists:");
    for (name, labels, keywords) in catalog.summary() {
        if name.is_dimension() && labels != keywords {
            println!("  {:<24} {:>3} labels, {:>3} keywords", name.key(), labels, keywords);
        } else {
            println!("  {:<24} {:>3} keywords", name.key(), keywords);
        }
    }

    let missing: Vec<&str> = ListName::ALL
        .iter()
        .filter(|name| !catalog.contains(**name))
        .map(|name| name.key())
        .collect();
    if !missing.is_empty() {
        println!("  {} {}", "missing:".yellow(), missing.join(", "));
    }

    Ok(())
}
