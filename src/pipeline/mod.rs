// Batch runs: one per report the tool produces.
//
// Every run follows the same loop: list the corpus, load one document,
// analyze it with pure keyword passes, fold the result into a single run
// accumulator, drop the document. Only the accumulator and the per-document
// results outlive the loop.

pub mod equations;
pub mod metadata;
pub mod summaries;
pub mod tally;
pub mod themes;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for a document loop.
pub(crate) fn progress_bar(len: usize, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let template = format!("  {label} [{{bar:30}}] {{pos}}/{{len}} {{msg}}");
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}
