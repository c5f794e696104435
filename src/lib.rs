// Papersift: keyword tallies for research paper collections
//
// This is the library root. Each module corresponds to one stage of a run:
// keyword catalog, matching engine, document sources, the summarization
// collaborator, the batch runs themselves and their reports.

pub mod config;
pub mod keywords;
pub mod matching;
pub mod output;
pub mod pipeline;
pub mod source;
pub mod status;
pub mod summarize;
