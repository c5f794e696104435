// Keyword matching engine: presence tests, tagging, ranked classification,
// co-occurrence tallies and the regional focus rule.

pub mod classifier;
pub mod cooccurrence;
pub mod focus;
pub mod matcher;
pub mod tagger;
