// Summarization: trait-based abstraction over an external service.
//
// The Summarizer trait defines the interface. HttpSummarizer implements it
// against a hosted inference endpoint; tests swap in local fakes.

pub mod http;
pub mod rate_limiter;
pub mod traits;
