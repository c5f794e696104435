// Document sources: the text adapter trait, PDF and CSV loaders, and corpus
// listing.

pub mod corpus;
pub mod pdf;
pub mod table;
pub mod traits;
