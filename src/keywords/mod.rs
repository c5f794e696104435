// Keyword lists: named, ordered trigger strings and the catalog that loads them.

pub mod catalog;
pub mod list;
