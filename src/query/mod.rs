//! Query preparation module
//!
//! Turns a person lookup into search engine queries:
//! - Name and company cleanup (titles, credentials, legal suffixes)
//! - Fallback query strategies, tried in a fixed order
//! - Splitting of free-form "name company" queries

mod normalize;
mod strategies;

pub use normalize::TextNormalizer;
pub use strategies::{split_simple_query, QuerySynthesizer, SearchStrategy, Strategy};

pub(crate) use normalize::collapse_whitespace;
