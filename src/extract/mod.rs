//! Snippet extraction module
//!
//! Reads structured profile attributes out of unstructured result text.

mod snippet;

pub use snippet::SnippetParser;
