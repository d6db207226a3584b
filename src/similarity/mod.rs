//! Similarity scoring module
//!
//! Fuzzy comparison of person names (nicknames, initials, middle names) and
//! company names (legal suffixes, partial names).

mod scorer;
pub mod sequence;

pub use scorer::SimilarityScorer;
pub use sequence::ratio;
