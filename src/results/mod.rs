//! Search results module
//!
//! Records returned by the search backend, attributes extracted from them,
//! and the outcome of a profile lookup.

mod types;

pub use types::*;
