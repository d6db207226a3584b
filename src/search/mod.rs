//! Search orchestration module
//!
//! Runs the query strategies of a lookup against the search backend,
//! filters and validates the candidates, and fans lookups out over workers.

mod batch;
mod filter;
mod finder;
mod models;

pub use batch::{BackendFactory, BatchRunner};
pub use filter::ProfileUrlFilter;
pub use finder::{find_profile, find_profile_simple, Pipeline, ProfileFinder};
pub use models::SearchRequest;
