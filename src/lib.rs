//! linkedin-finder: locate public profile pages through web search
//!
//! A lookup takes a person name with an optional company and job title,
//! runs a fixed sequence of search queries of decreasing specificity, reads
//! name and company out of the result titles and snippets, and returns the
//! first profile URL whose attributes match the input.
//!
//! ```no_run
//! use linkedin_finder::{ProfileFinder, SearchRequest, Settings};
//!
//! # async fn run() -> linkedin_finder::error::Result<()> {
//! let finder = ProfileFinder::from_settings(&Settings::default())?;
//! let outcome = finder
//!     .search(&SearchRequest::new("Jane Doe").with_company("Acme"))
//!     .await;
//! if let Some(url) = outcome.profile_url {
//!     println!("{}", url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engines;
pub mod error;
pub mod extract;
pub mod network;
pub mod query;
pub mod results;
pub mod search;
pub mod similarity;
pub mod validation;

pub use config::Settings;
pub use engines::{MetaSearch, SearchBackend, SearchParams};
pub use error::{FinderError, Result};
pub use results::{ExtractedProfile, RawResult, SearchOutcome};
pub use search::{find_profile, find_profile_simple, BatchRunner, ProfileFinder, SearchRequest};
pub use validation::{build_validator, shared_validator, Validator};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout for engine requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 10;
