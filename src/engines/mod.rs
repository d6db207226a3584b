//! Search engine module
//!
//! Defines the `SearchBackend` the finder queries, the `Engine` trait for
//! HTML search front ends, and `MetaSearch`, which dispatches to them.

mod meta;
mod registry;
mod traits;

// Engine implementations
pub mod bing;
pub mod duckduckgo;

pub use bing::Bing;
pub use duckduckgo::DuckDuckGo;
pub use meta::{MetaSearch, AUTO_BACKEND};
pub use registry::EngineRegistry;
pub use traits::*;
