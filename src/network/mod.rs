//! HTTP networking module
//!
//! The reqwest client shared by the search engines, with browser-like headers.

mod client;
mod user_agent;

pub use client::HttpClient;
pub use user_agent::{accept_language, generate_user_agent};
