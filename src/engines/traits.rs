//! Search backend seam and the request/response shapes of HTML engines

use crate::config::{SafeSearch, SearchSettings};
use crate::results::RawResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameters of one search backend call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    pub query: String,
    pub max_results: usize,
    /// Region code, e.g. "us-en"
    pub region: String,
    pub safesearch: SafeSearch,
    /// Engine name, or "auto" to let the backend choose
    pub backend: String,
}

impl SearchParams {
    /// Create parameters with default region and safety
    pub fn new(query: impl Into<String>) -> Self {
        Self::from_settings(query, &SearchSettings::default())
    }

    /// Create parameters from search settings
    pub fn from_settings(query: impl Into<String>, settings: &SearchSettings) -> Self {
        Self {
            query: query.into(),
            max_results: settings.max_results,
            region: settings.region.clone(),
            safesearch: settings.safesearch,
            backend: settings.backend.clone(),
        }
    }

    /// Language part of the region ("us-en" -> "en")
    pub fn language(&self) -> &str {
        self.region.rsplit('-').next().unwrap_or("en")
    }

    /// Country part of the region ("us-en" -> "us")
    pub fn country(&self) -> &str {
        self.region.split('-').next().unwrap_or("us")
    }
}

/// External web search used to find profile candidates
///
/// Implementations return at most `params.max_results` records in the
/// engine's ranking order. Any error counts as "no results" for that query.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, params: &SearchParams) -> anyhow::Result<Vec<RawResult>>;
}

/// One page load an engine asks the HTTP client to perform
///
/// Cookies are sent as a single `Cookie` header; a form body turns the
/// request into an urlencoded POST.
#[derive(Debug, Clone)]
pub struct EngineRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub params: HashMap<String, String>,
    pub cookies: HashMap<String, String>,
    pub body: Option<RequestBody>,
}

impl EngineRequest {
    fn with_method(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            headers: HashMap::new(),
            params: HashMap::new(),
            cookies: HashMap::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::with_method(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::with_method(HttpMethod::Post, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// URL query parameter
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Urlencoded form body
    pub fn form(mut self, fields: HashMap<String, String>) -> Self {
        self.body = Some(RequestBody::Form(fields));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Form(HashMap<String, String>),
}

/// Phrases of the bot-check pages engines serve instead of results
const BOT_CHECK_MARKERS: &[&str] = &["captcha", "unusual traffic", "automated requests"];

/// Status, final URL and body of an engine page
#[derive(Debug)]
pub struct EngineResponse {
    pub status: u16,
    pub text: String,
    pub url: String,
}

impl EngineResponse {
    /// Why this page cannot hold results, if it cannot
    pub fn rejection(&self) -> Option<String> {
        match self.status {
            429 => Some("rate limited (HTTP 429)".to_string()),
            200..=299 => {
                let page = self.text.to_lowercase();
                BOT_CHECK_MARKERS
                    .iter()
                    .any(|marker| page.contains(marker))
                    .then(|| "bot check page returned".to_string())
            }
            status => Some(format!("HTTP error: {}", status)),
        }
    }

    pub fn ensure_usable(&self) -> anyhow::Result<()> {
        match self.rejection() {
            Some(reason) => Err(anyhow::anyhow!(reason)),
            None => Ok(()),
        }
    }
}

/// An HTML search front end: builds a request and parses the response page
pub trait Engine: Send + Sync {
    fn name(&self) -> &str;

    /// Seconds before the page load is abandoned
    fn timeout(&self) -> f64 {
        crate::DEFAULT_TIMEOUT as f64
    }

    fn request(&self, params: &SearchParams) -> anyhow::Result<EngineRequest>;

    /// Parse the HTTP response into results, in ranking order
    fn response(&self, response: EngineResponse) -> anyhow::Result<Vec<RawResult>>;
}
