//! Settings structures for the profile finder

use super::patterns::PatternSet;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Floor applied to the delay between two search queries, in seconds
pub const MIN_DELAY_SECONDS: f64 = 1.0;

/// Main settings structure matching `linkedin-finder.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub finder: FinderSettings,
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
    pub llm: LlmSettings,
    pub patterns: PatternSet,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (LINKEDIN_FINDER_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("LINKEDIN_FINDER_DELAY") {
            if let Ok(delay) = val.parse() {
                self.finder.min_delay_seconds = delay;
            }
        }
        if let Ok(val) = std::env::var("LINKEDIN_FINDER_NAME_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                self.finder.name_similarity_threshold = threshold;
            }
        }
        if let Ok(val) = std::env::var("LINKEDIN_FINDER_COMPANY_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                self.finder.company_similarity_threshold = threshold;
            }
        }
        if let Ok(val) = std::env::var("LINKEDIN_FINDER_BACKEND") {
            self.search.backend = val;
        }
        if let Ok(val) = std::env::var("GROQ_API_KEY") {
            if !val.trim().is_empty() && self.llm.api_key.is_none() {
                self.llm.api_key = Some(val);
            }
        }
    }

    /// Clamp values into their valid ranges
    ///
    /// NaN and infinite numbers are replaced by the defaults.
    pub fn normalize(&mut self) {
        let defaults = FinderSettings::default();
        let finder = &mut self.finder;
        finder.min_delay_seconds = delay_seconds(finder.min_delay_seconds);
        finder.name_similarity_threshold = threshold(
            "name_similarity_threshold",
            finder.name_similarity_threshold,
            defaults.name_similarity_threshold,
        );
        finder.company_similarity_threshold = threshold(
            "company_similarity_threshold",
            finder.company_similarity_threshold,
            defaults.company_similarity_threshold,
        );
        self.search.max_results = self.search.max_results.max(1);

        let timeout = self.outgoing.request_timeout;
        if !timeout.is_finite() || timeout <= 0.0 {
            warn!("Invalid request_timeout {}, using {}s", timeout, crate::DEFAULT_TIMEOUT);
            self.outgoing.request_timeout = crate::DEFAULT_TIMEOUT as f64;
        }
    }
}

fn delay_seconds(value: f64) -> f64 {
    if value.is_finite() {
        value.max(MIN_DELAY_SECONDS)
    } else {
        warn!("Invalid min_delay_seconds {}, using {}s", value, MIN_DELAY_SECONDS);
        MIN_DELAY_SECONDS
    }
}

fn threshold(key: &str, value: f64, default: f64) -> f64 {
    if value.is_nan() {
        warn!("{} is NaN, using {}", key, default);
        default
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Seconds as a duration, `fallback` when negative, NaN or too large
fn seconds(value: f64, fallback: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or_else(|_| Duration::from_secs_f64(fallback))
}

/// Matching behaviour of one finder instance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderSettings {
    /// Delay before every search query, never below one second
    pub min_delay_seconds: f64,
    /// Minimum name similarity; 0 disables name validation
    pub name_similarity_threshold: f64,
    /// Minimum company similarity; 0 disables company validation
    pub company_similarity_threshold: f64,
    /// Domain hosting the profiles
    pub target_site: String,
    /// Keyword added to free-text queries
    pub site_keyword: String,
    /// Site name as it appears in result titles ("... | LinkedIn")
    pub site_name: String,
}

impl FinderSettings {
    /// Effective delay between queries
    pub fn delay(&self) -> Duration {
        seconds(delay_seconds(self.min_delay_seconds), MIN_DELAY_SECONDS)
    }

    /// Builder-style delay override
    pub fn with_delay(mut self, seconds: f64) -> Self {
        self.min_delay_seconds = delay_seconds(seconds);
        self
    }

    /// Builder-style threshold override
    pub fn with_thresholds(mut self, name: f64, company: f64) -> Self {
        let defaults = Self::default();
        self.name_similarity_threshold =
            threshold("name_similarity_threshold", name, defaults.name_similarity_threshold);
        self.company_similarity_threshold = threshold(
            "company_similarity_threshold",
            company,
            defaults.company_similarity_threshold,
        );
        self
    }

    /// Path marker every accepted profile URL must contain
    pub fn profile_marker(&self) -> String {
        format!("{}/in/", self.target_site.to_lowercase())
    }
}

impl Default for FinderSettings {
    fn default() -> Self {
        Self {
            min_delay_seconds: MIN_DELAY_SECONDS,
            name_similarity_threshold: 0.8,
            company_similarity_threshold: 0.6,
            target_site: "linkedin.com".to_string(),
            site_keyword: "linkedin".to_string(),
            site_name: "LinkedIn".to_string(),
        }
    }
}

/// Safe search level passed to the search backend
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SafeSearch {
    Off,
    #[default]
    Moderate,
    Strict,
}

impl SafeSearch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Moderate => "moderate",
            Self::Strict => "strict",
        }
    }
}

/// Parameters of every search backend call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Upper bound of results requested per query
    pub max_results: usize,
    /// Region code, e.g. "us-en"
    pub region: String,
    /// Safe search level
    pub safesearch: SafeSearch,
    /// Backend hint: an engine name or "auto"
    pub backend: String,
    /// Engines tried by the "auto" backend, in order
    pub engines: Vec<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: 10,
            region: "us-en".to_string(),
            safesearch: SafeSearch::Moderate,
            backend: "auto".to_string(),
            engines: vec!["duckduckgo".to_string(), "bing".to_string()],
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
    /// Extra headers to send
    pub extra_headers: HashMap<String, String>,
}

impl OutgoingSettings {
    /// Per-request timeout, at least one second
    pub fn timeout(&self) -> Duration {
        seconds(self.request_timeout.max(1.0), crate::DEFAULT_TIMEOUT as f64)
    }
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: crate::DEFAULT_TIMEOUT as f64,
            pool_maxsize: 10,
            verify_ssl: true,
            proxies: ProxySettings::default(),
            extra_headers: HashMap::new(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Optional language-model validator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Use the LLM validator when a credential is available
    pub enabled: bool,
    /// API key; falls back to GROQ_API_KEY and a local .env file
    pub api_key: Option<String>,
    /// OpenAI-compatible API root
    pub base_url: String,
    /// Model used for validation prompts
    pub model: String,
    /// Request timeout in seconds
    pub timeout: f64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
            timeout: 15.0,
        }
    }
}
