//! Candidate validation module
//!
//! A `Validator` decides whether a name or company found in a search result
//! refers to the one being looked for. Two implementations exist:
//! - `SimilarityValidator`: string similarity, always available
//! - `LlmValidator`: asks a language model, falls back to similarity on any failure

mod llm;
mod similarity;

pub use llm::{resolve_api_key, LlmClient, LlmValidator, API_KEY_VAR};
pub use similarity::SimilarityValidator;

use crate::config::Settings;
use crate::error::Result;
use crate::similarity::SimilarityScorer;
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Verdict on a pair of person names
///
/// `is_match` is the one field a reply must carry; a reply without it is
/// malformed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NameValidation {
    pub is_match: bool,
    /// Confidence in `[0.0, 1.0]`
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub same_person: bool,
    #[serde(default)]
    pub nickname_detected: bool,
}

/// Verdict on a pair of company names
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CompanyValidation {
    pub is_match: bool,
    /// Confidence in `[0.0, 1.0]`
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: String,
}

/// Name and company matching capability used by the finder
#[async_trait]
pub trait Validator: Send + Sync {
    /// Validator name for logs
    fn name(&self) -> &str;

    /// Decide whether `found` names the person `expected` names
    async fn validate_name_match(
        &self,
        expected: &str,
        found: &str,
        context: Option<&str>,
    ) -> NameValidation;

    /// Decide whether `found` names the organization `expected` names
    async fn validate_company_match(&self, expected: &str, found: &str) -> CompanyValidation;
}

/// Build the validator selected by the settings
///
/// The LLM validator is used when enabled and a credential is found;
/// otherwise the similarity validator is returned.
pub fn build_validator(settings: &Settings) -> Result<Arc<dyn Validator>> {
    let scorer = SimilarityScorer::new(&settings.finder, &settings.patterns)?;
    let similarity = SimilarityValidator::new(scorer);

    if !settings.llm.enabled {
        return Ok(Arc::new(similarity));
    }

    match LlmValidator::new(&settings.llm, similarity.clone()) {
        Ok(validator) => {
            info!("LLM validation enabled with model {}", settings.llm.model);
            Ok(Arc::new(validator))
        }
        Err(e) => {
            warn!("LLM validation not available, using string similarity: {}", e);
            Ok(Arc::new(similarity))
        }
    }
}

static SHARED: OnceCell<Arc<dyn Validator>> = OnceCell::new();

/// Process-wide validator, built on first use from the first caller's settings
pub fn shared_validator(settings: &Settings) -> Result<Arc<dyn Validator>> {
    SHARED
        .get_or_try_init(|| build_validator(settings))
        .map(Arc::clone)
}
