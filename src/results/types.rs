//! Result type definitions

use crate::query::{SearchStrategy, Strategy};
use serde::{Deserialize, Serialize};

/// A single record returned by the search backend for one query
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawResult {
    /// The URL of the result
    pub url: String,
    /// The title of the result
    pub title: String,
    /// Content snippet
    #[serde(default)]
    pub body: String,
}

impl RawResult {
    pub fn new(url: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Attributes recovered from a result's title and snippet
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractedProfile {
    pub name: Option<String>,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub connections: Option<String>,
    pub description: Option<String>,
}

impl ExtractedProfile {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.job_title.is_none()
            && self.company.is_none()
            && self.location.is_none()
            && self.connections.is_none()
    }

    /// Short "job title at company" context for name validation
    pub fn context(&self) -> Option<String> {
        match (&self.job_title, &self.company) {
            (Some(job), Some(company)) => Some(format!("{} at {}", job, company)),
            (Some(job), None) => Some(job.clone()),
            (None, Some(company)) => Some(company.clone()),
            (None, None) => None,
        }
    }
}

/// Final result of one profile lookup
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted: Option<ExtractedProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_used: Option<String>,
    /// 1-based position of the strategy that produced the profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchOutcome {
    /// A profile accepted from `result` under `strategy`
    pub fn found(result: &RawResult, extracted: ExtractedProfile, strategy: &SearchStrategy) -> Self {
        let description = Some(result.body.trim().to_string()).filter(|d| !d.is_empty());
        Self {
            success: true,
            profile_url: Some(result.url.clone()),
            title: Some(result.title.clone()),
            description,
            extracted: Some(extracted),
            query_used: Some(strategy.query.clone()),
            strategy_index: Some(strategy.index),
            strategy: Some(strategy.kind),
            error: None,
        }
    }

    /// A failed lookup with a diagnostic message
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_outcome() {
        let result = RawResult::new(
            "https://www.linkedin.com/in/janedoe",
            "Jane Doe - Acme | LinkedIn",
            "  Location: Seattle ",
        );
        let strategy = SearchStrategy {
            index: 3,
            kind: Strategy::KeywordLast,
            query: "\"Jane Doe\" \"Acme\" linkedin".to_string(),
        };
        let outcome = SearchOutcome::found(&result, ExtractedProfile::default(), &strategy);

        assert!(outcome.success);
        assert_eq!(outcome.profile_url.as_deref(), Some(result.url.as_str()));
        assert_eq!(outcome.strategy_index, Some(3));
        assert_eq!(outcome.description.as_deref(), Some("Location: Seattle"));
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_failure_serialization() {
        let outcome = SearchOutcome::failure("nothing found");
        assert!(!outcome.success);
        assert!(outcome.profile_url.is_none());

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "nothing found");
        assert!(json.get("profile_url").is_none());
    }

    #[test]
    fn test_profile_context() {
        let profile = ExtractedProfile {
            job_title: Some("CEO".to_string()),
            company: Some("Acme".to_string()),
            ..Default::default()
        };
        assert_eq!(profile.context().as_deref(), Some("CEO at Acme"));
        assert!(ExtractedProfile::default().context().is_none());
        assert!(ExtractedProfile::default().is_empty());
    }
}
