//! Search request model

use serde::{Deserialize, Serialize};

/// Input of one profile lookup
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchRequest {
    /// Person name, required
    pub name: String,
    /// Current or past employer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Job title
    #[serde(default, alias = "jobTitle", skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
}

impl SearchRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_job_title(mut self, job_title: impl Into<String>) -> Self {
        self.job_title = Some(job_title.into());
        self
    }

    pub fn company(&self) -> &str {
        self.company.as_deref().unwrap_or_default()
    }

    pub fn job_title(&self) -> &str {
        self.job_title.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_file_entries() {
        let json = r#"[
            {"name": "Jane Doe", "company": "Acme"},
            {"name": "John Smith", "jobTitle": "CEO"},
            {"name": "Ann Lee", "company": "Globex", "job_title": "CTO"}
        ]"#;
        let requests: Vec<SearchRequest> = serde_json::from_str(json).unwrap();

        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0], SearchRequest::new("Jane Doe").with_company("Acme"));
        assert_eq!(requests[1].job_title(), "CEO");
        assert_eq!(requests[1].company(), "");
        assert_eq!(requests[2].job_title.as_deref(), Some("CTO"));
    }
}
