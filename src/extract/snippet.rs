//! Attribute extraction from search result titles and snippets
//!
//! Profile results usually carry titles like `Jane Doe - CTO at Acme | LinkedIn`
//! and snippets like `Location: Seattle · 500+ connections`. The parser reads
//! those shapes with a handful of patterns; anything it cannot read is simply
//! left empty.

use crate::config::{FinderSettings, PatternSet};
use crate::error::Result;
use crate::results::ExtractedProfile;
use regex::Regex;

#[derive(Debug, Clone)]
pub struct SnippetParser {
    site_suffix: Regex,
    trailing_credentials: Option<Regex>,
    role_at_company: Regex,
    role_keywords: Vec<String>,
    location: Regex,
    connections: Regex,
    experience: Regex,
    at_company: Regex,
}

impl SnippetParser {
    pub fn new(settings: &FinderSettings, patterns: &PatternSet) -> Result<Self> {
        let site_suffix = Regex::new(&format!(
            r"(?i)\s*\|\s*{}\s*$",
            regex::escape(&settings.site_name)
        ))?;

        let trailing_credentials = if patterns.name_credentials.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(
                r"(?i)(?:[\s,]+(?:{})\.?)+\s*$",
                PatternSet::alternation(&patterns.name_credentials)
            ))?)
        };

        Ok(Self {
            site_suffix,
            trailing_credentials,
            role_at_company: Regex::new(r"^(.+?)\s+at\s+(.+)$")?,
            role_keywords: patterns
                .role_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            location: Regex::new(r"(?i)Location:\s*([^·•\n]+)")?,
            connections: Regex::new(r"(?i)(\d+\+?\s+connections?)")?,
            experience: Regex::new(r"(?i)Experience:\s*([^·•\n]+)")?,
            at_company: Regex::new(r"\bat\s+([A-Z][^·•\n,]+)")?,
        })
    }

    /// Extract name, job title, company, location and connections
    pub fn parse(&self, title: &str, body: &str) -> ExtractedProfile {
        let mut profile = ExtractedProfile::default();
        let title = title.trim();

        let (stripped, has_site_suffix) = match self.site_suffix.find(title) {
            Some(m) => (title[..m.start()].trim(), true),
            None => (title, false),
        };

        let (name_part, headline) = match stripped.split_once(" - ") {
            Some((name, rest)) => (name, Some(rest)),
            None => (stripped, None),
        };

        profile.name = non_empty(&self.strip_credentials(name_part));

        if has_site_suffix {
            if let Some(headline) = headline.map(str::trim).filter(|h| !h.is_empty()) {
                self.classify_headline(headline, &mut profile);
            }
        }

        profile.location = self
            .location
            .captures(body)
            .and_then(|c| non_empty(&c[1]));
        profile.connections = self
            .connections
            .captures(body)
            .and_then(|c| non_empty(&c[1]));

        if profile.company.is_none() {
            profile.company = self
                .experience
                .captures(body)
                .and_then(|c| non_empty(&c[1]))
                .or_else(|| {
                    self.at_company
                        .captures(body)
                        .and_then(|c| non_empty(c[1].trim_end_matches('.')))
                });
        }

        profile.description = non_empty(body);
        profile
    }

    fn strip_credentials(&self, name: &str) -> String {
        match &self.trailing_credentials {
            Some(re) => re.replace(name.trim(), "").trim().to_string(),
            None => name.trim().to_string(),
        }
    }

    /// Split the part after the name into job title and company
    fn classify_headline(&self, headline: &str, profile: &mut ExtractedProfile) {
        if let Some(caps) = self.role_at_company.captures(headline) {
            profile.job_title = non_empty(&caps[1]);
            profile.company = non_empty(&caps[2]);
            return;
        }

        if headline.split_whitespace().count() <= 3 && !self.has_role_keyword(headline) {
            profile.company = Some(headline.to_string());
        } else {
            profile.job_title = Some(headline.to_string());
        }
    }

    fn has_role_keyword(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.role_keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> SnippetParser {
        SnippetParser::new(&FinderSettings::default(), &PatternSet::default()).unwrap()
    }

    #[test]
    fn test_role_at_company() {
        let profile = parser().parse("John Smith - CEO at Microsoft | LinkedIn", "");
        assert_eq!(profile.name.as_deref(), Some("John Smith"));
        assert_eq!(profile.job_title.as_deref(), Some("CEO"));
        assert_eq!(profile.company.as_deref(), Some("Microsoft"));
        assert!(profile.description.is_none());
    }

    #[test]
    fn test_name_only_title_with_snippet() {
        let profile = parser().parse("Jane Doe | LinkedIn", "Location: Seattle · 500+ connections");
        assert_eq!(profile.name.as_deref(), Some("Jane Doe"));
        assert_eq!(profile.location.as_deref(), Some("Seattle"));
        assert_eq!(profile.connections.as_deref(), Some("500+ connections"));
        assert!(profile.company.is_none());
        assert!(profile.job_title.is_none());
    }

    #[test]
    fn test_short_headline_is_company() {
        let profile = parser().parse("Jane Doe - Contoso Labs | LinkedIn", "");
        assert_eq!(profile.company.as_deref(), Some("Contoso Labs"));
        assert!(profile.job_title.is_none());
    }

    #[test]
    fn test_role_keyword_headline_is_job_title() {
        let p = parser();

        let profile = p.parse("Jane Doe - Engineering Manager | LinkedIn", "");
        assert_eq!(profile.job_title.as_deref(), Some("Engineering Manager"));
        assert!(profile.company.is_none());

        let profile = p.parse("Jane Doe - Building great data products today | linkedin", "");
        assert_eq!(
            profile.job_title.as_deref(),
            Some("Building great data products today")
        );
    }

    #[test]
    fn test_headline_requires_site_suffix() {
        let profile = parser().parse("Jane Doe - Contoso", "");
        assert_eq!(profile.name.as_deref(), Some("Jane Doe"));
        assert!(profile.company.is_none());
        assert!(profile.job_title.is_none());
    }

    #[test]
    fn test_strip_trailing_credentials() {
        let p = parser();
        let profile = p.parse("John Smith, PhD - Researcher at MIT | LinkedIn", "");
        assert_eq!(profile.name.as_deref(), Some("John Smith"));

        let profile = p.parse("Robert Jones Jr. | LinkedIn", "");
        assert_eq!(profile.name.as_deref(), Some("Robert Jones"));

        let profile = p.parse("Ann Lee MBA, MS | LinkedIn", "");
        assert_eq!(profile.name.as_deref(), Some("Ann Lee"));
    }

    #[test]
    fn test_company_from_experience() {
        let profile = parser().parse(
            "Jane Doe | LinkedIn",
            "Experience: Fabrikam · Education: MIT · Location: Boston",
        );
        assert_eq!(profile.company.as_deref(), Some("Fabrikam"));
        assert_eq!(profile.location.as_deref(), Some("Boston"));
    }

    #[test]
    fn test_company_from_at_phrase() {
        let profile = parser().parse(
            "Jane Doe | LinkedIn",
            "Senior engineer at Northwind Traders, previously at Contoso.",
        );
        assert_eq!(profile.company.as_deref(), Some("Northwind Traders"));

        let profile = parser().parse("Jane Doe | LinkedIn", "works at a startup");
        assert!(profile.company.is_none());
    }

    #[test]
    fn test_title_company_wins_over_snippet() {
        let profile = parser().parse(
            "Jane Doe - CTO at Acme | LinkedIn",
            "Experience: Globex · 120 connections",
        );
        assert_eq!(profile.company.as_deref(), Some("Acme"));
        assert_eq!(profile.connections.as_deref(), Some("120 connections"));
    }

    #[test]
    fn test_empty_input() {
        let profile = parser().parse("", "");
        assert!(profile.is_empty());
        assert!(profile.description.is_none());
    }
}
