//! Search query synthesis
//!
//! Each person lookup is tried with a fixed sequence of query strategies,
//! from the quoted name/company pair down to loose fallbacks.

use crate::config::FinderSettings;
use crate::error::{FinderError, Result};
use serde::{Deserialize, Serialize};

/// The fallback approaches, in the order they are tried
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// `linkedin "<name>" "<company>"`
    QuotedNameCompany,
    /// `linkedin <name> <company>`
    Unquoted,
    /// `"<name>" "<company>" linkedin`
    KeywordLast,
    /// `linkedin "<name>"`
    NameOnly,
    /// `linkedin "<name>" "<company>" "<job title>"`
    WithJobTitle,
    /// `site:linkedin.com/in/ "<name>" "<company>"`
    SiteRestricted,
    /// `linkedin "<name>" "<first word of company>"`
    CompanyFirstWord,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuotedNameCompany => "quoted_name_company",
            Self::Unquoted => "unquoted",
            Self::KeywordLast => "keyword_last",
            Self::NameOnly => "name_only",
            Self::WithJobTitle => "with_job_title",
            Self::SiteRestricted => "site_restricted",
            Self::CompanyFirstWord => "company_first_word",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One query to run, with its 1-based position in the attempt order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStrategy {
    pub index: usize,
    pub kind: Strategy,
    pub query: String,
}

/// Builds the ordered, duplicate-free list of queries for one person
#[derive(Debug, Clone)]
pub struct QuerySynthesizer {
    keyword: String,
    site_marker: String,
}

impl QuerySynthesizer {
    pub fn new(settings: &FinderSettings) -> Self {
        Self {
            keyword: settings.site_keyword.clone(),
            site_marker: settings.profile_marker(),
        }
    }

    /// Synthesize queries from already cleaned name, company and job title
    pub fn synthesize(&self, name: &str, company: &str, job_title: &str) -> Vec<SearchStrategy> {
        let name = name.trim();
        let company = company.trim();
        let job_title = job_title.trim();
        let kw = &self.keyword;

        let mut candidates: Vec<(Strategy, String)> = Vec::with_capacity(7);
        if name.is_empty() {
            return Vec::new();
        }

        if company.is_empty() {
            candidates.push((Strategy::QuotedNameCompany, format!("{} \"{}\"", kw, name)));
            candidates.push((Strategy::Unquoted, format!("{} {}", kw, name)));
        } else {
            candidates.push((
                Strategy::QuotedNameCompany,
                format!("{} \"{}\" \"{}\"", kw, name, company),
            ));
            candidates.push((Strategy::Unquoted, format!("{} {} {}", kw, name, company)));
            candidates.push((
                Strategy::KeywordLast,
                format!("\"{}\" \"{}\" {}", name, company, kw),
            ));
        }

        candidates.push((Strategy::NameOnly, format!("{} \"{}\"", kw, name)));

        if !company.is_empty() {
            if !job_title.is_empty() {
                candidates.push((
                    Strategy::WithJobTitle,
                    format!("{} \"{}\" \"{}\" \"{}\"", kw, name, company, job_title),
                ));
            }

            candidates.push((
                Strategy::SiteRestricted,
                format!("site:{} \"{}\" \"{}\"", self.site_marker, name, company),
            ));

            let words: Vec<&str> = company.split_whitespace().collect();
            if words.len() >= 2 {
                candidates.push((
                    Strategy::CompanyFirstWord,
                    format!("{} \"{}\" \"{}\"", kw, name, words[0]),
                ));
            }
        }

        let mut strategies: Vec<SearchStrategy> = Vec::with_capacity(candidates.len());
        for (kind, query) in candidates {
            if strategies.iter().any(|s| s.query == query) {
                continue;
            }
            strategies.push(SearchStrategy {
                index: strategies.len() + 1,
                kind,
                query,
            });
        }
        strategies
    }
}

/// Split a free-form query into (name, company)
///
/// The last word is taken as the company, everything before it as the name.
pub fn split_simple_query(query: &str) -> Result<(String, String)> {
    let parts: Vec<&str> = query.split_whitespace().collect();
    match parts.as_slice() {
        [] | [_] => Err(FinderError::InvalidRequest(
            "Query must contain at least a name and company".to_string(),
        )),
        [name @ .., company] => Ok((name.join(" "), company.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthesizer() -> QuerySynthesizer {
        QuerySynthesizer::new(&FinderSettings::default())
    }

    #[test]
    fn test_single_word_company_skips_first_word_strategy() {
        let strategies = synthesizer().synthesize("John Smith", "Microsoft", "");
        let queries: Vec<&str> = strategies.iter().map(|s| s.query.as_str()).collect();

        assert_eq!(
            queries,
            vec![
                "linkedin \"John Smith\" \"Microsoft\"",
                "linkedin John Smith Microsoft",
                "\"John Smith\" \"Microsoft\" linkedin",
                "linkedin \"John Smith\"",
                "site:linkedin.com/in/ \"John Smith\" \"Microsoft\"",
            ]
        );
    }

    #[test]
    fn test_multi_word_company_adds_first_word() {
        let strategies = synthesizer().synthesize("John Smith", "Acme Widgets", "");
        assert_eq!(strategies.len(), 6);

        let kinds: Vec<Strategy> = strategies.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                Strategy::QuotedNameCompany,
                Strategy::Unquoted,
                Strategy::KeywordLast,
                Strategy::NameOnly,
                Strategy::SiteRestricted,
                Strategy::CompanyFirstWord,
            ]
        );
        assert_eq!(strategies[5].query, "linkedin \"John Smith\" \"Acme\"");

        let indices: Vec<usize> = strategies.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5, 6]);

        for s in &strategies {
            assert!(s.query.contains("linkedin"));
        }
    }

    #[test]
    fn test_all_strategies() {
        let strategies = synthesizer().synthesize("Jane Doe", "Big Data Co", "CTO");
        assert_eq!(strategies.len(), 7);
        assert_eq!(strategies[4].kind, Strategy::WithJobTitle);
        assert_eq!(
            strategies[4].query,
            "linkedin \"Jane Doe\" \"Big Data Co\" \"CTO\""
        );
    }

    #[test]
    fn test_job_title_needs_company() {
        let strategies = synthesizer().synthesize("Jane Doe", "", "CTO");
        assert!(strategies.iter().all(|s| s.kind != Strategy::WithJobTitle));
    }

    #[test]
    fn test_name_only_is_deduplicated() {
        let strategies = synthesizer().synthesize("Jane Doe", "", "");
        let queries: Vec<&str> = strategies.iter().map(|s| s.query.as_str()).collect();
        assert_eq!(queries, vec!["linkedin \"Jane Doe\"", "linkedin Jane Doe"]);
        assert_eq!(strategies[1].index, 2);
    }

    #[test]
    fn test_empty_name() {
        assert!(synthesizer().synthesize("", "Acme", "").is_empty());
    }

    #[test]
    fn test_split_simple_query() {
        assert_eq!(
            split_simple_query("John Microsoft").unwrap(),
            ("John".to_string(), "Microsoft".to_string())
        );
        assert_eq!(
            split_simple_query(" John  Smith Microsoft ").unwrap(),
            ("John Smith".to_string(), "Microsoft".to_string())
        );
        assert!(split_simple_query("John").is_err());
        assert!(split_simple_query("   ").is_err());
    }
}
