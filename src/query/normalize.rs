//! Cleanup of names and company names before they reach a query or a comparison

use crate::config::PatternSet;
use crate::error::Result;
use regex::Regex;

/// Strips honorifics, credentials and legal suffixes from free text
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    honorifics: Option<Regex>,
    legal_suffixes: Option<Regex>,
}

impl TextNormalizer {
    pub fn new(patterns: &PatternSet) -> Result<Self> {
        Ok(Self {
            honorifics: word_regex(&patterns.honorifics)?,
            legal_suffixes: word_regex(&patterns.legal_suffixes)?,
        })
    }

    /// Remove titles and credentials, commas and redundant whitespace from a name
    pub fn clean_name(&self, name: &str) -> String {
        if name.trim().is_empty() {
            return String::new();
        }

        let name = name.replace(',', " ");
        let name = match &self.honorifics {
            Some(re) => re.replace_all(&name, " ").into_owned(),
            None => name,
        };
        collapse_whitespace(&name)
    }

    /// Remove legal-entity suffixes from a company name
    pub fn clean_company(&self, company: &str) -> String {
        if company.trim().is_empty() {
            return String::new();
        }

        let company = match &self.legal_suffixes {
            Some(re) => re.replace_all(company, " ").into_owned(),
            None => company.to_string(),
        };
        collapse_whitespace(&company)
            .trim_matches(|c: char| c == ',' || c.is_whitespace())
            .to_string()
    }

    /// Job titles go through the same cleanup as names
    pub fn clean_job_title(&self, title: &str) -> String {
        self.clean_name(title)
    }
}

/// Case-insensitive whole-word matcher for a word list, with an optional trailing dot
fn word_regex(words: &[String]) -> Result<Option<Regex>> {
    if words.is_empty() {
        return Ok(None);
    }
    let pattern = format!(r"(?i)\b(?:{})\b\.?", PatternSet::alternation(words));
    Ok(Some(Regex::new(&pattern)?))
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
