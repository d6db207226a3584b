//! Word lists driving normalization, snippet extraction and name matching
//!
//! Every list can be replaced from the `patterns` section of the settings
//! file, so the matching rules can be tuned without touching code.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternSet {
    /// Honorifics and credentials removed from names
    pub honorifics: Vec<String>,
    /// Legal-entity suffixes removed from company names
    pub legal_suffixes: Vec<String>,
    /// Credentials stripped from the end of a name found in a result title
    pub name_credentials: Vec<String>,
    /// Substrings marking a title segment as a job title rather than a company
    pub role_keywords: Vec<String>,
    /// Nickname to canonical first name
    pub nicknames: BTreeMap<String, String>,
    /// URL path fragments that never point at a personal profile
    pub excluded_paths: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for PatternSet {
    fn default() -> Self {
        let nicknames = [
            ("mike", "michael"),
            ("mikey", "michael"),
            ("bob", "robert"),
            ("bobby", "robert"),
            ("rob", "robert"),
            ("liz", "elizabeth"),
            ("beth", "elizabeth"),
            ("bill", "william"),
            ("will", "william"),
            ("jim", "james"),
            ("jimmy", "james"),
            ("tom", "thomas"),
            ("tony", "anthony"),
            ("dave", "david"),
            ("dan", "daniel"),
            ("chris", "christopher"),
            ("matt", "matthew"),
            ("nick", "nicholas"),
            ("steve", "steven"),
            ("joe", "joseph"),
            ("kate", "katherine"),
            ("katie", "katherine"),
            ("jen", "jennifer"),
            ("jenny", "jennifer"),
            ("sam", "samuel"),
            ("alex", "alexander"),
            ("andy", "andrew"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            honorifics: strings(&[
                "Dr", "Mr", "Ms", "Mrs", "Prof", "PhD", "MD", "MBA", "MS", "BS", "BA",
            ]),
            legal_suffixes: strings(&[
                "Inc",
                "LLC",
                "Corp",
                "Corporation",
                "Company",
                "Ltd",
                "Limited",
            ]),
            name_credentials: strings(&["PhD", "MD", "MBA", "MS", "BS", "BA", "Jr", "Sr"]),
            role_keywords: strings(&[
                "ceo",
                "cto",
                "cfo",
                "president",
                "director",
                "manager",
                "engineer",
                "developer",
                "analyst",
            ]),
            nicknames,
            excluded_paths: strings(&["/search", "/company", "/groups", "/jobs", "/feed"]),
        }
    }
}

impl PatternSet {
    /// Regex alternation of the given words, each escaped
    pub(crate) fn alternation(words: &[String]) -> String {
        words
            .iter()
            .map(|w| regex::escape(w.trim_end_matches('.')))
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Canonical form of a (lowercase) first name
    pub fn canonical_name<'a>(&'a self, token: &'a str) -> &'a str {
        self.nicknames.get(token).map(|s| s.as_str()).unwrap_or(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nickname_lookup() {
        let patterns = PatternSet::default();
        assert_eq!(patterns.canonical_name("mike"), "michael");
        assert_eq!(patterns.canonical_name("liz"), "elizabeth");
        assert_eq!(patterns.canonical_name("zoe"), "zoe");
    }

    #[test]
    fn test_alternation_escapes() {
        let words = vec!["Jr.".to_string(), "C++".to_string()];
        assert_eq!(PatternSet::alternation(&words), r"Jr|C\+\+");
    }
}
