//! Name and company similarity scoring

use super::sequence::ratio;
use crate::config::{FinderSettings, PatternSet};
use crate::error::Result;
use crate::query::{collapse_whitespace, TextNormalizer};
use regex::Regex;
use std::collections::HashSet;

/// Scores found names and companies against the expected ones
#[derive(Debug, Clone)]
pub struct SimilarityScorer {
    normalizer: TextNormalizer,
    patterns: PatternSet,
    punctuation: Regex,
    name_threshold: f64,
    company_threshold: f64,
}

impl SimilarityScorer {
    pub fn new(settings: &FinderSettings, patterns: &PatternSet) -> Result<Self> {
        Ok(Self {
            normalizer: TextNormalizer::new(patterns)?,
            patterns: patterns.clone(),
            punctuation: Regex::new(r#"[.,;:()"']"#)?,
            name_threshold: settings.name_similarity_threshold,
            company_threshold: settings.company_similarity_threshold,
        })
    }

    pub fn name_threshold(&self) -> f64 {
        self.name_threshold
    }

    pub fn company_threshold(&self) -> f64 {
        self.company_threshold
    }

    /// Lowercased name without titles or punctuation, nicknames expanded
    pub fn normalize_name(&self, name: &str) -> String {
        let cleaned = self.normalizer.clean_name(name).to_lowercase();
        let cleaned = self.punctuation.replace_all(&cleaned, " ");
        cleaned
            .split_whitespace()
            .map(|token| self.patterns.canonical_name(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether any word of the name is a known nickname
    pub fn has_nickname(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.punctuation
            .replace_all(&lower, " ")
            .split_whitespace()
            .any(|token| self.patterns.nicknames.contains_key(token))
    }

    /// Lowercased company name without legal suffixes
    pub fn normalize_company(&self, company: &str) -> String {
        collapse_whitespace(&self.normalizer.clean_company(company).to_lowercase())
    }

    /// Similarity of two person names in `[0.0, 1.0]`
    ///
    /// Token rules assume "first ... last" ordering, so the score is not
    /// symmetric for every pair of inputs.
    pub fn name_similarity(&self, expected: &str, found: &str) -> f64 {
        let expected = self.normalize_name(expected);
        let found = self.normalize_name(found);
        if expected.is_empty() || found.is_empty() {
            return 0.0;
        }
        if expected == found {
            return 1.0;
        }

        let expected_tokens: Vec<&str> = expected.split(' ').collect();
        let found_tokens: Vec<&str> = found.split(' ').collect();
        let multi_token = expected_tokens.len() >= 2 && found_tokens.len() >= 2;

        if multi_token {
            let expected_set: HashSet<&str> = expected_tokens.iter().copied().collect();
            let found_set: HashSet<&str> = found_tokens.iter().copied().collect();
            if expected_set.is_subset(&found_set) || found_set.is_subset(&expected_set) {
                return 0.95;
            }

            let (e_first, e_last) = (expected_tokens[0], expected_tokens[expected_tokens.len() - 1]);
            let (f_first, f_last) = (found_tokens[0], found_tokens[found_tokens.len() - 1]);
            if e_first == f_first && e_last == f_last {
                return 0.9;
            }
            if e_last == f_last && ratio(e_first, f_first) >= 0.8 {
                return 0.85;
            }
        }

        let whole = ratio(&expected, &found);
        if whole >= 0.85 {
            return whole;
        }

        if multi_token
            && initials(&expected_tokens) == initials(&found_tokens)
            && expected_tokens.last() == found_tokens.last()
        {
            return whole.max(0.8);
        }

        whole
    }

    /// Similarity of two company names in `[0.0, 1.0]`
    pub fn company_similarity(&self, expected: &str, found: &str) -> f64 {
        let expected = self.normalize_company(expected);
        let found = self.normalize_company(found);
        if expected.is_empty() || found.is_empty() {
            return 0.0;
        }

        let score = ratio(&expected, &found);
        if expected.contains(found.as_str()) || found.contains(expected.as_str()) {
            score.max(0.8)
        } else {
            score
        }
    }

    /// Name gate: passes when disabled or nothing was expected
    pub fn is_name_match(&self, expected: &str, found: Option<&str>) -> bool {
        if self.name_threshold <= 0.0 || expected.trim().is_empty() {
            return true;
        }
        match found.filter(|f| !f.trim().is_empty()) {
            Some(found) => self.name_similarity(expected, found) >= self.name_threshold,
            None => false,
        }
    }

    /// Company gate: passes when disabled or nothing was expected
    pub fn is_company_match(&self, expected: &str, found: Option<&str>) -> bool {
        if self.company_threshold <= 0.0 || expected.trim().is_empty() {
            return true;
        }
        match found.filter(|f| !f.trim().is_empty()) {
            Some(found) => self.company_similarity(expected, found) >= self.company_threshold,
            None => false,
        }
    }
}

fn initials(tokens: &[&str]) -> String {
    tokens.iter().filter_map(|t| t.chars().next()).collect()
}
