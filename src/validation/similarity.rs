//! Validator backed by string similarity

use super::{CompanyValidation, NameValidation, Validator};
use crate::similarity::SimilarityScorer;
use async_trait::async_trait;

/// Always-available validator using the similarity thresholds
#[derive(Debug, Clone)]
pub struct SimilarityValidator {
    scorer: SimilarityScorer,
}

impl SimilarityValidator {
    pub fn new(scorer: SimilarityScorer) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &SimilarityScorer {
        &self.scorer
    }

    pub fn check_name(&self, expected: &str, found: &str) -> NameValidation {
        let confidence = self.scorer.name_similarity(expected, found);
        let is_match = self.scorer.is_name_match(expected, Some(found));
        NameValidation {
            is_match,
            confidence,
            reasoning: format!(
                "String similarity {:.2} against threshold {:.2}",
                confidence,
                self.scorer.name_threshold()
            ),
            same_person: is_match,
            nickname_detected: self.scorer.has_nickname(expected)
                || self.scorer.has_nickname(found),
        }
    }

    pub fn check_company(&self, expected: &str, found: &str) -> CompanyValidation {
        let confidence = self.scorer.company_similarity(expected, found);
        CompanyValidation {
            is_match: self.scorer.is_company_match(expected, Some(found)),
            confidence,
            reasoning: format!(
                "String similarity {:.2} against threshold {:.2}",
                confidence,
                self.scorer.company_threshold()
            ),
        }
    }
}

#[async_trait]
impl Validator for SimilarityValidator {
    fn name(&self) -> &str {
        "similarity"
    }

    async fn validate_name_match(
        &self,
        expected: &str,
        found: &str,
        _context: Option<&str>,
    ) -> NameValidation {
        self.check_name(expected, found)
    }

    async fn validate_company_match(&self, expected: &str, found: &str) -> CompanyValidation {
        self.check_company(expected, found)
    }
}
