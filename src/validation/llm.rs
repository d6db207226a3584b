//! Validator backed by a hosted language model
//!
//! Talks to any OpenAI-compatible chat completion endpoint (Groq by default)
//! and asks for a JSON verdict. Every failure path answers with the
//! similarity validator instead, so a lookup never stalls on the model.

use super::similarity::SimilarityValidator;
use super::{CompanyValidation, NameValidation, Validator};
use crate::config::LlmSettings;
use crate::error::{FinderError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const NAME_SYSTEM_PROMPT: &str = r#"You are a name validation expert. Decide whether two names refer to the same person.

Consider nicknames (Mike/Michael, Liz/Elizabeth), cultural variations, name ordering, titles and credentials, spelling variations, and middle names or initials.

Respond with a JSON object only:
{"is_match": boolean, "confidence": number between 0 and 1, "reasoning": string, "same_person": boolean, "nickname_detected": boolean}

Be conservative: only report a match when you are confident."#;

const COMPANY_SYSTEM_PROMPT: &str = r#"You are a company name validation expert. Decide whether two company names refer to the same organization.

Consider legal forms (Inc, LLC, Corp, Ltd), abbreviations (IBM / International Business Machines), brand versus legal names, subsidiaries and international variations.

Respond with a JSON object only:
{"is_match": boolean, "confidence": number between 0 and 1, "reasoning": string}"#;

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "GROQ_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// Minimal chat completion client
#[derive(Clone)]
pub struct LlmClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(settings: &LlmSettings, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(FinderError::MissingCredential(format!(
                "{} is empty",
                API_KEY_VAR
            )));
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs_f64(settings.timeout.max(1.0)))
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one system + user prompt and return the reply text
    pub async fn complete(&self, system: &str, prompt: &str, max_tokens: u32) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: 0.1,
            max_tokens,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FinderError::Llm(format!("HTTP {}: {}", status.as_u16(), body)));
        }

        let chat: ChatResponse = response.json().await?;
        chat.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| FinderError::Llm("response has no choices".to_string()))
    }

    /// Send a prompt and decode the JSON object in the reply
    pub async fn complete_json<T: DeserializeOwned>(
        &self,
        system: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<T> {
        let content = self.complete(system, prompt, max_tokens).await?;
        debug!(model = %self.model, "LLM reply: {}", content);
        Ok(serde_json::from_str(json_object(&content))?)
    }
}

/// The outermost `{...}` of a reply, tolerating code fences around it
fn json_object(content: &str) -> &str {
    match (content.find('{'), content.rfind('}')) {
        (Some(start), Some(end)) if start < end => &content[start..=end],
        _ => content.trim(),
    }
}

/// Find the API key: settings, then environment, then a local `.env` file
pub fn resolve_api_key(settings: &LlmSettings) -> Option<String> {
    let non_blank = |key: String| Some(key).filter(|k| !k.trim().is_empty());

    settings
        .api_key
        .clone()
        .and_then(non_blank)
        .or_else(|| std::env::var(API_KEY_VAR).ok().and_then(non_blank))
        .or_else(|| {
            dotenvy::from_filename_iter(".env")
                .ok()?
                .filter_map(|entry| entry.ok())
                .find(|(key, _)| key == API_KEY_VAR)
                .and_then(|(_, value)| non_blank(value))
        })
}

/// LLM validator with similarity fallback
pub struct LlmValidator {
    client: LlmClient,
    fallback: SimilarityValidator,
}

impl LlmValidator {
    /// Build from settings; fails when no credential can be found
    pub fn new(settings: &LlmSettings, fallback: SimilarityValidator) -> Result<Self> {
        let api_key = resolve_api_key(settings).ok_or_else(|| {
            FinderError::MissingCredential(format!(
                "set {} or llm.api_key to enable LLM validation",
                API_KEY_VAR
            ))
        })?;
        Self::with_api_key(settings, api_key, fallback)
    }

    pub fn with_api_key(
        settings: &LlmSettings,
        api_key: impl Into<String>,
        fallback: SimilarityValidator,
    ) -> Result<Self> {
        Ok(Self {
            client: LlmClient::new(settings, api_key)?,
            fallback,
        })
    }
}

#[async_trait]
impl Validator for LlmValidator {
    fn name(&self) -> &str {
        "llm"
    }

    async fn validate_name_match(
        &self,
        expected: &str,
        found: &str,
        context: Option<&str>,
    ) -> NameValidation {
        if expected.trim().is_empty() || found.trim().is_empty() {
            return self.fallback.check_name(expected, found);
        }

        let context_line = context
            .map(|c| format!("\nContext: {}", c))
            .unwrap_or_default();
        let prompt = format!(
            "Compare these two names:\nExpected: \"{}\"\nFound: \"{}\"{}\n\nAre these the same person? Respond with JSON only.",
            expected, found, context_line
        );

        match self
            .client
            .complete_json::<NameValidation>(NAME_SYSTEM_PROMPT, &prompt, 200)
            .await
        {
            Ok(mut verdict) => {
                verdict.confidence = verdict.confidence.clamp(0.0, 1.0);
                verdict
            }
            Err(e) => {
                warn!("LLM name validation failed, using similarity: {}", e);
                let mut verdict = self.fallback.check_name(expected, found);
                verdict.reasoning = format!("Fallback after LLM error: {}", verdict.reasoning);
                verdict
            }
        }
    }

    async fn validate_company_match(&self, expected: &str, found: &str) -> CompanyValidation {
        if expected.trim().is_empty() || found.trim().is_empty() {
            return self.fallback.check_company(expected, found);
        }

        let prompt = format!(
            "Compare these company names:\nExpected: \"{}\"\nFound: \"{}\"\n\nAre these the same company? Respond with JSON only.",
            expected, found
        );

        match self
            .client
            .complete_json::<CompanyValidation>(COMPANY_SYSTEM_PROMPT, &prompt, 150)
            .await
        {
            Ok(mut verdict) => {
                verdict.confidence = verdict.confidence.clamp(0.0, 1.0);
                verdict
            }
            Err(e) => {
                warn!("LLM company validation failed, using similarity: {}", e);
                let mut verdict = self.fallback.check_company(expected, found);
                verdict.reasoning = format!("Fallback after LLM error: {}", verdict.reasoning);
                verdict
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FinderSettings, PatternSet};
    use crate::similarity::SimilarityScorer;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fallback() -> SimilarityValidator {
        let scorer =
            SimilarityScorer::new(&FinderSettings::default(), &PatternSet::default()).unwrap();
        SimilarityValidator::new(scorer)
    }

    fn settings(base_url: &str) -> LlmSettings {
        LlmSettings {
            enabled: true,
            base_url: base_url.to_string(),
            ..Default::default()
        }
    }

    fn chat_reply(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": content } }
            ]
        })
    }

    #[test]
    fn test_blank_key_is_missing_credential() {
        let result = LlmValidator::with_api_key(&settings("http://localhost"), " ", fallback());
        assert!(matches!(result, Err(FinderError::MissingCredential(_))));
    }

    #[test]
    fn test_explicit_key_wins() {
        let mut llm = LlmSettings::default();
        llm.api_key = Some("from-settings".to_string());
        assert_eq!(resolve_api_key(&llm).as_deref(), Some("from-settings"));
    }

    #[test]
    fn test_json_object_extraction() {
        assert_eq!(json_object("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(json_object("no json"), "no json");
    }

    #[tokio::test]
    async fn test_name_verdict_from_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(
                r#"{"is_match": true, "confidence": 0.93, "reasoning": "Bill is short for William", "same_person": true, "nickname_detected": true}"#,
            )))
            .mount(&server)
            .await;

        let validator =
            LlmValidator::with_api_key(&settings(&server.uri()), "test-key", fallback()).unwrap();
        let verdict = validator
            .validate_name_match("Bill Gates", "William H. Gates", Some("Microsoft"))
            .await;

        assert!(verdict.is_match);
        assert!(verdict.nickname_detected);
        assert!((verdict.confidence - 0.93).abs() < 1e-9);
        assert_eq!(verdict.reasoning, "Bill is short for William");
    }

    #[tokio::test]
    async fn test_company_verdict_from_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(
                r#"{"is_match": true, "confidence": 1.7, "reasoning": "brand vs legal name"}"#,
            )))
            .mount(&server)
            .await;

        let validator =
            LlmValidator::with_api_key(&settings(&server.uri()), "test-key", fallback()).unwrap();
        let verdict = validator.validate_company_match("Google", "Alphabet Inc").await;

        assert!(verdict.is_match);
        assert_eq!(verdict.confidence, 1.0);
    }

    #[tokio::test]
    async fn test_http_error_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let validator =
            LlmValidator::with_api_key(&settings(&server.uri()), "test-key", fallback()).unwrap();
        let verdict = validator
            .validate_name_match("Mike Jones", "Michael Jones", None)
            .await;

        assert!(verdict.is_match);
        assert_eq!(verdict.confidence, 1.0);
        assert!(verdict.reasoning.starts_with("Fallback after LLM error"));
    }

    #[tokio::test]
    async fn test_malformed_reply_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(chat_reply("I think they match.")),
            )
            .mount(&server)
            .await;

        let validator =
            LlmValidator::with_api_key(&settings(&server.uri()), "test-key", fallback()).unwrap();
        let verdict = validator.validate_company_match("Acme", "Globex").await;

        assert!(!verdict.is_match);
        assert!(verdict.reasoning.starts_with("Fallback after LLM error"));
    }

    #[tokio::test]
    async fn test_reply_without_verdict_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("{}")))
            .mount(&server)
            .await;

        let validator =
            LlmValidator::with_api_key(&settings(&server.uri()), "test-key", fallback()).unwrap();

        let name = validator
            .validate_name_match("Mike Jones", "Michael Jones", None)
            .await;
        assert!(name.is_match);
        assert!(name.reasoning.starts_with("Fallback after LLM error"));

        let company = validator.validate_company_match("Acme", "Acme").await;
        assert!(company.is_match);
        assert!(company.reasoning.starts_with("Fallback after LLM error"));
    }

    #[test]
    fn test_verdict_requires_is_match() {
        assert!(serde_json::from_str::<NameValidation>("{}").is_err());
        assert!(serde_json::from_str::<NameValidation>(r#"{"match": "yes"}"#).is_err());
        assert!(serde_json::from_str::<CompanyValidation>(r#"{"confidence": 0.9}"#).is_err());

        let verdict: CompanyValidation = serde_json::from_str(r#"{"is_match": false}"#).unwrap();
        assert!(!verdict.is_match);
        assert_eq!(verdict.confidence, 0.0);
    }
}
