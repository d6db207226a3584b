//! Bing search engine implementation

use super::traits::*;
use crate::config::SafeSearch;
use crate::network::accept_language;
use crate::results::RawResult;
use anyhow::Result as AnyhowResult;
use scraper::{Html, Selector};

/// Bing web search engine
pub struct Bing {
    base_url: String,
}

impl Bing {
    pub fn new() -> Self {
        Self::with_url("https://www.bing.com/search")
    }

    /// Use a different endpoint (mirrors, tests)
    pub fn with_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Decode Bing's encoded URLs
    /// Bing often returns URLs like https://www.bing.com/ck/a?...&u=a1<base64>&...
    /// The real URL is base64 encoded in the 'u' parameter (after removing 'a1' prefix)
    fn decode_bing_url(url: &str) -> String {
        if !url.starts_with("https://www.bing.com/ck/a?") {
            return url.to_string();
        }

        let encoded = url::Url::parse(url).ok().and_then(|parsed| {
            parsed
                .query_pairs()
                .find(|(k, _)| k == "u")
                .map(|(_, v)| v.into_owned())
        });

        let payload = match encoded.as_deref().and_then(|e| e.get(2..)) {
            Some(rest) if !rest.is_empty() => rest.trim_end_matches('='),
            _ => return url.to_string(),
        };
        let padding = (4 - payload.len() % 4) % 4;
        let padded = format!("{}{}", payload, "=".repeat(padding));

        let decoded = base64::Engine::decode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, payload)
            .or_else(|_| base64::Engine::decode(&base64::engine::general_purpose::STANDARD, &padded))
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok());

        decoded.unwrap_or_else(|| url.to_string())
    }

    fn parse_results(&self, html: &str) -> AnyhowResult<Vec<RawResult>> {
        let document = Html::parse_document(html);
        let mut results = Vec::new();

        let selector = |css: &str| {
            Selector::parse(css).map_err(|e| anyhow::anyhow!("invalid selector {}: {:?}", css, e))
        };
        let result_selector = selector("#b_results li.b_algo, li.b_algo")?;
        let title_selector = selector("h2 a")?;
        let snippet_selector = selector("div.b_caption p, p")?;

        for element in document.select(&result_selector) {
            let title_elem = match element.select(&title_selector).next() {
                Some(t) => t,
                None => continue,
            };

            let title = title_elem.text().collect::<String>().trim().to_string();
            if title.is_empty() {
                continue;
            }

            let raw_url = title_elem.value().attr("href").unwrap_or_default();
            if raw_url.is_empty() || raw_url.starts_with('/') {
                continue;
            }

            let url = Self::decode_bing_url(raw_url);

            let snippet = element
                .select(&snippet_selector)
                .next()
                .map(|s| s.text().collect::<String>().trim().to_string())
                .unwrap_or_default();

            results.push(RawResult::new(url, title, snippet));
        }

        Ok(results)
    }
}

impl Default for Bing {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for Bing {
    fn name(&self) -> &str {
        "bing"
    }

    fn request(&self, params: &SearchParams) -> AnyhowResult<EngineRequest> {
        let safe_cookie = match params.safesearch {
            SafeSearch::Strict => "STRICT",
            SafeSearch::Moderate => "MODERATE",
            SafeSearch::Off => "OFF",
        };

        let request = EngineRequest::get(&self.base_url)
            .param("q", params.query.clone())
            .param("setlang", params.language())
            .param("cc", params.country())
            .param("count", params.max_results.to_string())
            .header("Accept-Language", accept_language(&params.region))
            .cookie("SRCHHPGUSR", format!("ADLT={}", safe_cookie));

        Ok(request)
    }

    fn response(&self, response: EngineResponse) -> AnyhowResult<Vec<RawResult>> {
        response.ensure_usable()?;
        self.parse_results(&response.text)
    }
}
