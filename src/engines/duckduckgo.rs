//! DuckDuckGo search engine implementation

use super::traits::*;
use crate::config::SafeSearch;
use crate::network::accept_language;
use crate::results::RawResult;
use anyhow::Result as AnyhowResult;
use scraper::{Html, Selector};
use std::collections::HashMap;

/// DuckDuckGo web search through the HTML front end
pub struct DuckDuckGo {
    html_url: String,
}

impl DuckDuckGo {
    pub fn new() -> Self {
        Self::with_url("https://html.duckduckgo.com/html/")
    }

    /// Use a different endpoint (mirrors, tests)
    pub fn with_url(html_url: impl Into<String>) -> Self {
        Self {
            html_url: html_url.into(),
        }
    }

    /// Result links point at `//duckduckgo.com/l/?uddg=<target>`; return the target
    fn decode_redirect(href: &str) -> Option<String> {
        let absolute = if href.starts_with("//") {
            format!("https:{}", href)
        } else {
            href.to_string()
        };

        let parsed = url::Url::parse(&absolute).ok()?;
        let is_redirect = parsed
            .host_str()
            .map(|h| h.ends_with("duckduckgo.com"))
            .unwrap_or(false);

        if !is_redirect {
            return Some(absolute);
        }

        parsed
            .query_pairs()
            .find(|(k, _)| k == "uddg")
            .map(|(_, v)| v.into_owned())
    }

    fn parse_html_results(&self, html: &str) -> AnyhowResult<Vec<RawResult>> {
        let document = Html::parse_document(html);
        let mut results = Vec::new();

        let selector = |css: &str| {
            Selector::parse(css).map_err(|e| anyhow::anyhow!("invalid selector {}: {:?}", css, e))
        };
        let result_selector = selector("div.result")?;
        let title_selector = selector("a.result__a")?;
        let snippet_selector = selector(".result__snippet")?;

        for element in document.select(&result_selector) {
            let title_elem = match element.select(&title_selector).next() {
                Some(t) => t,
                None => continue,
            };

            let title = title_elem.text().collect::<String>().trim().to_string();
            if title.is_empty() {
                continue;
            }

            // Skip ads and internal links
            let url = match title_elem.value().attr("href").and_then(Self::decode_redirect) {
                Some(url) if !url.contains("duckduckgo.com") => url,
                _ => continue,
            };

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

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for DuckDuckGo {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    fn request(&self, params: &SearchParams) -> AnyhowResult<EngineRequest> {
        let mut form_data = HashMap::new();
        form_data.insert("q".to_string(), params.query.clone());
        form_data.insert("b".to_string(), String::new());
        form_data.insert("kl".to_string(), params.region.clone());

        let kp = match params.safesearch {
            SafeSearch::Strict => "1",
            SafeSearch::Moderate => "-1",
            SafeSearch::Off => "-2",
        };
        form_data.insert("kp".to_string(), kp.to_string());

        Ok(EngineRequest::post(&self.html_url)
            .header("Accept-Language", accept_language(&params.region))
            .form(form_data))
    }

    fn response(&self, response: EngineResponse) -> AnyhowResult<Vec<RawResult>> {
        response.ensure_usable()?;
        self.parse_html_results(&response.text)
    }
}
