//! HTTP client for the search engine front ends

use super::user_agent::{accept_html, accept_language, generate_user_agent};
use crate::config::OutgoingSettings;
use crate::engines::{EngineRequest, EngineResponse, HttpMethod, RequestBody};
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE};
use reqwest::Client;
use std::time::Duration;

/// Shared reqwest client with browser-like default headers
///
/// One random user agent is chosen per client, so all queries of a finder
/// look like they come from the same browser.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
}

impl HttpClient {
    /// Client with default outgoing settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let timeout = settings.timeout();

        let mut builder = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(settings.pool_maxsize)
            .user_agent(generate_user_agent())
            .default_headers(default_headers(settings)?)
            .cookie_store(true)
            .gzip(true)
            .brotli(true);

        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(all) = &settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(all)?);
        } else {
            if let Some(http) = &settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(https) = &settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        Ok(Self {
            client: builder.build().context("Failed to create HTTP client")?,
            default_timeout: timeout,
        })
    }

    pub async fn execute(&self, request: EngineRequest) -> Result<EngineResponse> {
        self.execute_with_timeout(request, self.default_timeout).await
    }

    /// Send an engine request and read the whole body
    pub async fn execute_with_timeout(
        &self,
        request: EngineRequest,
        timeout: Duration,
    ) -> Result<EngineResponse> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        }
        .timeout(timeout);

        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if !request.cookies.is_empty() {
            let cookies: Vec<String> = request
                .cookies
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            builder = builder.header(COOKIE, cookies.join("; "));
        }
        if let Some(RequestBody::Form(form)) = &request.body {
            builder = builder.form(form);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("request to {} failed", request.url))?;

        let status = response.status().as_u16();
        let url = response.url().to_string();
        let text = response.text().await?;

        Ok(EngineResponse { status, text, url })
    }
}

fn default_headers(settings: &OutgoingSettings) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(accept_html()));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_str(&accept_language("us-en"))?,
    );
    headers.insert("dnt", HeaderValue::from_static("1"));
    headers.insert("upgrade-insecure-requests", HeaderValue::from_static("1"));

    for (name, value) in &settings.extra_headers {
        headers.insert(
            HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("invalid header name {}", name))?,
            HeaderValue::from_str(value)
                .with_context(|| format!("invalid value for header {}", name))?,
        );
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_bad_extra_header() {
        let mut settings = OutgoingSettings::default();
        settings
            .extra_headers
            .insert("bad header".to_string(), "x".to_string());
        assert!(HttpClient::with_settings(&settings).is_err());
    }

    #[tokio::test]
    async fn test_get_with_params_and_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "jane doe"))
            .and(header_exists("user-agent"))
            .and(header("cookie", "SRCHHPGUSR=ADLT=OFF"))
            .and(header_exists("accept-language"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let request = EngineRequest::get(format!("{}/search", server.uri()))
            .param("q", "jane doe")
            .header("Accept-Language", accept_language("de-de"))
            .cookie("SRCHHPGUSR", "ADLT=OFF");
        let response = client.execute(request).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.text, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_post_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/html/"))
            .and(body_string_contains("q=jane+doe"))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;

        let mut form = std::collections::HashMap::new();
        form.insert("q".to_string(), "jane doe".to_string());
        let request = EngineRequest::post(format!("{}/html/", server.uri())).form(form);
        let response = HttpClient::new().unwrap().execute(request).await.unwrap();

        assert_eq!(response.status, 202);
    }
}
