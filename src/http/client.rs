//! HTTP client used by HTTP test cases
//!
//! Wraps `reqwest` and flattens every response into an [`HttpResponse`] so a
//! case can assert on status, content type and body without touching reqwest.

use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Connection refused to {0}")]
    ConnectionRefused(String),

    #[error("Request to {url} timed out after {}ms", .after.as_millis())]
    Timeout { url: String, after: Duration },

    #[error("Request to {url} failed: {source}")]
    Failed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Client shared by the requests of one case
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Idle connections are never pooled: each suite starts a new server on the
    /// same port, and a pooled connection would point at the previous one.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, timeout })
    }

    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!("{} {}", request.method, request.url);

        let mut builder = self.client.request(request.method, &request.url);
        if let Some(content_type) = request.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let started = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| self.classify(e, &request.url))?;

        let status_code = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", request.url))?;
        debug!(
            "{} from {} in {}ms",
            status_code,
            request.url,
            started.elapsed().as_millis()
        );

        Ok(HttpResponse {
            status_code,
            content_type,
            body,
        })
    }

    pub async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.send(HttpRequest::new(Method::GET, url)).await
    }

    pub async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse> {
        self.send(HttpRequest::new(Method::POST, url).json(body))
            .await
    }

    fn classify(&self, err: reqwest::Error, url: &str) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout {
                url: url.to_string(),
                after: self.timeout,
            }
        } else if err.is_connect() {
            HttpError::ConnectionRefused(url.to_string())
        } else {
            HttpError::Failed {
                url: url.to_string(),
                source: err,
            }
        }
    }
}

/// A single request issued by a case
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub content_type: Option<&'static str>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            content_type: None,
            body: None,
        }
    }

    pub fn json(mut self, value: &serde_json::Value) -> Self {
        self.content_type = Some("application/json");
        self.body = Some(value.to_string());
        self
    }
}

/// Response as seen by a case
#[derive(Clone, Debug, Default)]
pub struct HttpResponse {
    pub status_code: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpResponse {
    /// True when the content type's media type is `media_type`, ignoring parameters
    pub fn has_content_type(&self, media_type: &str) -> bool {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .is_some_and(|ct| ct.trim().eq_ignore_ascii_case(media_type))
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).context("Response body is not valid JSON")
    }
}
