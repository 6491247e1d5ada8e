//! Shared fetch layer: one GET with browser-like headers, bounded redirects,
//! and a fixed-delay retry on transient failures.

use std::time::Duration;

use kabar_core::{Error, Result};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

use crate::document::Document;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout: Duration,
    pub max_redirects: usize,
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
            max_redirects: 5,
            max_attempts: 3,
            retry_delay: Duration::from_millis(1000),
        }
    }
}

enum Failure {
    Transient(Error),
    Terminal(Error),
}

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("id-ID,id;q=0.9,en-US;q=0.8,en;q=0.7"),
        );
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(header::UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    /// Fetches `url` and parses it into a queryable document.
    pub async fn fetch(&self, url: &str) -> Result<Document> {
        let body = self.fetch_text(url).await?;
        Ok(Document::parse(&body))
    }

    #[instrument(level = "info", skip(self))]
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            info!(attempt, max_attempts, "Fetching page");
            match self.attempt(url).await {
                Ok(body) => {
                    debug!(bytes = body.len(), "Fetched page");
                    return Ok(body);
                }
                Err(Failure::Transient(e)) if attempt < max_attempts => {
                    warn!(
                        attempt,
                        error = %e,
                        delay_ms = self.config.retry_delay.as_millis() as u64,
                        "Transient fetch failure, retrying"
                    );
                    sleep(self.config.retry_delay).await;
                    attempt += 1;
                }
                Err(Failure::Transient(e)) | Err(Failure::Terminal(e)) => {
                    error!(attempt, error = %e, "Fetch failed");
                    return Err(e);
                }
            }
        }
    }

    async fn attempt(&self, url: &str) -> std::result::Result<String, Failure> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_transport(url, e))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(Failure::Terminal(Error::NotFound(url.to_string()))),
            StatusCode::FORBIDDEN => return Err(Failure::Terminal(Error::Forbidden(url.to_string()))),
            _ => {}
        }

        let status = response.status();
        let response = response.error_for_status().map_err(|source| {
            let error = Error::FetchFailed {
                url: url.to_string(),
                source,
            };
            if status == StatusCode::TOO_MANY_REQUESTS {
                Failure::Transient(error)
            } else {
                Failure::Terminal(error)
            }
        })?;

        response.text().await.map_err(|e| classify_transport(url, e))
    }
}

fn classify_transport(url: &str, source: reqwest::Error) -> Failure {
    let transient = source.is_connect() || source.is_timeout();
    let error = Error::FetchFailed {
        url: url.to_string(),
        source,
    };
    if transient {
        Failure::Transient(error)
    } else {
        Failure::Terminal(error)
    }
}
