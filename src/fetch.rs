// src/fetch.rs

//! HTTP fetch client with retry, backoff, and rate-friendly delays.
//!
//! All transport failures are absorbed here: `fetch` reports exhaustion as
//! `None` and never propagates an error to the calling adapter.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};

use crate::error::Result;

/// Client identity pool; one entry is chosen per client at construction.
const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
];

/// Total attempts per fetch, including the first.
const MAX_ATTEMPTS: u32 = 2;

/// Base for the between-attempt backoff: sleeps `1.5^attempt` seconds.
const BACKOFF_FACTOR: f64 = 1.5;

/// Backoff multiplier after a 403/429 response.
const PENALTY_MULTIPLIER: f64 = 3.0;

/// Status + body of one transport-level GET.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Seam between the retry policy and the actual HTTP stack.
///
/// An `Err` is a transport failure (timeout, connect error); an `Ok` carries
/// whatever status the server answered with, including 4xx/5xx.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, timeout: Duration) -> Result<TransportResponse>;
}

/// Production transport backed by reqwest.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport carrying the given identity header.
    pub fn new(user_agent: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
        );

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<TransportResponse> {
        let response = self.client.get(url).timeout(timeout).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(TransportResponse { status, body })
    }
}

/// HTTP fetch client with a fixed identity and a bounded retry budget.
pub struct FetchClient {
    transport: Arc<dyn Transport>,
    user_agent: &'static str,
}

impl FetchClient {
    /// Create a client with an OS-seeded identity choice.
    pub fn new() -> Self {
        Self::from_rng(&mut StdRng::from_os_rng())
    }

    /// Create a client with a deterministic identity choice.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(&mut StdRng::seed_from_u64(seed))
    }

    /// Create a client over an injected transport (tests).
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            user_agent: USER_AGENTS[0],
        }
    }

    fn from_rng(rng: &mut StdRng) -> Self {
        let user_agent = USER_AGENTS[rng.random_range(0..USER_AGENTS.len())];
        Self {
            transport: Arc::new(ReqwestTransport::new(user_agent)),
            user_agent,
        }
    }

    /// The identity header this client presents.
    pub fn user_agent(&self) -> &str {
        self.user_agent
    }

    /// Fetch a page, returning its body text or `None` after the retry
    /// budget is exhausted.
    ///
    /// `allow_delay` enables the polite-mode sleeps: backoff between
    /// attempts (tripled after a 403/429) and a 0.5–1.5s jitter after
    /// success. Concurrent fan-out passes `false` and retries immediately.
    pub async fn fetch(&self, url: &str, timeout: Duration, allow_delay: bool) -> Option<String> {
        let mut penalized = false;

        for attempt in 1..=MAX_ATTEMPTS {
            if attempt > 1 && allow_delay {
                let mut backoff = BACKOFF_FACTOR.powi((attempt - 1) as i32);
                if penalized {
                    backoff *= PENALTY_MULTIPLIER;
                }
                log::debug!("retrying {} in {:.1}s (attempt {})", url, backoff, attempt);
                tokio::time::sleep(Duration::from_secs_f64(backoff)).await;
            }

            match self.transport.get(url, timeout).await {
                Ok(response) if response.status < 400 => {
                    if allow_delay {
                        let jitter = rand::rng().random_range(500..=1500);
                        tokio::time::sleep(Duration::from_millis(jitter)).await;
                    }
                    return Some(response.body);
                }
                Ok(response) => {
                    penalized = matches!(response.status, 403 | 429);
                    log::warn!("HTTP {} from {}", response.status, url);
                }
                Err(error) => {
                    penalized = false;
                    log::warn!("Request to {} failed: {}", url, error);
                }
            }
        }

        log::debug!("Giving up on {} after {} attempts", url, MAX_ATTEMPTS);
        None
    }
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}
