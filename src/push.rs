// src/push.rs

//! Push delivery boundary.
//!
//! Thin client for a PushPlus-shaped notification service: one POST with
//! the rendered report, token appended as a path segment. Delivery is a
//! silent no-op when no token is configured.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::PushConfig;

/// Request payload for the push endpoint.
#[derive(Debug, Serialize)]
struct PushPayload<'a> {
    title: &'a str,
    content: &'a str,
    template: &'a str,
}

/// Reply envelope from the push endpoint.
#[derive(Debug, Deserialize)]
struct PushReply {
    code: i64,
    #[serde(default)]
    msg: String,
}

/// Client for a PushPlus-style notification service.
pub struct PushClient {
    endpoint: String,
    token: Option<String>,
    client: Client,
}

impl PushClient {
    /// Create a client from configuration; a missing token falls back to
    /// the `PUSHPLUS_TOKEN` environment variable.
    pub fn new(config: &PushConfig) -> Self {
        let token = config
            .token
            .clone()
            .or_else(|| std::env::var("PUSHPLUS_TOKEN").ok())
            .filter(|token| !token.is_empty());

        Self::with_token(&config.endpoint, token)
    }

    /// Build a client with an explicit token, mainly for tests and tools.
    pub fn with_token(endpoint: impl Into<String>, token: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            token,
            client,
        }
    }

    /// Whether a token is available for delivery.
    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    /// Deliver a markdown report. A missing token is a silent no-op.
    pub async fn send(&self, title: &str, content: &str) -> Result<()> {
        let Some(token) = &self.token else {
            log::debug!("Push disabled (no token configured)");
            return Ok(());
        };

        let url = format!("{}/{}", self.endpoint, token);
        let payload = PushPayload {
            title,
            content,
            template: "markdown",
        };

        let reply: PushReply = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if reply.code != 200 {
            return Err(AppError::push(format!(
                "delivery rejected: {} (code {})",
                reply.msg, reply.code
            )));
        }

        log::info!("Push delivered: {}", title);
        Ok(())
    }
}
