//! Authenticated, rate-gated access to the ZIA API
//!
//! This module handles every API request the analyzer makes, including:
//! - Building the HTTP client with timeouts and a product user agent
//! - Attaching the current bearer token
//! - Spacing requests through the rate gate
//! - A single backoff-and-retry on HTTP 429
//! - Error classification

use crate::client::rate_gate::RateGate;
use crate::client::token::TokenManager;
use crate::config::{Config, Credentials};
use crate::ZiaError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Path prefix of every ZIA API endpoint
pub const API_PREFIX: &str = "/zia/api/v1";

/// JSON field of a 429 body that carries the vendor's wait hint
pub const RETRY_AFTER_FIELD: &str = "Retry-After";

/// Outcome of a single request attempt
#[derive(Debug)]
enum Attempt {
    /// 2xx with a JSON body
    Success(Value),

    /// HTTP 429 with the raw response body
    RateLimited { body: String },
}

/// How long to wait before the one retry after a 429
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Used when the body carries no usable Retry-After
    pub default_backoff: Duration,

    /// Added on top of a parsed Retry-After
    pub buffer: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_backoff: config.client.rate_limit_backoff(),
            buffer: config.client.retry_after_buffer(),
        }
    }

    /// Computes the backoff for a 429 response body
    ///
    /// # Backoff Rules
    ///
    /// | Body | Wait |
    /// |------|------|
    /// | `{"Retry-After": "N seconds"}` | N s + buffer |
    /// | `{"Retry-After": N}` | N s + buffer |
    /// | anything else | default backoff |
    pub fn backoff_for(&self, body: &str) -> Duration {
        match parse_retry_after(body) {
            Some(seconds) => Duration::from_secs(seconds)
                .checked_add(self.buffer)
                .unwrap_or(self.default_backoff),
            None => self.default_backoff,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            default_backoff: Duration::from_secs(3),
            buffer: Duration::from_secs(2),
        }
    }
}

/// Extracts the leading integer of the body's `Retry-After` field
///
/// The leading run of ASCII digits is taken, so `"5 seconds"`, `"5seconds"`
/// and `"5s"` all yield 5.
///
/// The vendor reports the wait as text such as `"0 seconds"` inside the JSON
/// error body rather than as an HTTP header.
pub fn parse_retry_after(body: &str) -> Option<u64> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    match parsed.get(RETRY_AFTER_FIELD)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s
            .trim_start()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect::<String>()
            .parse()
            .ok(),
        _ => None,
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The analyzer configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(config.api.request_timeout())
        .connect_timeout(Duration::from_secs(10))
        .build()
}

/// Stateful session against the ZIA API
///
/// Owns the token, the rate gate's last-release timestamp and the HTTP
/// client. All calls take `&mut self`, so requests issued through one gateway
/// are strictly sequential and share one rate budget.
#[derive(Debug)]
pub struct Gateway {
    client: Client,
    api_base_url: String,
    tokens: TokenManager,
    gate: RateGate,
    retry: RetryPolicy,
}

impl Gateway {
    /// Creates a gateway from the run configuration and credentials
    pub fn new(config: &Config, credentials: Credentials) -> Result<Self, ZiaError> {
        let client = build_http_client(config)?;
        let tokens = TokenManager::new(
            credentials,
            config.api.audience.clone(),
            config.client.token_refresh_margin(),
        );

        Ok(Self {
            client,
            api_base_url: config.api.api_base_url.trim_end_matches('/').to_string(),
            tokens,
            gate: RateGate::new(config.client.min_request_interval()),
            retry: RetryPolicy::from_config(config),
        })
    }

    /// Minimum spacing between requests
    pub fn min_request_interval(&self) -> Duration {
        self.gate.min_interval()
    }

    /// Obtains a token up front so credential problems surface immediately
    pub async fn authenticate(&mut self) -> Result<(), ZiaError> {
        self.tokens.ensure_token(&self.client).await.map(|_| ())
    }

    /// Full URL for an API path such as `/urlCategories/lite`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}{}", self.api_base_url, API_PREFIX, path)
    }

    /// Authenticated GET returning the parsed JSON body
    pub async fn get(&mut self, path: &str) -> Result<Value, ZiaError> {
        self.request(Method::GET, path, None).await
    }

    /// Authenticated POST of a JSON body returning the parsed JSON response
    pub async fn post<B>(&mut self, path: &str, body: &B) -> Result<Value, ZiaError>
    where
        B: Serialize + ?Sized,
    {
        let endpoint = self.endpoint(path);
        let body = serde_json::to_value(body).map_err(|e| ZiaError::UnexpectedResponse {
            endpoint,
            message: format!("request body is not serializable: {}", e),
        })?;
        self.request(Method::POST, path, Some(&body)).await
    }

    /// Issues a request, retrying exactly once after a 429
    async fn request(
        &mut self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ZiaError> {
        let endpoint = self.endpoint(path);

        let body_429 = match self.attempt(&method, &endpoint, body).await? {
            Attempt::Success(value) => return Ok(value),
            Attempt::RateLimited { body } => body,
        };

        let backoff = self.retry.backoff_for(&body_429);
        tracing::warn!(
            "Rate limited on {} {}, retrying once in {:?}",
            method,
            endpoint,
            backoff
        );
        tokio::time::sleep(backoff).await;

        match self.attempt(&method, &endpoint, body).await? {
            Attempt::Success(value) => Ok(value),
            Attempt::RateLimited { body } => Err(ZiaError::RateLimited { endpoint, body }),
        }
    }

    /// One token check, one gate wait, one HTTP exchange
    async fn attempt(
        &mut self,
        method: &Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Attempt, ZiaError> {
        let token = self.tokens.ensure_token(&self.client).await?;
        self.gate.throttle().await;

        tracing::debug!("{} {}", method, endpoint);
        let mut request = self
            .client
            .request(method.clone(), endpoint)
            .header(AUTHORIZATION, token.authorization())
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| ZiaError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|source| ZiaError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Ok(Attempt::RateLimited { body: text });
        }

        if !status.is_success() {
            return Err(ZiaError::Api {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text)
            .map(Attempt::Success)
            .map_err(|e| ZiaError::UnexpectedResponse {
                endpoint: endpoint.to_string(),
                message: format!("invalid JSON body: {}", e),
            })
    }
}
