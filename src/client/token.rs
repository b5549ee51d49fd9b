//! OAuth client-credentials token lifecycle
//!
//! The identity service hands out short-lived bearer tokens. `TokenManager`
//! keeps at most one, refreshes it once it reaches its (margin-adjusted)
//! expiry, and fails hard when the exchange does not succeed: invalid
//! credentials never fix themselves, so an authentication failure is not retried.

use crate::config::Credentials;
use crate::ZiaError;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::{Duration, Instant};

/// Lifetime assumed when the token response has no `expires_in`
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Time allowed for the token exchange itself
const TOKEN_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A bearer token with its absolute expiry
#[derive(Clone)]
pub struct Token {
    value: String,
    expires_at: Instant,
}

impl Token {
    pub fn new(value: impl Into<String>, expires_at: Instant) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// The raw bearer value
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// A token is expired once `now` reaches its expiry
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Value for the `Authorization` header
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.value)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Body returned by the token endpoint
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Acquires and refreshes the bearer token
#[derive(Debug)]
pub struct TokenManager {
    credentials: Credentials,
    audience: String,
    refresh_margin: Duration,
    token: Option<Token>,
}

impl TokenManager {
    /// Creates a manager with no token yet
    ///
    /// # Arguments
    ///
    /// * `credentials` - Client id, secret, and identity base URL
    /// * `audience` - Audience requested in the exchange
    /// * `refresh_margin` - Subtracted from the server-reported lifetime
    pub fn new(
        credentials: Credentials,
        audience: impl Into<String>,
        refresh_margin: Duration,
    ) -> Self {
        Self {
            credentials,
            audience: audience.into(),
            refresh_margin,
            token: None,
        }
    }

    /// The currently held token, if any
    pub fn current(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    /// Returns a token that is valid right now
    ///
    /// Performs a fresh client-credentials exchange on first use and whenever
    /// the held token has reached its expiry.
    ///
    /// # Returns
    ///
    /// * `Ok(Token)` - A token whose expiry lies in the future
    /// * `Err(ZiaError::Auth)` - The exchange failed; the caller should stop
    pub async fn ensure_token(&mut self, client: &Client) -> Result<Token, ZiaError> {
        if let Some(token) = &self.token {
            if !token.is_expired(Instant::now()) {
                return Ok(token.clone());
            }
            tracing::debug!("Access token expired, refreshing");
        }

        let token = self.exchange(client).await?;
        self.token = Some(token.clone());
        Ok(token)
    }

    /// Runs the client-credentials exchange against the identity endpoint
    async fn exchange(&self, client: &Client) -> Result<Token, ZiaError> {
        let endpoint = self.credentials.token_url();
        let auth_error = |message: String| ZiaError::Auth {
            endpoint: endpoint.clone(),
            message,
        };

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id()),
            ("client_secret", self.credentials.client_secret()),
            ("audience", self.audience.as_str()),
        ];

        tracing::debug!("Requesting access token from {}", endpoint);
        let response = client
            .post(&endpoint)
            .form(&form)
            .timeout(TOKEN_REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| auth_error(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| auth_error(e.to_string()))?;

        if !status.is_success() {
            return Err(auth_error(format!("HTTP {}: {}", status.as_u16(), body)));
        }

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| auth_error(format!("malformed token response: {}", e)))?;

        let issued_at = Instant::now();
        let lifetime = parsed
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_LIFETIME);

        let expires_at = issued_at
            .checked_add(effective_lifetime(lifetime, self.refresh_margin))
            .ok_or_else(|| {
                auth_error(format!("expires_in out of range: {}", lifetime.as_secs()))
            })?;

        tracing::info!("Obtained access token valid for {}s", lifetime.as_secs());
        Ok(Token::new(parsed.access_token, expires_at))
    }
}

/// Lifetime after applying the refresh margin
///
/// The margin is only applied when the lifetime exceeds it, so a fresh token
/// never starts out already expired.
pub fn effective_lifetime(lifetime: Duration, margin: Duration) -> Duration {
    if lifetime > margin {
        lifetime - margin
    } else {
        tracing::warn!(
            "Token lifetime {:?} does not exceed the refresh margin {:?}; using it unadjusted",
            lifetime,
            margin
        );
        lifetime
    }
}
