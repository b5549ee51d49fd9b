use crate::config::validation::validate_base_url;
use crate::ConfigError;
use std::fmt;

pub const IDENTITY_BASE_URL_ENV: &str = "ZSCALER_IDENTITY_BASE_URL";
pub const CLIENT_ID_ENV: &str = "ZSCALER_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "ZSCALER_CLIENT_SECRET";

/// OAuth client-credentials for the vendor identity service
///
/// Immutable for the lifetime of the process. The secret is never printed by
/// the `Debug` implementation.
#[derive(Clone)]
pub struct Credentials {
    identity_base_url: String,
    client_id: String,
    client_secret: String,
}

impl Credentials {
    /// Creates credentials, stripping trailing slashes from the identity base URL
    pub fn new(
        identity_base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        let identity_base_url = identity_base_url.into();
        Self {
            identity_base_url: identity_base_url.trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Reads credentials from the process environment
    ///
    /// Call `dotenvy::dotenv()` beforehand to pick up a local `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads credentials through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> Result<String, ConfigError> {
            match lookup(name) {
                Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
                _ => Err(ConfigError::MissingCredential(name.to_string())),
            }
        };

        let identity_base_url = required(IDENTITY_BASE_URL_ENV)?;
        validate_base_url("identity base URL", &identity_base_url)?;

        Ok(Self::new(
            identity_base_url,
            required(CLIENT_ID_ENV)?,
            required(CLIENT_SECRET_ENV)?,
        ))
    }

    pub fn identity_base_url(&self) -> &str {
        &self.identity_base_url
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Full URL of the OAuth token endpoint
    pub fn token_url(&self) -> String {
        format!("{}/oauth2/v1/token", self.identity_base_url)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identity_base_url", &self.identity_base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}
