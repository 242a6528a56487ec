//! Bearer token verification
//!
//! Users sign up and log in with an external identity service; this API only
//! turns a bearer token into a user id and email. [`HttpIdentityProvider`]
//! asks the service, [`StaticIdentityProvider`] answers from a fixed token
//! table (local development and tests).

use std::collections::HashMap;
use std::time::Duration;

use abuddy_common::config::{IdentityConfig, StaticToken};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Verified caller
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: Some(email.into()),
        }
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Identity service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Identity service returned HTTP {0}")]
    UnexpectedStatus(u16),
}

/// Resolves bearer tokens to identities
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(None)` means the token was rejected
    async fn verify(&self, token: &str) -> Result<Option<Identity>, IdentityError>;
}

/// Fixed token table
#[derive(Debug, Default, Clone)]
pub struct StaticIdentityProvider {
    tokens: HashMap<String, Identity>,
}

impl StaticIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.tokens.insert(token.into(), identity);
        self
    }

    pub fn from_tokens(tokens: &[StaticToken]) -> Self {
        tokens.iter().fold(Self::new(), |provider, t| {
            provider.with_token(t.token.clone(), Identity::new(t.id.clone(), t.email.clone()))
        })
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn verify(&self, token: &str) -> Result<Option<Identity>, IdentityError> {
        Ok(self.tokens.get(token).cloned())
    }
}

/// Upper bound on one identity service round trip
pub const IDENTITY_TIMEOUT: Duration = Duration::from_secs(10);

/// Identity service client
///
/// Sends `GET <url>` with the caller's token as `Authorization: Bearer` and
/// the service key as `apikey`. 200 carries the user object; 401 and 403
/// reject the token.
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpIdentityProvider {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Result<Self, IdentityError> {
        Self::with_timeout(url, api_key, IDENTITY_TIMEOUT)
    }

    /// A request that has not completed within `timeout` fails with
    /// [`IdentityError::Transport`]
    pub fn with_timeout(
        url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("abuddy-api/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
            api_key,
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn verify(&self, token: &str) -> Result<Option<Identity>, IdentityError> {
        let mut request = self.client.get(&self.url).bearer_auth(token);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(status_code = status.as_u16(), "Identity service response");

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            s if s.is_success() => Ok(Some(response.json::<Identity>().await?)),
            s => {
                warn!("Identity service returned unexpected status {}", s);
                Err(IdentityError::UnexpectedStatus(s.as_u16()))
            }
        }
    }
}

/// Pick the provider for a configuration
///
/// The identity service wins when a URL is configured; otherwise the static
/// token table is used (empty table: every token is rejected).
pub fn provider_from_config(config: &IdentityConfig) -> Result<Box<dyn IdentityProvider>, IdentityError> {
    Ok(match &config.url {
        Some(url) => Box::new(HttpIdentityProvider::new(url.clone(), config.api_key.clone())?),
        None => Box::new(StaticIdentityProvider::from_tokens(&config.static_tokens)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provider_lookup() {
        let provider = StaticIdentityProvider::new()
            .with_token("tok-alice", Identity::new("alice", "alice@example.com"));

        let identity = provider.verify("tok-alice").await.unwrap().unwrap();
        assert_eq!(identity.id, "alice");
        assert!(provider.verify("tok-bob").await.unwrap().is_none());
    }

    #[test]
    fn test_provider_selection() {
        let mut config = IdentityConfig::default();
        config.static_tokens.push(StaticToken {
            token: "dev".into(),
            id: "dev-user".into(),
            email: "dev@example.com".into(),
        });
        assert_eq!(provider_from_config(&config).unwrap().name(), "static");

        config.url = Some("http://127.0.0.1:9999/auth/v1/user".into());
        assert_eq!(provider_from_config(&config).unwrap().name(), "http");
    }

    #[tokio::test]
    async fn test_silent_identity_service_times_out() {
        // Accepts connections and never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let provider = HttpIdentityProvider::with_timeout(
            format!("http://{}/auth/v1/user", addr),
            None,
            Duration::from_millis(200),
        )
        .unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), provider.verify("tok"))
            .await
            .expect("verify should give up on its own");
        let err = result.unwrap_err();
        assert!(matches!(err, IdentityError::Transport(_)), "got {:?}", err);
        assert_eq!(
            crate::api::ApiError::from(err).status(),
            axum::http::StatusCode::BAD_GATEWAY
        );

        server.abort();
    }
}
