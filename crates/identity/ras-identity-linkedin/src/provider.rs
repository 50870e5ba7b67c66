//! LinkedIn identity provider implementation.

use crate::attempt::AuthAttempt;
use crate::client::LinkedInClient;
use crate::config::LinkedInConfig;
use crate::error::LinkedInResult;
use crate::token::{AccessToken, TokenResponse};
use async_trait::async_trait;
use ras_identity_core::{
    CallbackContext, IdentityError, IdentityProvider, IdentityResult, VerifiedIdentity,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Payload the host OAuth2 engine passes to `verify` once the code exchange
/// has completed.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkedInAuthPayload {
    pub provider: String,
    #[serde(flatten)]
    pub token: TokenResponse,
}

/// LinkedIn adapter that implements IdentityProvider.
///
/// The provider itself holds only read-only configuration and a pooled HTTP
/// client; per-login state lives in the [`AuthAttempt`] it hands out.
#[derive(Clone)]
pub struct LinkedInProvider {
    config: Arc<LinkedInConfig>,
    client: LinkedInClient,
}

impl LinkedInProvider {
    pub fn new(config: LinkedInConfig) -> LinkedInResult<Self> {
        let client = LinkedInClient::new(config.http_timeout_seconds)?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_http_client(config: LinkedInConfig, http_client: Client) -> Self {
        Self::with_client(config, LinkedInClient::with_http_client(http_client))
    }

    fn with_client(config: LinkedInConfig, client: LinkedInClient) -> Self {
        if let Err(e) = config.api_version() {
            warn!("Provider {} will not be able to fetch profiles: {}", config.name, e);
        }

        Self {
            config: Arc::new(config),
            client,
        }
    }

    pub fn config(&self) -> &LinkedInConfig {
        &self.config
    }

    /// URL to redirect the user to. The host engine owns `state`.
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> LinkedInResult<String> {
        Ok(self
            .config
            .authorization_url(redirect_uri, state)?
            .to_string())
    }

    pub fn callback_url(&self, context: &CallbackContext) -> String {
        context.callback_url(&self.config.callback_path())
    }

    /// Open a new attempt for a freshly exchanged token.
    ///
    /// An expired token is still used; LinkedIn decides whether to reject it.
    pub fn begin_attempt(&self, token: AccessToken) -> AuthAttempt {
        if token.is_expired() {
            warn!(
                expires_at = ?token.expires_at(),
                has_refresh_token = token.refresh_token().is_some(),
                "Access token for provider {} has already expired",
                self.config.name
            );
        } else {
            debug!(
                expires_in = ?token.expires_in(),
                "Opening authentication attempt for provider {}",
                self.config.name
            );
        }

        AuthAttempt::new(Arc::clone(&self.config), self.client.clone(), token)
    }
}

#[async_trait]
impl IdentityProvider for LinkedInProvider {
    fn provider_id(&self) -> &str {
        &self.config.name
    }

    async fn verify(&self, auth_payload: serde_json::Value) -> IdentityResult<VerifiedIdentity> {
        let payload: LinkedInAuthPayload =
            serde_json::from_value(auth_payload).map_err(|_| IdentityError::InvalidPayload)?;

        if payload.provider != self.config.name {
            return Err(IdentityError::ProviderError(format!(
                "Provider mismatch: expected {}, got {}",
                self.config.name, payload.provider
            )));
        }

        let mut attempt = self.begin_attempt(AccessToken::from_response(payload.token));
        let identity = attempt.derive_identity().await?;

        info!(
            "Successfully verified identity for provider: {}",
            self.config.name
        );

        Ok(identity)
    }
}
