//! A single authentication attempt.
//!
//! An [`AuthAttempt`] owns the access token and the memoized profile for one
//! login. It is created per request and never shared, so concurrent logins
//! cannot see each other's token or profile.

use crate::client::LinkedInClient;
use crate::config::LinkedInConfig;
use crate::error::{LinkedInError, LinkedInResult};
use crate::normalize;
use crate::profile::{RawProfile, profile_url};
use crate::token::{AccessToken, TokenMode};
use ras_identity_core::{IdentityInfo, VerifiedIdentity};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Progress of a login. The host engine drives the first three stages; an
/// attempt is handed to the adapter at `TokenExchanged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStage {
    Redirected,
    CodeReceived,
    TokenExchanged,
    ProfileFetched,
    IdentityDerived,
}

pub struct AuthAttempt {
    config: Arc<LinkedInConfig>,
    client: LinkedInClient,
    token: AccessToken,
    timeout: Option<Duration>,
    cancellation: Option<CancellationToken>,
    raw_profile: Option<RawProfile>,
    stage: AttemptStage,
}

impl AuthAttempt {
    pub(crate) fn new(
        config: Arc<LinkedInConfig>,
        client: LinkedInClient,
        token: AccessToken,
    ) -> Self {
        Self {
            config,
            client,
            token,
            timeout: None,
            cancellation: None,
            raw_profile: None,
            stage: AttemptStage::TokenExchanged,
        }
    }

    /// Bound the profile request, on top of the client-wide timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Abort the profile request when the enclosing request is cancelled.
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = Some(cancellation);
        self
    }

    pub fn stage(&self) -> AttemptStage {
        self.stage
    }

    pub fn access_token(&self) -> &AccessToken {
        &self.token
    }

    /// The profile document, fetched on first use and cached for the rest of
    /// the attempt. A failed fetch leaves nothing cached.
    pub async fn raw_profile(&mut self) -> LinkedInResult<&RawProfile> {
        let profile = match self.raw_profile.take() {
            Some(profile) => profile,
            None => {
                let profile = self.fetch_profile().await?;
                self.stage = AttemptStage::ProfileFetched;
                profile
            }
        };

        let profile: &RawProfile = self.raw_profile.insert(profile);
        Ok(profile)
    }

    pub async fn uid(&mut self) -> LinkedInResult<String> {
        normalize::uid(self.raw_profile().await?)
    }

    pub async fn info(&mut self) -> LinkedInResult<IdentityInfo> {
        let config = Arc::clone(&self.config);
        let profile = self.raw_profile().await?;
        Ok(normalize::info(profile, &config))
    }

    pub async fn extra(&mut self) -> LinkedInResult<serde_json::Value> {
        Ok(normalize::extra(self.raw_profile().await?))
    }

    /// Run every derivation against the single cached profile.
    pub async fn derive_identity(&mut self) -> LinkedInResult<VerifiedIdentity> {
        let config = Arc::clone(&self.config);
        let profile = self.raw_profile().await?;

        let uid = normalize::uid(profile)?;
        let info = normalize::info(profile, &config);
        let extra = normalize::extra(profile);

        self.stage = AttemptStage::IdentityDerived;
        info!("Derived LinkedIn identity for uid {}", uid);

        Ok(VerifiedIdentity {
            provider_id: config.name.clone(),
            uid,
            info,
            extra,
        })
    }

    async fn fetch_profile(&self) -> LinkedInResult<RawProfile> {
        let version = self.config.api_version()?;
        let fields = self.config.requested_fields();
        let url = profile_url(&self.config.site, version, &fields)?;
        let token = self
            .token
            .clone()
            .with_mode(TokenMode::for_version(version));

        debug!("Fetching {} profile for provider {}", version, self.config.name);

        let request = self.client.get_profile(url, &token, self.timeout);
        match &self.cancellation {
            Some(cancellation) => tokio::select! {
                _ = cancellation.cancelled() => Err(LinkedInError::Cancelled),
                result = request => result,
            },
            None => request.await,
        }
    }
}
