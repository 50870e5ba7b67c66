//! HTTP client for the LinkedIn profile endpoints.

use crate::error::{LinkedInError, LinkedInResult};
use crate::profile::RawProfile;
use crate::token::AccessToken;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

#[derive(Clone)]
pub struct LinkedInClient {
    http_client: Client,
}

impl LinkedInClient {
    pub fn new(http_timeout_seconds: u64) -> LinkedInResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(http_timeout_seconds))
            .build()?;

        Ok(Self { http_client })
    }

    /// Use a caller-configured `reqwest` client (proxies, TLS roots, pooling).
    pub fn with_http_client(http_client: Client) -> Self {
        Self { http_client }
    }

    /// Fetch and parse a profile document. The URL must not carry the token;
    /// `token` decides how it is attached.
    pub async fn get_profile(
        &self,
        url: Url,
        token: &AccessToken,
        timeout: Option<Duration>,
    ) -> LinkedInResult<RawProfile> {
        debug!("Requesting LinkedIn profile from {}", url.path());

        let mut request = token.authorize(self.http_client.get(url));
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Profile request failed with status {}: {}", status, body);
            return Err(LinkedInError::ProfileFetchFailed {
                status: status.as_u16(),
                body,
            });
        }

        let document: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LinkedInError::InvalidProfileResponse(e.to_string()))?;

        Ok(RawProfile::new(document))
    }
}
