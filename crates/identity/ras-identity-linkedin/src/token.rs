//! Access token handed over by the host OAuth2 engine, and how it is presented
//! to the LinkedIn API.

use crate::config::ApiVersion;
use chrono::{DateTime, Duration, Utc};
use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Query parameter name the v1 API expects the token under.
pub const ACCESS_TOKEN_PARAM: &str = "oauth2_access_token";

/// Token response as produced by the code exchange at the token endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Absolute expiry as a unix timestamp, when the host already computed it
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Where the token travels on an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenMode {
    /// `Authorization: Bearer <token>`
    Header,
    /// `?<param_name>=<token>`
    Query { param_name: String },
}

impl TokenMode {
    /// Presentation the given API generation expects.
    pub fn for_version(version: ApiVersion) -> Self {
        match version {
            ApiVersion::V1 => TokenMode::Query {
                param_name: ACCESS_TOKEN_PARAM.to_string(),
            },
            ApiVersion::V2 => TokenMode::Header,
        }
    }
}

/// Bearer credential owned by a single authentication attempt.
#[derive(Clone)]
pub struct AccessToken {
    token: String,
    expires_in: Option<u64>,
    expires_at: Option<DateTime<Utc>>,
    refresh_token: Option<String>,
    mode: TokenMode,
}

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_in: None,
            expires_at: None,
            refresh_token: None,
            mode: TokenMode::Header,
        }
    }

    pub fn from_response(response: TokenResponse) -> Self {
        let expires_at = response
            .expires_at
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .or_else(|| {
                // An expiry chrono cannot represent is treated as unknown
                response
                    .expires_in
                    .and_then(|secs| i64::try_from(secs).ok())
                    .and_then(Duration::try_seconds)
                    .and_then(|delta| Utc::now().checked_add_signed(delta))
            });

        Self {
            token: response.access_token,
            expires_in: response.expires_in,
            expires_at,
            refresh_token: response.refresh_token,
            mode: TokenMode::Header,
        }
    }

    /// Re-wrap the same credential with a different presentation, keeping its expiry.
    pub fn with_mode(mut self, mode: TokenMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn secret(&self) -> &str {
        &self.token
    }

    pub fn mode(&self) -> &TokenMode {
        &self.mode
    }

    pub fn expires_in(&self) -> Option<u64> {
        self.expires_in
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() > at)
    }

    /// Attach the credential to an outgoing request.
    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.mode {
            TokenMode::Header => request.bearer_auth(&self.token),
            TokenMode::Query { param_name } => {
                request.query(&[(param_name.as_str(), self.token.as_str())])
            }
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .field("mode", &self.mode)
            .finish()
    }
}
