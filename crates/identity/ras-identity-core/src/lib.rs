//! Core identity provider traits and types.
//!
//! Provider adapters plug into the host framework through [`IdentityProvider`]
//! and hand back a [`VerifiedIdentity`]: a uid, a normalized [`IdentityInfo`]
//! record and an opaque `extra` bag carrying provider-specific data.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Invalid authentication payload")]
    InvalidPayload,

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Missing field in provider response: {0}")]
    MissingField(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type IdentityResult<T> = Result<T, IdentityError>;

/// Named profile URLs exposed in the normalized schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUrls {
    pub public_profile: Option<String>,
}

/// The provider-independent identity schema downstream consumers read.
///
/// Every field is optional: an adapter that cannot say anything about a field
/// leaves it `None`, which is distinct from a provider returning an empty
/// string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Passed through in whatever shape the provider returns.
    pub location: Option<serde_json::Value>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub urls: Option<ProfileUrls>,
}

impl IdentityInfo {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    pub provider_id: String,
    pub uid: String,
    pub info: IdentityInfo,
    pub extra: serde_json::Value,
}

/// Request metadata the host exposes so adapters can report their callback URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackContext {
    /// Externally visible scheme and host, e.g. `https://app.example.com`.
    pub full_host: String,
    /// Mount path prefix of the application, empty when mounted at the root.
    pub script_name: String,
}

impl CallbackContext {
    pub fn new(full_host: impl Into<String>, script_name: impl Into<String>) -> Self {
        Self {
            full_host: full_host.into(),
            script_name: script_name.into(),
        }
    }

    pub fn callback_url(&self, callback_path: &str) -> String {
        format!("{}{}{}", self.full_host, self.script_name, callback_path)
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn provider_id(&self) -> &str;

    async fn verify(&self, auth_payload: serde_json::Value) -> IdentityResult<VerifiedIdentity>;
}
