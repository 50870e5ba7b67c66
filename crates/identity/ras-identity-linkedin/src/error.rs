//! LinkedIn adapter error types.

use ras_identity_core::IdentityError;
use thiserror::Error;

pub type LinkedInResult<T> = Result<T, LinkedInError>;

#[derive(Debug, Error)]
pub enum LinkedInError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Failed to load configuration: {0}")]
    ConfigLoadError(#[from] config::ConfigError),

    #[error("Profile request failed with status {status}: {body}")]
    ProfileFetchFailed { status: u16, body: String },

    #[error("Invalid profile response: {0}")]
    InvalidProfileResponse(String),

    #[error("Missing field in profile: {0}")]
    MissingField(&'static str),

    #[error("Profile request cancelled")]
    Cancelled,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),
}

impl From<LinkedInError> for IdentityError {
    fn from(err: LinkedInError) -> Self {
        match err {
            LinkedInError::InvalidConfiguration(msg) => IdentityError::InvalidConfiguration(msg),
            LinkedInError::MissingField(field) => IdentityError::MissingField(field.to_string()),
            LinkedInError::SerializationError(e) => IdentityError::SerializationError(e),
            other => IdentityError::ProviderError(other.to_string()),
        }
    }
}
