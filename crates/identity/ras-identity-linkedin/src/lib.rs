//! LinkedIn identity provider adapter.
//!
//! This crate plugs LinkedIn into the ras-identity-core provider traits. The
//! host OAuth2 engine performs the redirect and the code exchange; the adapter
//! takes the resulting access token, fetches the member profile from either
//! the v1 (`people/~`) or v2 (`me`) API and normalizes it into an
//! [`IdentityInfo`] record, echoing the raw document under `extra.raw_profile`.

mod attempt;
mod client;
mod config;
mod error;
mod normalize;
mod profile;
mod provider;
mod token;

#[cfg(test)]
mod tests;

pub use attempt::{AttemptStage, AuthAttempt};
pub use client::LinkedInClient;
pub use config::{ApiVersion, LinkedInConfig};
pub use error::{LinkedInError, LinkedInResult};
pub use normalize::{display_name, extra, info, info_v1, info_v2, uid};
pub use profile::{RawProfile, profile_path, profile_url};
pub use provider::{LinkedInAuthPayload, LinkedInProvider};
pub use token::{ACCESS_TOKEN_PARAM, AccessToken, TokenMode, TokenResponse};

// Re-export common types for convenience
pub use ras_identity_core::{
    CallbackContext, IdentityInfo, IdentityProvider, ProfileUrls, VerifiedIdentity,
};
