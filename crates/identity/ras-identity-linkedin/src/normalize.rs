//! Mapping of LinkedIn profile documents onto the normalized identity schema.
//!
//! Every function here is pure: the output depends only on the profile and
//! the API generation.

use crate::config::{ApiVersion, LinkedInConfig};
use crate::error::{LinkedInError, LinkedInResult};
use crate::profile::RawProfile;
use ras_identity_core::{IdentityInfo, ProfileUrls};
use serde_json::{Value, json};

/// The profile `id`, verbatim. Numeric ids are rendered as decimal text.
pub fn uid(profile: &RawProfile) -> LinkedInResult<String> {
    match profile.get("id") {
        Some(Value::String(id)) => Ok(id.clone()),
        Some(other) => Ok(other.to_string()),
        None => Err(LinkedInError::MissingField("id")),
    }
}

/// First and last name joined by a space, or `None` when both are blank.
pub fn display_name(profile: &RawProfile, version: ApiVersion) -> Option<String> {
    let (first_key, last_key) = name_keys(version);
    let name = format!(
        "{} {}",
        text(profile.get(first_key)),
        text(profile.get(last_key))
    );
    let name = name.trim();

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Normalized identity for the configured API generation.
///
/// An unrecognized `api_version` yields an empty record instead of an error;
/// the profile fetch has already rejected such a configuration by the time a
/// provider reaches this point.
pub fn info(profile: &RawProfile, config: &LinkedInConfig) -> IdentityInfo {
    match config.api_version() {
        Ok(ApiVersion::V1) => info_v1(profile),
        Ok(ApiVersion::V2) => info_v2(profile),
        Err(_) => IdentityInfo::default(),
    }
}

pub fn info_v1(profile: &RawProfile) -> IdentityInfo {
    let name = display_name(profile, ApiVersion::V1);

    IdentityInfo {
        name: name.clone(),
        email: string_field(profile, "emailAddress"),
        nickname: name,
        first_name: string_field(profile, "firstName"),
        last_name: string_field(profile, "lastName"),
        location: profile.get("location").cloned(),
        description: string_field(profile, "headline"),
        image: string_field(profile, "pictureUrl"),
        urls: Some(ProfileUrls {
            public_profile: string_field(profile, "publicProfileUrl"),
        }),
    }
}

/// The v2 `me` document carries neither email, location, headline, picture
/// nor profile URL; those fields are reported as empty strings.
pub fn info_v2(profile: &RawProfile) -> IdentityInfo {
    let name = display_name(profile, ApiVersion::V2);

    IdentityInfo {
        name: name.clone(),
        email: Some(String::new()),
        nickname: name,
        first_name: string_field(profile, "localizedFirstName"),
        last_name: string_field(profile, "localizedLastName"),
        location: Some(Value::String(String::new())),
        description: Some(String::new()),
        image: Some(String::new()),
        urls: Some(ProfileUrls {
            public_profile: Some(String::new()),
        }),
    }
}

/// Raw profile under `raw_profile`, untouched.
pub fn extra(profile: &RawProfile) -> Value {
    json!({ "raw_profile": profile.as_value() })
}

fn name_keys(version: ApiVersion) -> (&'static str, &'static str) {
    match version {
        ApiVersion::V1 => ("firstName", "lastName"),
        ApiVersion::V2 => ("localizedFirstName", "localizedLastName"),
    }
}

fn string_field(profile: &RawProfile, key: &str) -> Option<String> {
    profile.get_str(key).map(String::from)
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
