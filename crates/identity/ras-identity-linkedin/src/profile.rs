//! Profile document returned by LinkedIn and the request that fetches it.

use crate::config::ApiVersion;
use crate::error::LinkedInResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Parsed body of the `people/~` (v1) or `me` (v2) endpoint, kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawProfile(Value);

impl RawProfile {
    pub fn new(document: Value) -> Self {
        Self(document)
    }

    /// Field value, treating JSON `null` as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// String field; non-string values are treated as absent.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for RawProfile {
    fn from(document: Value) -> Self {
        Self(document)
    }
}

/// Path of the profile endpoint. v1 projects `fields`; v2 always fetches the
/// full default document.
pub fn profile_path(version: ApiVersion, fields: &[String]) -> String {
    match version {
        ApiVersion::V1 => format!("/v1/people/~:({})", fields.join(",")),
        ApiVersion::V2 => "/v2/me".to_string(),
    }
}

/// Absolute profile URL under `site`, without any credential attached.
pub fn profile_url(site: &str, version: ApiVersion, fields: &[String]) -> LinkedInResult<Url> {
    let mut url = Url::parse(site)?.join(&profile_path(version, fields))?;
    if version == ApiVersion::V1 {
        url.query_pairs_mut().append_pair("format", "json");
    }
    Ok(url)
}
