//! LinkedIn adapter configuration.
//!
//! Configuration can be built programmatically with the `with_*` setters or
//! loaded with [`LinkedInConfig::load`], which layers:
//! - Default values
//! - An optional TOML file
//! - Environment variables with the `LINKEDIN_` prefix
//!
//! Environment variables take precedence over file values. `LINKEDIN_FIELDS`
//! is parsed as a comma-separated list.

use crate::error::{LinkedInError, LinkedInResult};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};
use url::Url;

/// Field entry rewritten when secure picture URLs are requested.
const PICTURE_URL_FIELD: &str = "picture-url";
const SECURE_PICTURE_URL_FIELD: &str = "picture-url;secure=true";

/// LinkedIn REST API generation used for the profile fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    V1,
    V2,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V2 => "v2",
        }
    }
}

impl FromStr for ApiVersion {
    type Err = LinkedInError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "v1" => Ok(ApiVersion::V1),
            "v2" => Ok(ApiVersion::V2),
            other => Err(LinkedInError::InvalidConfiguration(format!(
                "Unexpected value for api_version option: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static configuration of the LinkedIn adapter. Never mutated after the
/// provider is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedInConfig {
    /// Provider name reported to the host (default: linkedin)
    #[serde(default = "default_name")]
    pub name: String,

    pub client_id: String,

    pub client_secret: String,

    /// Base URL of the LinkedIn REST API
    #[serde(default = "default_site")]
    pub site: String,

    /// Authorization endpoint, already carrying `response_type=code`
    #[serde(default = "default_authorize_url")]
    pub authorize_url: String,

    /// Token endpoint used by the host OAuth2 engine for the code exchange
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Space-separated scopes requested during authorization
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Profile fields projected by the v1 profile request
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,

    /// API generation selector, `v1` or `v2`. Kept as text so that an
    /// unrecognized value surfaces when the profile is fetched.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Request the https variant of the picture URL (v1 only)
    #[serde(default)]
    pub secure_image_url: bool,

    /// Callback path; defaults to `/auth/<name>/callback`
    #[serde(default)]
    pub callback_path: Option<String>,

    /// Timeout applied to every profile request
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
}

fn default_name() -> String {
    "linkedin".to_string()
}

fn default_site() -> String {
    "https://api.linkedin.com".to_string()
}

fn default_authorize_url() -> String {
    "https://www.linkedin.com/oauth/v2/authorization?response_type=code".to_string()
}

fn default_token_url() -> String {
    "https://www.linkedin.com/oauth/v2/accessToken".to_string()
}

fn default_scope() -> String {
    "r_basicprofile r_emailaddress".to_string()
}

fn default_fields() -> Vec<String> {
    [
        "id",
        "email-address",
        "first-name",
        "last-name",
        "headline",
        "location",
        "industry",
        "picture-url",
        "public-profile-url",
    ]
    .iter()
    .map(|f| f.to_string())
    .collect()
}

fn default_api_version() -> String {
    ApiVersion::V1.as_str().to_string()
}

fn default_http_timeout() -> u64 {
    30
}

impl Default for LinkedInConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            client_id: String::new(),
            client_secret: String::new(),
            site: default_site(),
            authorize_url: default_authorize_url(),
            token_url: default_token_url(),
            scope: default_scope(),
            fields: default_fields(),
            api_version: default_api_version(),
            secure_image_url: false,
            callback_path: None,
            http_timeout_seconds: default_http_timeout(),
        }
    }
}

impl LinkedInConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            ..Self::default()
        }
    }

    /// Load configuration from an optional TOML file and `LINKEDIN_` environment variables
    pub fn load(path: Option<&Path>) -> LinkedInResult<Self> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = path {
            if path.exists() {
                info!("Loading LinkedIn configuration from {}", path.display());
                builder = builder.add_source(File::from(path));
            } else {
                debug!("No config file found at {}, using defaults", path.display());
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("LINKEDIN")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("fields"),
        );

        let config: LinkedInConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Parse configuration from TOML text, filling unspecified options with defaults
    pub fn from_toml_str(source: &str) -> LinkedInResult<Self> {
        let config: LinkedInConfig = ConfigBuilder::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = site.into();
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_secure_image_url(mut self, secure: bool) -> Self {
        self.secure_image_url = secure;
        self
    }

    pub fn with_callback_path(mut self, path: impl Into<String>) -> Self {
        self.callback_path = Some(path.into());
        self
    }

    pub fn with_http_timeout(mut self, seconds: u64) -> Self {
        self.http_timeout_seconds = seconds;
        self
    }

    /// Resolve the configured API generation.
    pub fn api_version(&self) -> LinkedInResult<ApiVersion> {
        self.api_version.parse()
    }

    /// Check every option that can be checked without talking to LinkedIn.
    pub fn validate(&self) -> LinkedInResult<()> {
        self.api_version()?;

        for (option, value) in [
            ("site", &self.site),
            ("authorize_url", &self.authorize_url),
            ("token_url", &self.token_url),
        ] {
            Url::parse(value).map_err(|e| {
                LinkedInError::InvalidConfiguration(format!("{}: {}", option, e))
            })?;
        }

        if self.fields.is_empty() {
            return Err(LinkedInError::InvalidConfiguration(
                "fields must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn callback_path(&self) -> String {
        self.callback_path
            .clone()
            .unwrap_or_else(|| format!("/auth/{}/callback", self.name))
    }

    /// Fields for the v1 projection. Returns a fresh list; the configured
    /// list is never touched.
    pub fn requested_fields(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|field| {
                if self.secure_image_url && field == PICTURE_URL_FIELD {
                    SECURE_PICTURE_URL_FIELD.to_string()
                } else {
                    field.clone()
                }
            })
            .collect()
    }

    /// Build the URL the user is redirected to. `state` is generated and
    /// verified by the host OAuth2 engine.
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> LinkedInResult<Url> {
        let mut url = Url::parse(&self.authorize_url)?;

        {
            let mut params = url.query_pairs_mut();
            params.append_pair("client_id", &self.client_id);
            params.append_pair("redirect_uri", redirect_uri);
            if !self.scope.is_empty() {
                params.append_pair("scope", &self.scope);
            }
            params.append_pair("state", state);
        }

        debug!("Generated authorization URL for provider {}", self.name);
        Ok(url)
    }
}
