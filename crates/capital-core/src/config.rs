//! Backend Configuration
//!
//! Credentials for the remote store and the suggestion service, layered from
//! several sources, and the status messages shown in settings.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const SUPABASE_NOT_CONFIGURED_YET_WARNING: &str =
    "Supabase credentials are not yet configured. Please provide them in Settings > Supabase.";
pub const SUPABASE_CREDENTIALS_MISSING_WARNING: &str =
    "Supabase URL or Anon Key not set. Database features are disabled. Please configure in Settings > Supabase.";
pub const SUPABASE_INIT_SUCCESS: &str =
    "Supabase client initialized successfully. Ready to connect to database.";
pub const SUPABASE_INIT_FAILURE: &str =
    "Failed to initialize Supabase client. Check credentials or console.";
pub const GEMINI_READY: &str = "Gemini API Key is set and service initialized.";
pub const GEMINI_INIT_FAILURE: &str =
    "Gemini API Key is set, but service initialization failed. Check console.";
pub const GEMINI_KEY_WARNING: &str = "Gemini API Key not set. AI-powered features are disabled. Please configure your API Key in Settings > API Key.";

/// Configuration errors raised while building clients
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Supabase URL or Anon Key not set")]
    MissingCredentials,
    #[error("invalid Supabase URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Credentials for the backing services. Any field may be missing.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendConfig {
    #[serde(default, alias = "SUPABASE_URL")]
    pub supabase_url: Option<String>,
    #[serde(default, alias = "SUPABASE_ANON_KEY")]
    pub supabase_anon_key: Option<String>,
    #[serde(default, alias = "GEMINI_API_KEY")]
    pub gemini_api_key: Option<String>,
}

impl BackendConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            supabase_url: Some(url.into()),
            supabase_anon_key: Some(anon_key.into()),
            gemini_api_key: None,
        }
    }

    /// URL and anon key, when both are present and non-blank
    pub fn supabase_credentials(&self) -> Option<(&str, &str)> {
        Some((non_blank(&self.supabase_url)?, non_blank(&self.supabase_anon_key)?))
    }

    pub fn gemini_key(&self) -> Option<&str> {
        non_blank(&self.gemini_api_key)
    }

    /// Fill blank fields from a lower-priority source
    pub fn or(self, fallback: BackendConfig) -> BackendConfig {
        fn pick(primary: Option<String>, fallback: Option<String>) -> Option<String> {
            match primary {
                Some(v) if !v.trim().is_empty() => Some(v),
                _ => fallback.filter(|v| !v.trim().is_empty()),
            }
        }
        BackendConfig {
            supabase_url: pick(self.supabase_url, fallback.supabase_url),
            supabase_anon_key: pick(self.supabase_anon_key, fallback.supabase_anon_key),
            gemini_api_key: pick(self.gemini_api_key, fallback.gemini_api_key),
        }
    }
}

// Keys never reach the logs.
impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secret = |v: &Option<String>| if non_blank(v).is_some() { "********" } else { "not set" };
        f.debug_struct("BackendConfig")
            .field("supabase_url", &non_blank(&self.supabase_url).unwrap_or("not set"))
            .field("supabase_anon_key", &secret(&self.supabase_anon_key))
            .field("gemini_api_key", &secret(&self.gemini_api_key))
            .finish()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Success,
    Error,
    Warning,
    NotConfigured,
}

/// Service status line shown in settings and banners
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub kind: StatusKind,
    pub message: String,
}

impl ServiceStatus {
    fn new(kind: StatusKind, message: &str) -> Self {
        Self {
            kind,
            message: message.to_string(),
        }
    }

    /// Remote store status from whether credentials were supplied and
    /// whether the client could be built from them
    pub fn supabase(attempted: bool, has_credentials: bool, initialized: bool) -> Self {
        match (has_credentials, initialized) {
            (true, true) => Self::new(StatusKind::Success, SUPABASE_INIT_SUCCESS),
            (true, false) => Self::new(StatusKind::Error, SUPABASE_INIT_FAILURE),
            (false, _) if attempted => {
                Self::new(StatusKind::Warning, SUPABASE_CREDENTIALS_MISSING_WARNING)
            }
            (false, _) => Self::new(StatusKind::NotConfigured, SUPABASE_NOT_CONFIGURED_YET_WARNING),
        }
    }

    pub fn gemini(has_key: bool, initialized: bool) -> Self {
        match (has_key, initialized) {
            (true, true) => Self::new(StatusKind::Success, GEMINI_READY),
            (true, false) => Self::new(StatusKind::Error, GEMINI_INIT_FAILURE),
            (false, _) => Self::new(StatusKind::Warning, GEMINI_KEY_WARNING),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == StatusKind::Success
    }
}
