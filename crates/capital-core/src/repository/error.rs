//! Remote Store Errors
//!
//! Structured error returned by the remote collection, and its
//! user-facing rendering.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub const UNKNOWN_ERROR_MESSAGE: &str =
    "An unknown error occurred. Check the console for more details.";

/// Common result type for remote operations
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Error payload of the remote store. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteError {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl RemoteError {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn code(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Default::default()
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Human-readable text: message (+ code), else code + details + hint,
    /// else a generic fallback.
    pub fn user_message(&self) -> String {
        if let Some(message) = non_blank(&self.message) {
            return match &self.code {
                Some(code) => format!("{message} (Code: {code})"),
                None => message.to_string(),
            };
        }
        if let Some(code) = &self.code {
            let mut text = format!("Operation failed with error code: {code}.");
            if let Some(details) = non_blank(&self.details) {
                text.push_str(&format!(" Details: {details}"));
            }
            if let Some(hint) = non_blank(&self.hint) {
                text.push_str(&format!(" Hint: {hint}"));
            }
            return text;
        }
        UNKNOWN_ERROR_MESSAGE.to_string()
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message())
    }
}

impl std::error::Error for RemoteError {}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
