//! Contributor Entity
//!
//! A person who contributes capital.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// Display name for a contributor id with no matching record
pub const UNKNOWN_CONTRIBUTOR: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Profile image reference (stored lowercase on the remote side)
    #[serde(default, rename = "profilepictureurl")]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Contributor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            profile_picture_url: None,
            created_at: None,
        }
    }

    /// Initials shown when there is no profile picture
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

impl Entity for Contributor {
    type Draft = NewContributor;
    type Patch = ContributorPatch;

    const TABLE: &'static str = "contributors";
    const COLUMNS: &'static str = "id,name,email,created_at,profilepictureurl";
    const ORDER: Option<&'static str> = Some("name.asc");
    const NOUN: &'static str = "contributor";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Create payload for a contributor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewContributor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "profilepictureurl", skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
}

impl NewContributor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            profile_picture_url: None,
        }
    }
}

/// Partial update for a contributor; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContributorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(rename = "profilepictureurl", skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<Option<String>>,
}

impl ContributorPatch {
    pub fn apply_to(&self, contributor: &mut Contributor) {
        if let Some(name) = &self.name {
            contributor.name = name.clone();
        }
        if let Some(email) = &self.email {
            contributor.email = email.clone();
        }
        if let Some(url) = &self.profile_picture_url {
            contributor.profile_picture_url = url.clone();
        }
    }
}
