//! Contribution Entity
//!
//! One capital contribution event, plus the create and update payloads.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::record_state::{ContributionFields, RecordState};
use crate::format::format_usd;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    /// Server-assigned UUID, or the temporary id while a create is in flight
    pub id: String,
    pub contributor_id: String,
    pub contributed_at: NaiveDate,
    pub amount_usd: f64,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    // Client-only fields
    #[serde(skip)]
    pub temporary_id: Option<String>,
    #[serde(skip)]
    pub state: RecordState,
}

impl Contribution {
    /// Local placeholder for a create that has not been confirmed yet
    pub fn optimistic(temporary_id: String, draft: &NewContribution, now: DateTime<Utc>) -> Self {
        Self {
            id: temporary_id.clone(),
            contributor_id: draft.contributor_id.clone(),
            contributed_at: draft.contributed_at,
            amount_usd: draft.amount_usd,
            comment: draft.comment.clone(),
            created_at: Some(now),
            updated_at: Some(now),
            temporary_id: Some(temporary_id),
            state: RecordState::PendingCreate,
        }
    }

    pub fn is_optimistic(&self) -> bool {
        self.state.is_optimistic()
    }

    pub fn has_error(&self) -> bool {
        self.state.has_error()
    }

    /// True while the record only exists locally
    pub fn is_unconfirmed_create(&self) -> bool {
        matches!(self.state, RecordState::PendingCreate)
    }

    pub fn fields(&self) -> ContributionFields {
        ContributionFields {
            contributed_at: self.contributed_at,
            amount_usd: self.amount_usd,
            comment: self.comment.clone(),
            updated_at: self.updated_at,
        }
    }

    /// Copy with the patch merged in; the state is left untouched
    pub fn merged(&self, patch: &ContributionPatch) -> Self {
        let mut next = self.clone();
        if let Some(date) = patch.contributed_at {
            next.contributed_at = date;
        }
        if let Some(amount) = patch.amount_usd {
            next.amount_usd = amount;
        }
        if let Some(comment) = &patch.comment {
            next.comment = comment.clone();
        }
        if let Some(updated_at) = patch.updated_at {
            next.updated_at = Some(updated_at);
        }
        next
    }

    /// Text identifying the record in confirmation prompts
    pub fn label(&self) -> String {
        match self.comment.as_deref().map(str::trim) {
            Some(comment) if !comment.is_empty() => comment.to_string(),
            _ => format!("Amount: {}", format_usd(self.amount_usd)),
        }
    }

}

impl Entity for Contribution {
    type Draft = NewContribution;
    type Patch = ContributionPatch;

    const TABLE: &'static str = "contributions";
    const ORDER: Option<&'static str> = Some("contributed_at.desc");
    const NOUN: &'static str = "contribution";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Create payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewContribution {
    pub contributor_id: String,
    pub contributed_at: NaiveDate,
    pub amount_usd: f64,
    pub comment: Option<String>,
}

/// Update payload. The contributor reference is immutable after creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContributionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributed_at: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ContributionPatch {
    pub fn is_empty(&self) -> bool {
        self.contributed_at.is_none() && self.amount_usd.is_none() && self.comment.is_none()
    }

    /// Same patch carrying a refreshed update timestamp
    pub fn stamped(&self, now: DateTime<Utc>) -> Self {
        Self {
            updated_at: Some(now),
            ..self.clone()
        }
    }

    /// Patch that rewrites every mutable field from a validated form
    pub fn from_draft(draft: &NewContribution) -> Self {
        Self {
            contributed_at: Some(draft.contributed_at),
            amount_usd: Some(draft.amount_usd),
            comment: Some(draft.comment.clone()),
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_client_fields_are_not_serialized() {
        let draft = NewContribution {
            contributor_id: "a".into(),
            contributed_at: date("2025-05-08"),
            amount_usd: 50.0,
            comment: None,
        };
        let c = Contribution::optimistic("optimistic-1".into(), &draft, Utc::now());
        let json = serde_json::to_value(&c).unwrap();
        assert!(json.get("temporary_id").is_none());
        assert!(json.get("state").is_none());
        assert_eq!(json["contributed_at"], "2025-05-08");
    }

    #[test]
    fn test_deserialize_server_row() {
        let json = r#"{
            "id": "5f0c",
            "contributor_id": "a",
            "contributed_at": "2025-05-14",
            "amount_usd": 6000,
            "comment": "Capital p1",
            "created_at": "2025-05-14T10:00:00.123456+00:00",
            "updated_at": null
        }"#;
        let c: Contribution = serde_json::from_str(json).unwrap();
        assert_eq!(c.amount_usd, 6000.0);
        assert_eq!(c.state, RecordState::Confirmed);
        assert!(c.temporary_id.is_none());
        assert!(c.created_at.is_some());
    }

    #[test]
    fn test_merge_keeps_contributor() {
        let draft = NewContribution {
            contributor_id: "a".into(),
            contributed_at: date("2025-05-08"),
            amount_usd: 50.0,
            comment: Some("Test".into()),
        };
        let c = Contribution::optimistic("t".into(), &draft, Utc::now());
        let patch = ContributionPatch {
            amount_usd: Some(75.5),
            comment: Some(None),
            ..Default::default()
        };
        let merged = c.merged(&patch);
        assert_eq!(merged.amount_usd, 75.5);
        assert_eq!(merged.comment, None);
        assert_eq!(merged.contributor_id, "a");
        assert_eq!(merged.contributed_at, c.contributed_at);
    }

    #[test]
    fn test_label_falls_back_to_amount() {
        let draft = NewContribution {
            contributor_id: "a".into(),
            contributed_at: date("2025-05-08"),
            amount_usd: 6000.0,
            comment: Some("  ".into()),
        };
        let c = Contribution::optimistic("t".into(), &draft, Utc::now());
        assert_eq!(c.label(), "Amount: $6,000.00");
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = ContributionPatch {
            amount_usd: Some(10.0),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"amount_usd":10.0}"#);
    }
}
