//! Record State
//!
//! Client-only lifecycle of a contribution with respect to the remote store.
//! Never serialized.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::contribution::ContributionPatch;

/// The mutable fields of a contribution, captured before an optimistic edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionFields {
    pub contributed_at: NaiveDate,
    pub amount_usd: f64,
    pub comment: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Where a record stands relative to the system of record
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RecordState {
    /// Matches what the remote store returned
    #[default]
    Confirmed,
    /// Created locally, remote create in flight
    PendingCreate,
    /// Edited locally, remote update in flight
    PendingUpdate { previous: Box<ContributionFields> },
    /// The last remote write for this record failed and was rolled back
    Errored {
        attempted: ContributionPatch,
        reason: String,
    },
}

impl RecordState {
    pub fn is_optimistic(&self) -> bool {
        matches!(self, RecordState::PendingCreate | RecordState::PendingUpdate { .. })
    }

    pub fn has_error(&self) -> bool {
        matches!(self, RecordState::Errored { .. })
    }

    /// Short label for tooltips / row badges
    pub fn label(&self) -> Option<&'static str> {
        match self {
            RecordState::Confirmed => None,
            RecordState::PendingCreate | RecordState::PendingUpdate { .. } => Some("Processing..."),
            RecordState::Errored { .. } => Some("Error with this item"),
        }
    }
}
