//! Two-phase delete: a request produces a token and a prompt; only a
//! confirmation carrying the same token performs the delete.

use serde::{Deserialize, Serialize};

use crate::domain::Contribution;

/// Identifies one outstanding delete request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeleteToken(pub(crate) u64);

/// Text for the confirmation dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmPrompt {
    pub title: String,
    pub description: String,
    pub confirm_label: String,
}

impl ConfirmPrompt {
    pub fn for_contribution(contribution: &Contribution) -> Self {
        Self {
            title: "Delete Contribution?".to_string(),
            description: format!(
                "Are you sure you want to delete the contribution: \"{}\"? This action cannot be undone.",
                contribution.label()
            ),
            confirm_label: "Delete".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub token: DeleteToken,
    pub contribution_id: String,
    pub prompt: ConfirmPrompt,
}
