//! Manager Errors
//!
//! Every variant leaves local state consistent; the text is what the user
//! sees in the alert.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::repository::RemoteError;

/// Common result type for manager operations
pub type ManagerResult<T> = Result<T, ManagerError>;

/// Kind of remote write that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteAction {
    Add,
    Update,
    Delete,
}

impl WriteAction {
    /// What happened to local state after the failure
    pub fn recovery(&self) -> &'static str {
        match self {
            WriteAction::Add => "Removing optimistic entry.",
            WriteAction::Update => "Reverting changes.",
            WriteAction::Delete => "Reverting deletion.",
        }
    }
}

impl fmt::Display for WriteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WriteAction::Add => "add",
            WriteAction::Update => "update",
            WriteAction::Delete => "delete",
        })
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ManagerError {
    #[error("Contribution {0} not found.")]
    NotFound(String),
    #[error("Contribution {0} is still being saved. Try again once it is confirmed.")]
    StillPending(String),
    #[error("Contribution {0} is already being deleted.")]
    DeleteInFlight(String),
    #[error("No deletion is waiting for confirmation.")]
    NoPendingDelete,
    #[error("{0}")]
    Invalid(String),
    #[error("Failed to {action} contribution: {}. {}", clause(.source), .action.recovery())]
    RemoteWrite {
        action: WriteAction,
        source: RemoteError,
    },
    #[error("Failed to {action} contributor: {source}")]
    ContributorWrite {
        action: WriteAction,
        source: RemoteError,
    },
    #[error("Error fetching data: {}. Check Supabase setup and console.", clause(.source))]
    RemoteRead { source: RemoteError },
}

/// Remote message without its closing period, for embedding in a sentence
fn clause(error: &RemoteError) -> String {
    error.user_message().trim_end_matches('.').to_string()
}

impl ManagerError {
    /// The remote error behind this failure, if the remote store was involved
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            ManagerError::RemoteWrite { source, .. }
            | ManagerError::ContributorWrite { source, .. }
            | ManagerError::RemoteRead { source } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_failure_text() {
        let err = ManagerError::RemoteWrite {
            action: WriteAction::Delete,
            source: RemoteError::code("403"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to delete contribution: Operation failed with error code: 403. Reverting deletion."
        );
        assert!(err.remote().is_some());
    }

    #[test]
    fn test_add_failure_text() {
        let err = ManagerError::RemoteWrite {
            action: WriteAction::Add,
            source: RemoteError::message("Failed to fetch"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to add contribution: Failed to fetch. Removing optimistic entry."
        );
        assert!(ManagerError::NoPendingDelete.remote().is_none());
    }
}
