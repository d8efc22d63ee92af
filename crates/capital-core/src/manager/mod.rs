//! Manager Layer
//!
//! Local state over the remote collections, with optimistic writes for
//! contributions.

mod contributions;
mod contributors;
mod delete;
mod error;
mod listeners;
mod tracker;

#[cfg(test)]
mod tests;

pub use contributions::ContributionManager;
pub use contributors::ContributorDirectory;
pub use delete::{ConfirmPrompt, DeleteRequest, DeleteToken};
pub use error::{ManagerError, ManagerResult, WriteAction};
pub use listeners::ListenerId;
pub use tracker::Tracker;
