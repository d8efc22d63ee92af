//! Capital Tracker Core
//!
//! Everything below the UI: the contribution and contributor records, the
//! remote collection clients, the optimistic contribution manager and the
//! statistics derived from its list.

pub mod config;
pub mod domain;
pub mod format;
pub mod manager;
pub mod repository;
pub mod stats;
pub mod suggest;
pub mod table;

pub use config::{BackendConfig, ConfigError, ServiceStatus, StatusKind};
pub use domain::{
    Contribution, ContributionForm, ContributionPatch, Contributor, ContributorPatch, FormErrors,
    NewContribution, NewContributor, RecordState, UNKNOWN_CONTRIBUTOR,
};
pub use manager::{
    ConfirmPrompt, ContributionManager, ContributorDirectory, DeleteRequest, DeleteToken, ListenerId,
    ManagerError, ManagerResult, Tracker,
};
pub use repository::{DeletableCollection, MemoryCollection, RemoteCollection, RemoteError, SupabaseClient};
pub use stats::{ChartSlice, ContributorSummary, SummaryStats};
pub use suggest::CommentSuggester;
pub use table::{SortDirection, SortKey, TableQuery};
