//! Domain Layer
//!
//! Records exchanged with the remote store, their client-only state and the
//! form input that produces them.

mod contribution;
mod contributor;
mod entity;
mod form;
mod record_state;

pub use contribution::{Contribution, ContributionPatch, NewContribution};
pub use contributor::{Contributor, ContributorPatch, NewContributor, UNKNOWN_CONTRIBUTOR};
pub use entity::Entity;
pub use form::{ContributionForm, FormErrors, DATE_FORMAT};
pub use record_state::{ContributionFields, RecordState};
