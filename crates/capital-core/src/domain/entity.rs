//! Domain Layer - Core Entity Trait
//!
//! Every record kept in a remote collection has a string identifier and a
//! table name, plus the payload shapes used to create and update it.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Core trait for all records stored in a remote collection
pub trait Entity: Sized + Clone + DeserializeOwned + 'static {
    /// Payload sent on create (never carries an identifier)
    type Draft: Serialize;
    /// Partial payload sent on update
    type Patch: Serialize;

    /// Remote table the entity lives in
    const TABLE: &'static str;
    /// Column list requested on reads and write representations
    const COLUMNS: &'static str = "*";
    /// PostgREST ordering applied on list
    const ORDER: Option<&'static str> = None;
    /// Human-readable singular name, used in error messages
    const NOUN: &'static str;

    /// Returns the entity's unique identifier
    fn id(&self) -> &str;
}
