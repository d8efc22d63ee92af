//! Repository Layer - Core Traits
//!
//! Abstract interface to the remote store. Implementations: the HTTP
//! client and the in-memory collection.
//!
//! Futures are not required to be `Send`: everything runs on the browser's
//! single-threaded event loop.

use async_trait::async_trait;

use super::error::RemoteResult;
use crate::domain::Entity;

/// Core remote collection trait: list, create and update
#[async_trait(?Send)]
pub trait RemoteCollection<T: Entity> {
    /// List all records
    async fn list(&self) -> RemoteResult<Vec<T>>;

    /// Create a record and return the stored representation
    async fn create(&self, draft: &T::Draft) -> RemoteResult<T>;

    /// Apply a partial update and return the stored representation
    async fn update(&self, id: &str, patch: &T::Patch) -> RemoteResult<T>;
}

/// Extension for collections whose records may be deleted
#[async_trait(?Send)]
pub trait DeletableCollection<T: Entity>: RemoteCollection<T> {
    /// Delete a record by ID
    async fn delete(&self, id: &str) -> RemoteResult<()>;
}
