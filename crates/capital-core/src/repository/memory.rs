//! In-Memory Repository Implementation
//!
//! Process-local stand-in for the remote store: assigns ids and timestamps
//! like the server does, and can be told to fail upcoming calls. Used for
//! the offline demo mode and in tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use chrono::Utc;

use super::error::{RemoteError, RemoteResult};
use super::traits::{DeletableCollection, RemoteCollection};
use crate::domain::{Contribution, ContributionPatch, Contributor, ContributorPatch, Entity, NewContribution, NewContributor};

#[derive(Default)]
struct MemoryState {
    contributions: Vec<Contribution>,
    contributors: Vec<Contributor>,
    next_id: u64,
    failures: VecDeque<RemoteError>,
    calls: Vec<String>,
}

impl MemoryState {
    fn next_id(&mut self) -> String {
        self.next_id += 1;
        format!("00000000-0000-4000-8000-{:012x}", self.next_id)
    }

    fn record(&mut self, call: String) -> RemoteResult<()> {
        self.calls.push(call);
        match self.failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Shared handle; clones see the same data
#[derive(Clone, Default)]
pub struct MemoryCollection {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection pre-filled with records, as if loaded from the server
    pub fn seeded(contributors: Vec<Contributor>, contributions: Vec<Contribution>) -> Self {
        let collection = Self::new();
        {
            let mut state = collection.state.borrow_mut();
            state.contributors = contributors;
            state.contributions = contributions;
        }
        collection
    }

    /// Make the next call fail with `error`. Queued failures apply in order.
    pub fn fail_next(&self, error: RemoteError) {
        self.state.borrow_mut().failures.push_back(error);
    }

    /// Calls received so far, as `"<verb> <table>[ <id>]"`
    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub fn stored_contributions(&self) -> Vec<Contribution> {
        self.state.borrow().contributions.clone()
    }

    pub fn stored_contributors(&self) -> Vec<Contributor> {
        self.state.borrow().contributors.clone()
    }
}

fn not_found<T: Entity>(id: &str) -> RemoteError {
    RemoteError::message(format!("{} {id} not found", T::NOUN))
        .with_code("PGRST116")
}

#[async_trait(?Send)]
impl RemoteCollection<Contribution> for MemoryCollection {
    async fn list(&self) -> RemoteResult<Vec<Contribution>> {
        let mut state = self.state.borrow_mut();
        state.record(format!("list {}", Contribution::TABLE))?;
        let mut rows = state.contributions.clone();
        rows.sort_by(|a, b| b.contributed_at.cmp(&a.contributed_at));
        Ok(rows)
    }

    async fn create(&self, draft: &NewContribution) -> RemoteResult<Contribution> {
        let mut state = self.state.borrow_mut();
        state.record(format!("create {}", Contribution::TABLE))?;
        let now = Utc::now();
        let row = Contribution {
            id: state.next_id(),
            contributor_id: draft.contributor_id.clone(),
            contributed_at: draft.contributed_at,
            amount_usd: draft.amount_usd,
            comment: draft.comment.clone(),
            created_at: Some(now),
            updated_at: Some(now),
            temporary_id: None,
            state: Default::default(),
        };
        state.contributions.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: &str, patch: &ContributionPatch) -> RemoteResult<Contribution> {
        let mut state = self.state.borrow_mut();
        state.record(format!("update {} {id}", Contribution::TABLE))?;
        let row = state
            .contributions
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found::<Contribution>(id))?;
        let mut updated = row.merged(patch);
        updated.updated_at = Some(patch.updated_at.unwrap_or_else(Utc::now));
        *row = updated.clone();
        Ok(updated)
    }
}

#[async_trait(?Send)]
impl DeletableCollection<Contribution> for MemoryCollection {
    async fn delete(&self, id: &str) -> RemoteResult<()> {
        let mut state = self.state.borrow_mut();
        state.record(format!("delete {} {id}", Contribution::TABLE))?;
        state.contributions.retain(|c| c.id != id);
        Ok(())
    }
}

#[async_trait(?Send)]
impl RemoteCollection<Contributor> for MemoryCollection {
    async fn list(&self) -> RemoteResult<Vec<Contributor>> {
        let mut state = self.state.borrow_mut();
        state.record(format!("list {}", Contributor::TABLE))?;
        let mut rows = state.contributors.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn create(&self, draft: &NewContributor) -> RemoteResult<Contributor> {
        let mut state = self.state.borrow_mut();
        state.record(format!("create {}", Contributor::TABLE))?;
        let row = Contributor {
            id: state.next_id(),
            name: draft.name.clone(),
            email: draft.email.clone(),
            profile_picture_url: draft.profile_picture_url.clone(),
            created_at: Some(Utc::now()),
        };
        state.contributors.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: &str, patch: &ContributorPatch) -> RemoteResult<Contributor> {
        let mut state = self.state.borrow_mut();
        state.record(format!("update {} {id}", Contributor::TABLE))?;
        let row = state
            .contributors
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found::<Contributor>(id))?;
        patch.apply_to(row);
        Ok(row.clone())
    }
}
