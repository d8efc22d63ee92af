//! Optimistic Contribution Manager
//!
//! Owns the in-memory contribution list. Every write is applied locally
//! first, then sent to the remote store; the outcome either confirms the
//! local record or rolls it back.
//!
//! State lives behind a `RefCell` and no borrow is held across an await, so
//! several operations on different records can be in flight at once and
//! settle in any order. Records are correlated by temporary id (creates) or
//! id (updates, deletes). Two concurrent edits of the same record are not
//! coordinated: the last one to settle wins.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use chrono::Utc;

use super::delete::{ConfirmPrompt, DeleteRequest, DeleteToken};
use super::error::{ManagerError, ManagerResult, WriteAction};
use super::listeners::{ListenerId, Listeners};
use crate::domain::{Contribution, ContributionPatch, Contributor, NewContribution, RecordState};
use crate::repository::DeletableCollection;
use crate::stats::{self, ContributorSummary};

#[derive(Default)]
struct ListState {
    contributions: Vec<Contribution>,
    /// Bumped on every mutation of `contributions`
    revision: u64,
    pending_delete: Option<DeleteRequest>,
    deletes_in_flight: HashSet<String>,
}

pub struct ContributionManager<R> {
    remote: Rc<R>,
    state: RefCell<ListState>,
    listeners: Listeners<Contribution>,
    sequence: Cell<u64>,
}

impl<R: DeletableCollection<Contribution>> ContributionManager<R> {
    pub fn new(remote: Rc<R>) -> Self {
        Self {
            remote,
            state: RefCell::new(ListState::default()),
            listeners: Listeners::default(),
            sequence: Cell::new(0),
        }
    }

    /// Register an observer called with the full list after every change.
    /// Observers may read from the manager but must not subscribe from
    /// inside the callback.
    pub fn subscribe(&self, listener: impl Fn(&[Contribution]) + 'static) -> ListenerId {
        self.listeners.add(listener)
    }

    /// Stop notifying `id`. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn contributions(&self) -> Vec<Contribution> {
        self.state.borrow().contributions.clone()
    }

    pub fn get(&self, id: &str) -> Option<Contribution> {
        self.state.borrow().contributions.iter().find(|c| c.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().contributions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn summaries(&self, contributors: &[Contributor]) -> Vec<ContributorSummary> {
        stats::summarize(contributors, &self.state.borrow().contributions)
    }

    /// Replace the whole list with records fetched from the server
    pub fn replace_all(&self, contributions: Vec<Contribution>) {
        self.mutate(|list| {
            *list = contributions
                .into_iter()
                .map(|mut c| {
                    c.state = RecordState::Confirmed;
                    c.temporary_id = None;
                    c
                })
                .collect();
        });
    }

    /// Drop all local state, including a pending delete request
    pub fn reset(&self) {
        self.state.borrow_mut().pending_delete = None;
        self.mutate(|list| list.clear());
    }

    /// Create a contribution, showing it before the server confirms it
    pub async fn add(&self, draft: NewContribution) -> ManagerResult<Contribution> {
        let temporary_id = self.next_temporary_id();
        let placeholder = Contribution::optimistic(temporary_id.clone(), &draft, Utc::now());
        self.mutate(|list| list.push(placeholder));
        log::debug!("Optimistically added contribution {}", temporary_id);

        match self.remote.create(&draft).await {
            Ok(mut confirmed) => {
                confirmed.state = RecordState::Confirmed;
                confirmed.temporary_id = None;
                let record = confirmed.clone();
                self.mutate(|list| {
                    match list
                        .iter()
                        .position(|c| c.temporary_id.as_deref() == Some(temporary_id.as_str()))
                    {
                        Some(index) => list[index] = record,
                        None if !list.iter().any(|c| c.id == record.id) => list.push(record),
                        None => {}
                    }
                });
                log::debug!("Contribution {} confirmed as {}", temporary_id, confirmed.id);
                Ok(confirmed)
            }
            Err(source) => {
                log::error!("Error adding contribution: {}", source);
                self.mutate(|list| {
                    list.retain(|c| c.temporary_id.as_deref() != Some(temporary_id.as_str()))
                });
                Err(ManagerError::RemoteWrite {
                    action: WriteAction::Add,
                    source,
                })
            }
        }
    }

    /// Edit a confirmed contribution; on failure the exact previous values
    /// come back, flagged as errored
    pub async fn update(&self, id: &str, patch: ContributionPatch) -> ManagerResult<Contribution> {
        let Some(original) = self.get(id) else {
            log::warn!("Original contribution {} not found for update", id);
            return Err(ManagerError::NotFound(id.to_string()));
        };
        if original.is_unconfirmed_create() {
            log::warn!("Contribution {} has not been confirmed yet, update refused", id);
            return Err(ManagerError::StillPending(id.to_string()));
        }

        let mut optimistic = original.merged(&patch);
        optimistic.state = RecordState::PendingUpdate {
            previous: Box::new(original.fields()),
        };
        self.mutate(|list| replace_by_id(list, id, optimistic));
        log::debug!("Optimistically updated contribution {}", id);

        match self.remote.update(id, &patch.stamped(Utc::now())).await {
            Ok(mut confirmed) => {
                confirmed.state = RecordState::Confirmed;
                confirmed.temporary_id = None;
                let record = confirmed.clone();
                self.mutate(|list| replace_by_id(list, id, record));
                Ok(confirmed)
            }
            Err(source) => {
                log::error!("Error updating contribution {}: {}", id, source);
                let mut reverted = original;
                reverted.state = RecordState::Errored {
                    attempted: patch,
                    reason: source.user_message(),
                };
                self.mutate(|list| replace_by_id(list, id, reverted));
                Err(ManagerError::RemoteWrite {
                    action: WriteAction::Update,
                    source,
                })
            }
        }
    }

    /// First phase of a delete. Nothing changes yet; a newer request
    /// replaces an older one.
    pub fn request_delete(&self, id: &str) -> ManagerResult<DeleteRequest> {
        let mut state = self.state.borrow_mut();
        let Some(target) = state.contributions.iter().find(|c| c.id == id) else {
            log::warn!("Contribution {} not found for delete", id);
            return Err(ManagerError::NotFound(id.to_string()));
        };
        if target.is_unconfirmed_create() {
            return Err(ManagerError::StillPending(id.to_string()));
        }

        let request = DeleteRequest {
            token: DeleteToken(self.next_sequence()),
            contribution_id: id.to_string(),
            prompt: ConfirmPrompt::for_contribution(target),
        };
        state.pending_delete = Some(request.clone());
        Ok(request)
    }

    pub fn pending_delete(&self) -> Option<DeleteRequest> {
        self.state.borrow().pending_delete.clone()
    }

    /// Discard the pending request if `token` still names it
    pub fn cancel_delete(&self, token: DeleteToken) -> bool {
        let mut state = self.state.borrow_mut();
        match &state.pending_delete {
            Some(pending) if pending.token == token => {
                state.pending_delete = None;
                true
            }
            _ => false,
        }
    }

    /// Second phase: remove the record locally, then delete it remotely.
    /// On failure the list is restored to exactly what it was.
    pub async fn confirm_delete(&self, token: DeleteToken) -> ManagerResult<()> {
        let id = {
            let mut state = self.state.borrow_mut();
            match state.pending_delete.take() {
                Some(pending) if pending.token == token => pending.contribution_id,
                other => {
                    state.pending_delete = other;
                    log::warn!("Delete confirmation with unknown token {:?}", token);
                    return Err(ManagerError::NoPendingDelete);
                }
            }
        };

        if !self.state.borrow_mut().deletes_in_flight.insert(id.clone()) {
            log::warn!("Delete for contribution {} is already in flight", id);
            return Err(ManagerError::DeleteInFlight(id));
        }

        let removal = self.mutate_state(|state| {
            let index = state.contributions.iter().position(|c| c.id == id)?;
            let snapshot = state.contributions.clone();
            let removed = state.contributions.remove(index);
            Some((snapshot, index, removed))
        });
        let Some((snapshot, index, removed)) = removal else {
            self.state.borrow_mut().deletes_in_flight.remove(&id);
            return Err(ManagerError::NotFound(id));
        };
        let revision_after_removal = self.state.borrow().revision;
        log::debug!("Optimistically deleted contribution {}", id);

        let outcome = self.remote.delete(&id).await;
        self.state.borrow_mut().deletes_in_flight.remove(&id);

        match outcome {
            Ok(()) => Ok(()),
            Err(source) => {
                log::error!("Error deleting contribution {}: {}", id, source);
                self.mutate_state(|state| {
                    if state.revision == revision_after_removal {
                        state.contributions = snapshot;
                    } else if !state.contributions.iter().any(|c| c.id == removed.id) {
                        // Other writes landed meanwhile; keep them and put the
                        // record back where it was.
                        let at = index.min(state.contributions.len());
                        state.contributions.insert(at, removed);
                    }
                });
                Err(ManagerError::RemoteWrite {
                    action: WriteAction::Delete,
                    source,
                })
            }
        }
    }

    /// Clear error flags, as when the editing surface is opened or closed.
    /// Returns how many records were flagged.
    pub fn clear_errors(&self) -> usize {
        let flagged = self
            .state
            .borrow()
            .contributions
            .iter()
            .filter(|c| c.has_error())
            .count();
        if flagged > 0 {
            self.mutate(|list| {
                for c in list.iter_mut().filter(|c| c.has_error()) {
                    c.state = RecordState::Confirmed;
                }
            });
        }
        flagged
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut Vec<Contribution>) -> T) -> T {
        self.mutate_state(|state| f(&mut state.contributions))
    }

    fn mutate_state<T>(&self, f: impl FnOnce(&mut ListState) -> T) -> T {
        let (result, snapshot) = {
            let mut state = self.state.borrow_mut();
            let result = f(&mut state);
            state.revision += 1;
            (result, state.contributions.clone())
        };
        self.listeners.notify(&snapshot);
        result
    }

    fn next_sequence(&self) -> u64 {
        let next = self.sequence.get() + 1;
        self.sequence.set(next);
        next
    }

    fn next_temporary_id(&self) -> String {
        format!("optimistic-{}-{}", Utc::now().timestamp_millis(), self.next_sequence())
    }
}

fn replace_by_id(list: &mut [Contribution], id: &str, record: Contribution) {
    if let Some(slot) = list.iter_mut().find(|c| c.id == id) {
        *slot = record;
    }
}
