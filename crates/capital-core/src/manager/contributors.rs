//! Contributor Directory
//!
//! Contributors change rarely, so writes here wait for the server and are
//! not applied optimistically. The list is kept sorted by name.

use std::cell::RefCell;
use std::rc::Rc;

use super::error::{ManagerError, ManagerResult, WriteAction};
use super::listeners::{ListenerId, Listeners};
use crate::domain::{Contributor, ContributorPatch, NewContributor, UNKNOWN_CONTRIBUTOR};
use crate::repository::RemoteCollection;

pub struct ContributorDirectory<R> {
    remote: Rc<R>,
    contributors: RefCell<Vec<Contributor>>,
    listeners: Listeners<Contributor>,
}

impl<R: RemoteCollection<Contributor>> ContributorDirectory<R> {
    pub fn new(remote: Rc<R>) -> Self {
        Self {
            remote,
            contributors: RefCell::new(Vec::new()),
            listeners: Listeners::default(),
        }
    }

    pub fn subscribe(&self, listener: impl Fn(&[Contributor]) + 'static) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn contributors(&self) -> Vec<Contributor> {
        self.contributors.borrow().clone()
    }

    pub fn get(&self, id: &str) -> Option<Contributor> {
        self.contributors.borrow().iter().find(|c| c.id == id).cloned()
    }

    pub fn name_of(&self, id: &str) -> String {
        self.get(id)
            .map(|c| c.name)
            .unwrap_or_else(|| UNKNOWN_CONTRIBUTOR.to_string())
    }

    pub fn replace_all(&self, contributors: Vec<Contributor>) {
        self.mutate(|list| *list = contributors);
    }

    pub async fn add(&self, draft: NewContributor) -> ManagerResult<Contributor> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(ManagerError::Invalid("Contributor name is required.".to_string()));
        }
        let draft = NewContributor {
            name: name.to_string(),
            ..draft
        };

        let created = self.remote.create(&draft).await.map_err(|source| {
            log::error!("Error adding contributor: {}", source);
            ManagerError::ContributorWrite {
                action: WriteAction::Add,
                source,
            }
        })?;
        let record = created.clone();
        self.mutate(|list| list.push(record));
        Ok(created)
    }

    pub async fn update(&self, id: &str, patch: ContributorPatch) -> ManagerResult<Contributor> {
        if self.get(id).is_none() {
            log::warn!("Contributor {} not found for update", id);
            return Err(ManagerError::NotFound(id.to_string()));
        }
        let mut patch = patch;
        if let Some(name) = patch.name.as_mut() {
            let trimmed = name.trim().to_string();
            if trimmed.is_empty() {
                return Err(ManagerError::Invalid("Contributor name is required.".to_string()));
            }
            *name = trimmed;
        }

        let updated = self.remote.update(id, &patch).await.map_err(|source| {
            log::error!("Error updating contributor {}: {}", id, source);
            ManagerError::ContributorWrite {
                action: WriteAction::Update,
                source,
            }
        })?;
        let record = updated.clone();
        self.mutate(|list| {
            if let Some(slot) = list.iter_mut().find(|c| c.id == record.id) {
                *slot = record;
            }
        });
        Ok(updated)
    }

    fn mutate(&self, f: impl FnOnce(&mut Vec<Contributor>)) {
        let snapshot = {
            let mut list = self.contributors.borrow_mut();
            f(&mut list);
            list.sort_by_key(|c| c.name.to_lowercase());
            list.clone()
        };
        self.listeners.notify(&snapshot);
    }
}
