//! Tracker
//!
//! Both collections over one remote store, loaded together.

use std::rc::Rc;

use super::contributions::ContributionManager;
use super::contributors::ContributorDirectory;
use super::error::{ManagerError, ManagerResult};
use crate::domain::{Contribution, Contributor};
use crate::repository::{DeletableCollection, RemoteCollection};
use crate::stats::{self, ContributorSummary};

pub struct Tracker<R> {
    remote: Rc<R>,
    pub contributions: ContributionManager<R>,
    pub contributors: ContributorDirectory<R>,
}

impl<R> Tracker<R>
where
    R: DeletableCollection<Contribution> + RemoteCollection<Contributor>,
{
    pub fn new(remote: R) -> Self {
        let remote = Rc::new(remote);
        Self {
            contributions: ContributionManager::new(Rc::clone(&remote)),
            contributors: ContributorDirectory::new(Rc::clone(&remote)),
            remote,
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Fetch contributors and contributions concurrently. If either fails,
    /// both lists are cleared.
    pub async fn load(&self) -> ManagerResult<()> {
        let (contributors, contributions) = futures::join!(
            RemoteCollection::<Contributor>::list(self.remote.as_ref()),
            RemoteCollection::<Contribution>::list(self.remote.as_ref()),
        );

        match (contributors, contributions) {
            (Ok(contributors), Ok(contributions)) => {
                log::info!(
                    "Loaded {} contributors and {} contributions",
                    contributors.len(),
                    contributions.len()
                );
                self.contributors.replace_all(contributors);
                self.contributions.replace_all(contributions);
                Ok(())
            }
            (Err(source), _) | (_, Err(source)) => {
                log::error!("Error fetching data: {}", source);
                self.reset();
                Err(ManagerError::RemoteRead { source })
            }
        }
    }

    pub fn summaries(&self) -> Vec<ContributorSummary> {
        self.contributions.summaries(&self.contributors.contributors())
    }

    pub fn grand_total(&self) -> f64 {
        stats::grand_total(&self.contributions.contributions())
    }

    pub fn reset(&self) {
        self.contributors.replace_all(Vec::new());
        self.contributions.reset();
    }
}
