//! Contribution table query: search, contributor filter and column sort.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Contribution, Contributor, UNKNOWN_CONTRIBUTOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    CreatedAt,
    ContributedAt,
    ContributorName,
    Amount,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuery {
    pub search: String,
    pub contributor_id: Option<String>,
    pub sort_key: SortKey,
    pub direction: SortDirection,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            contributor_id: None,
            sort_key: SortKey::CreatedAt,
            direction: SortDirection::Descending,
        }
    }
}

impl TableQuery {
    /// Re-selecting the ascending column flips it; anything else sorts ascending
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.direction = if self.sort_key == key && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        self.sort_key = key;
    }

    /// Direction indicator for a column header, if it is the sorted column
    pub fn direction_for(&self, key: SortKey) -> Option<SortDirection> {
        (self.sort_key == key).then_some(self.direction)
    }

    pub fn apply<'a>(&self, contributions: &'a [Contribution], contributors: &[Contributor]) -> Vec<&'a Contribution> {
        let names: HashMap<&str, &str> = contributors
            .iter()
            .map(|c| (c.id.as_str(), c.name.as_str()))
            .collect();
        let name_of = |c: &Contribution| names.get(c.contributor_id.as_str()).copied().unwrap_or(UNKNOWN_CONTRIBUTOR);
        let term = self.search.trim().to_lowercase();

        let mut rows: Vec<&Contribution> = contributions
            .iter()
            .filter(|c| match &self.contributor_id {
                Some(id) if !id.is_empty() => &c.contributor_id == id,
                _ => true,
            })
            .filter(|c| term.is_empty() || matches_search(c, name_of(c), &term))
            .collect();

        rows.sort_by(|a, b| {
            let ordering = match self.sort_key {
                SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
                SortKey::ContributedAt => a.contributed_at.cmp(&b.contributed_at),
                SortKey::ContributorName => name_of(a).to_lowercase().cmp(&name_of(b).to_lowercase()),
                SortKey::Amount => a.amount_usd.partial_cmp(&b.amount_usd).unwrap_or(Ordering::Equal),
                SortKey::Comment => a.comment.cmp(&b.comment),
            };
            match self.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        rows
    }
}

fn matches_search(c: &Contribution, contributor_name: &str, term: &str) -> bool {
    c.amount_usd.to_string().contains(term)
        || c
            .comment
            .as_deref()
            .is_some_and(|comment| comment.to_lowercase().contains(term))
        || contributor_name.to_lowercase().contains(term)
        || c.contributed_at.format("%Y-%m-%d").to_string().contains(term)
        || c.contributed_at.format("%-m/%-d/%Y").to_string().contains(term)
}
