//! Manager Integration Tests
//!
//! `GatedRemote` holds every write until the test releases it, so the
//! optimistic state can be inspected while a call is in flight and calls
//! can be settled in any order.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::oneshot;

use super::*;
use crate::domain::{
    Contribution, ContributionPatch, Contributor, ContributorPatch, NewContribution, NewContributor, RecordState,
    UNKNOWN_CONTRIBUTOR,
};
use crate::repository::{DeletableCollection, MemoryCollection, RemoteCollection, RemoteError, RemoteResult};
use crate::stats;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Create(NewContribution),
    Update(String, ContributionPatch),
    Delete(String),
}

type Reply = RemoteResult<Option<Contribution>>;

#[derive(Default)]
struct GatedRemote {
    waiting: RefCell<Vec<(Call, oneshot::Sender<Reply>)>>,
}

impl GatedRemote {
    fn gate(&self, call: Call) -> oneshot::Receiver<Reply> {
        let (tx, rx) = oneshot::channel();
        self.waiting.borrow_mut().push((call, tx));
        rx
    }

    fn waiting(&self) -> Vec<Call> {
        self.waiting.borrow().iter().map(|(call, _)| call.clone()).collect()
    }

    fn release(&self, index: usize, reply: Reply) {
        let (_, tx) = self.waiting.borrow_mut().remove(index);
        tx.send(reply).expect("caller went away");
    }

    async fn reply(rx: oneshot::Receiver<Reply>) -> Reply {
        rx.await.unwrap_or_else(|_| Err(RemoteError::message("gate dropped")))
    }
}

#[async_trait(?Send)]
impl RemoteCollection<Contribution> for GatedRemote {
    async fn list(&self) -> RemoteResult<Vec<Contribution>> {
        Ok(Vec::new())
    }

    async fn create(&self, draft: &NewContribution) -> RemoteResult<Contribution> {
        let rx = self.gate(Call::Create(draft.clone()));
        Self::reply(rx)
            .await?
            .ok_or_else(|| RemoteError::message("no data returned"))
    }

    async fn update(&self, id: &str, patch: &ContributionPatch) -> RemoteResult<Contribution> {
        let rx = self.gate(Call::Update(id.to_string(), patch.clone()));
        Self::reply(rx)
            .await?
            .ok_or_else(|| RemoteError::message("no data returned"))
    }
}

#[async_trait(?Send)]
impl DeletableCollection<Contribution> for GatedRemote {
    async fn delete(&self, id: &str) -> RemoteResult<()> {
        let rx = self.gate(Call::Delete(id.to_string()));
        Self::reply(rx).await.map(|_| ())
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn draft(contributor: &str, amount: f64) -> NewContribution {
    NewContribution {
        contributor_id: contributor.into(),
        contributed_at: date(2025, 5, 8),
        amount_usd: amount,
        comment: Some("Test Transaction".into()),
    }
}

fn confirmed(id: &str, contributor: &str, amount: f64, comment: Option<&str>) -> Contribution {
    Contribution {
        id: id.into(),
        contributor_id: contributor.into(),
        contributed_at: date(2025, 1, 15),
        amount_usd: amount,
        comment: comment.map(String::from),
        created_at: Some(Utc::now()),
        updated_at: Some(Utc::now()),
        temporary_id: None,
        state: RecordState::Confirmed,
    }
}

fn server_row(id: &str, draft: &NewContribution) -> Contribution {
    Contribution {
        id: id.into(),
        contributor_id: draft.contributor_id.clone(),
        contributed_at: draft.contributed_at,
        amount_usd: draft.amount_usd,
        comment: draft.comment.clone(),
        created_at: Some(Utc::now()),
        updated_at: Some(Utc::now()),
        temporary_id: None,
        state: RecordState::Confirmed,
    }
}

fn gated() -> (Rc<GatedRemote>, ContributionManager<GatedRemote>) {
    let remote = Rc::new(GatedRemote::default());
    let manager = ContributionManager::new(Rc::clone(&remote));
    (remote, manager)
}

fn ids(manager: &ContributionManager<impl DeletableCollection<Contribution>>) -> Vec<String> {
    manager.contributions().into_iter().map(|c| c.id).collect()
}

// ========================================================================
// Create
// ========================================================================

#[tokio::test]
async fn test_add_shows_record_before_confirmation() {
    let (remote, manager) = gated();
    let notified = Rc::new(Cell::new(0));
    let counter = Rc::clone(&notified);
    manager.subscribe(move |_| counter.set(counter.get() + 1));
    let new = draft("a", 50.0);

    let (result, ()) = futures::join!(manager.add(new.clone()), async {
        let list = manager.contributions();
        assert_eq!(list.len(), 1);
        assert!(list[0].is_optimistic());
        assert!(list[0].id.starts_with("optimistic-"));
        assert_eq!(list[0].temporary_id.as_deref(), Some(list[0].id.as_str()));
        assert_eq!(list[0].amount_usd, 50.0);
        assert_eq!(remote.waiting(), vec![Call::Create(new.clone())]);

        remote.release(0, Ok(Some(server_row("srv-1", &new))));
    });

    let created = result.expect("add should succeed");
    assert_eq!(created.id, "srv-1");
    let list = manager.contributions();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, "srv-1");
    assert_eq!(list[0].state, RecordState::Confirmed);
    assert!(list[0].temporary_id.is_none());
    assert_eq!(notified.get(), 2);
}

#[tokio::test]
async fn test_failed_add_removes_placeholder() {
    let (remote, manager) = gated();

    let (result, ()) = futures::join!(manager.add(draft("a", 50.0)), async {
        // The in-flight record already counts toward totals
        assert_eq!(stats::grand_total(&manager.contributions()), 50.0);
        remote.release(0, Err(RemoteError::message("Failed to fetch")));
    });

    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to add contribution: Failed to fetch. Removing optimistic entry."
    );
    assert!(manager.is_empty());
    assert_eq!(stats::grand_total(&manager.contributions()), 0.0);
}

#[tokio::test]
async fn test_adds_settle_out_of_order() {
    let (remote, manager) = gated();
    let first = draft("a", 10.0);
    let second = draft("b", 20.0);

    let (a, b, ()) = futures::join!(manager.add(first.clone()), manager.add(second.clone()), async {
        assert_eq!(remote.waiting().len(), 2);
        remote.release(1, Ok(Some(server_row("srv-b", &second))));
        tokio::task::yield_now().await;

        let list = manager.contributions();
        assert!(list[0].is_optimistic());
        assert_eq!(list[1].id, "srv-b");
        assert!(!list[1].is_optimistic());

        remote.release(0, Ok(Some(server_row("srv-a", &first))));
    });

    assert!(a.is_ok() && b.is_ok());
    assert_eq!(ids(&manager), vec!["srv-a", "srv-b"]);
    assert!(manager.contributions().iter().all(|c| !c.is_optimistic()));
}

#[tokio::test]
async fn test_unsubscribed_listener_misses_late_settle() {
    let (remote, manager) = gated();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let listener = manager.subscribe(move |list| sink.borrow_mut().push(list.len()));
    let new = draft("a", 50.0);

    let (result, ()) = futures::join!(manager.add(new.clone()), async {
        assert_eq!(*seen.borrow(), vec![1]);
        // Detached while the create is still in flight
        assert!(manager.unsubscribe(listener));
        remote.release(0, Ok(Some(server_row("srv-1", &new))));
    });

    assert!(result.is_ok());
    assert_eq!(*seen.borrow(), vec![1]);
    assert_eq!(ids(&manager), vec!["srv-1"]);
    assert!(!manager.unsubscribe(listener));
}

// ========================================================================
// Update
// ========================================================================

#[tokio::test]
async fn test_update_missing_record_makes_no_call() {
    let memory = MemoryCollection::new();
    let manager = ContributionManager::new(Rc::new(memory.clone()));

    let err = manager
        .update("missing", ContributionPatch::default())
        .await
        .unwrap_err();

    assert_eq!(err, ManagerError::NotFound("missing".into()));
    assert!(memory.calls().is_empty());
}

#[tokio::test]
async fn test_update_refused_while_create_in_flight() {
    let (remote, manager) = gated();
    let new = draft("a", 50.0);

    let (result, ()) = futures::join!(manager.add(new.clone()), async {
        let temporary = manager.contributions()[0].id.clone();
        let patch = ContributionPatch {
            amount_usd: Some(60.0),
            ..Default::default()
        };
        let err = manager.update(&temporary, patch).await.unwrap_err();
        assert_eq!(err, ManagerError::StillPending(temporary));
        assert_eq!(remote.waiting().len(), 1);

        remote.release(0, Ok(Some(server_row("srv-1", &new))));
    });

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_update_applies_then_confirms() {
    let (remote, manager) = gated();
    manager.replace_all(vec![confirmed("c1", "a", 100.0, Some("Seed"))]);
    let patch = ContributionPatch {
        amount_usd: Some(150.0),
        ..Default::default()
    };

    let (result, ()) = futures::join!(manager.update("c1", patch), async {
        let record = manager.get("c1").unwrap();
        assert_eq!(record.amount_usd, 150.0);
        match &record.state {
            RecordState::PendingUpdate { previous } => assert_eq!(previous.amount_usd, 100.0),
            other => panic!("unexpected state {other:?}"),
        }

        let waiting = remote.waiting();
        let Call::Update(id, sent) = &waiting[0] else {
            panic!("expected an update call");
        };
        assert_eq!(id, "c1");
        assert_eq!(sent.amount_usd, Some(150.0));
        assert!(sent.comment.is_none());
        assert!(sent.updated_at.is_some());

        let mut row = confirmed("c1", "a", 150.0, Some("Seed"));
        row.updated_at = sent.updated_at;
        remote.release(0, Ok(Some(row)));
    });

    assert_eq!(result.unwrap().amount_usd, 150.0);
    let record = manager.get("c1").unwrap();
    assert_eq!(record.state, RecordState::Confirmed);
    assert_eq!(record.amount_usd, 150.0);
}

#[tokio::test]
async fn test_failed_update_restores_exact_values() {
    let (remote, manager) = gated();
    manager.replace_all(vec![confirmed("c1", "a", 100.0, Some("Seed"))]);
    let original = manager.get("c1").unwrap();
    let patch = ContributionPatch {
        amount_usd: Some(150.0),
        comment: Some(None),
        ..Default::default()
    };

    let (result, ()) = futures::join!(manager.update("c1", patch), async {
        remote.release(0, Err(RemoteError::code("500")));
    });

    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("Failed to update contribution:"));
    assert!(err.to_string().ends_with("Reverting changes."));

    let record = manager.get("c1").unwrap();
    assert_eq!(record.fields(), original.fields());
    assert!(record.has_error());
    match &record.state {
        RecordState::Errored { attempted, .. } => assert_eq!(attempted.amount_usd, Some(150.0)),
        other => panic!("unexpected state {other:?}"),
    }
    // Errored records drop out of totals until acknowledged
    assert_eq!(stats::grand_total(&manager.contributions()), 0.0);

    assert_eq!(manager.clear_errors(), 1);
    assert_eq!(manager.get("c1").unwrap(), original);
    assert_eq!(manager.clear_errors(), 0);
}

// ========================================================================
// Delete
// ========================================================================

fn seeded_memory() -> MemoryCollection {
    MemoryCollection::seeded(
        vec![],
        vec![
            confirmed("c1", "a", 100.0, Some("First")),
            confirmed("c2", "a", 8690.54, None),
            confirmed("c3", "b", 300.0, Some("Third")),
        ],
    )
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let memory = seeded_memory();
    let manager = ContributionManager::new(Rc::new(memory.clone()));
    manager.replace_all(memory.stored_contributions());

    let request = manager.request_delete("c2").unwrap();
    assert_eq!(request.contribution_id, "c2");
    assert_eq!(request.prompt.title, "Delete Contribution?");
    assert_eq!(
        request.prompt.description,
        "Are you sure you want to delete the contribution: \"Amount: $8,690.54\"? This action cannot be undone."
    );
    assert_eq!(manager.len(), 3);
    assert!(memory.calls().is_empty());

    manager.confirm_delete(request.token).await.unwrap();

    assert_eq!(ids(&manager), vec!["c1", "c3"]);
    assert_eq!(memory.calls(), vec!["delete contributions c2"]);
    assert!(manager.pending_delete().is_none());
}

#[tokio::test]
async fn test_failed_delete_restores_position() {
    let memory = seeded_memory();
    let manager = ContributionManager::new(Rc::new(memory.clone()));
    manager.replace_all(memory.stored_contributions());
    let before = manager.contributions();
    memory.fail_next(RemoteError::code("403"));

    let request = manager.request_delete("c2").unwrap();
    let err = manager.confirm_delete(request.token).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Failed to delete contribution: Operation failed with error code: 403. Reverting deletion."
    );
    assert_eq!(manager.contributions(), before);
}

#[tokio::test]
async fn test_newer_request_replaces_older() {
    let memory = seeded_memory();
    let manager = ContributionManager::new(Rc::new(memory.clone()));
    manager.replace_all(memory.stored_contributions());

    let first = manager.request_delete("c1").unwrap();
    let second = manager.request_delete("c3").unwrap();
    assert_ne!(first.token, second.token);
    assert!(first.prompt.description.contains("\"First\""));

    assert_eq!(
        manager.confirm_delete(first.token).await.unwrap_err(),
        ManagerError::NoPendingDelete
    );
    assert_eq!(manager.pending_delete(), Some(second.clone()));
    assert!(!manager.cancel_delete(first.token));
    assert!(manager.cancel_delete(second.token));
    assert!(manager.pending_delete().is_none());
    assert_eq!(
        manager.confirm_delete(second.token).await.unwrap_err(),
        ManagerError::NoPendingDelete
    );

    assert_eq!(manager.len(), 3);
    assert!(memory.calls().is_empty());
}

#[tokio::test]
async fn test_request_delete_unknown_id() {
    let manager = ContributionManager::new(Rc::new(MemoryCollection::new()));
    assert_eq!(
        manager.request_delete("nope").unwrap_err(),
        ManagerError::NotFound("nope".into())
    );
}

#[tokio::test]
async fn test_delete_cannot_reenter_while_in_flight() {
    let (remote, manager) = gated();
    let rows = vec![confirmed("c1", "a", 1.0, None), confirmed("c2", "a", 2.0, None)];
    manager.replace_all(rows.clone());
    let request = manager.request_delete("c1").unwrap();

    let (result, ()) = futures::join!(manager.confirm_delete(request.token), async {
        assert_eq!(ids(&manager), vec!["c2"]);

        // A reload brings the record back while its delete is still running
        manager.replace_all(rows.clone());
        let again = manager.request_delete("c1").unwrap();
        let err = manager.confirm_delete(again.token).await.unwrap_err();
        assert_eq!(err, ManagerError::DeleteInFlight("c1".into()));
        assert_eq!(remote.waiting().len(), 1);

        remote.release(0, Ok(None));
    });

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_failed_delete_keeps_interleaved_add() {
    let (remote, manager) = gated();
    manager.replace_all(vec![
        confirmed("c1", "a", 1.0, None),
        confirmed("c2", "a", 2.0, None),
        confirmed("c3", "a", 3.0, None),
    ]);
    let request = manager.request_delete("c2").unwrap();
    let new = draft("b", 4.0);

    let (deleted, added, ()) = futures::join!(manager.confirm_delete(request.token), manager.add(new.clone()), async {
        assert_eq!(remote.waiting()[0], Call::Delete("c2".into()));
        remote.release(1, Ok(Some(server_row("srv-new", &new))));
        tokio::task::yield_now().await;
        remote.release(0, Err(RemoteError::code("500")));
    });

    assert!(deleted.is_err());
    assert!(added.is_ok());
    assert_eq!(ids(&manager), vec!["c1", "c2", "c3", "srv-new"]);
}

// ========================================================================
// Tracker & contributors
// ========================================================================

fn team() -> MemoryCollection {
    MemoryCollection::seeded(
        vec![Contributor::new("b", "Bob"), Contributor::new("a", "Alice")],
        vec![
            confirmed("c1", "a", 6000.0, Some("Seed round")),
            confirmed("c2", "b", 4000.0, None),
        ],
    )
}

#[tokio::test]
async fn test_tracker_load_and_summaries() {
    let tracker = Tracker::new(team());
    tracker.load().await.unwrap();

    let names: Vec<String> = tracker.contributors.contributors().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Alice", "Bob"]);
    assert_eq!(tracker.contributions.len(), 2);
    assert_eq!(tracker.grand_total(), 10_000.0);

    let summaries = tracker.summaries();
    let alice = summaries.iter().find(|s| s.contributor.id == "a").unwrap();
    let bob = summaries.iter().find(|s| s.contributor.id == "b").unwrap();
    assert_eq!(alice.stats.percentage_share, 60.0);
    assert_eq!(alice.stats.diff_to_target, 1000.0);
    assert_eq!(alice.stats.progress_to_target, 100.0);
    assert_eq!(bob.stats.percentage_share, 40.0);
    assert_eq!(bob.stats.diff_to_target, -1000.0);
    assert_eq!(bob.stats.progress_to_target, 80.0);
    assert_eq!(bob.stats.amount_to_match_top, 2000.0);
}

#[tokio::test]
async fn test_summaries_follow_other_contributor_changes() {
    let tracker = Tracker::new(team());
    tracker.load().await.unwrap();

    tracker.contributions.add(draft("b", 2000.0)).await.unwrap();

    let summaries = tracker.summaries();
    let alice = summaries.iter().find(|s| s.contributor.id == "a").unwrap();
    assert_eq!(alice.stats.total, 6000.0);
    assert_eq!(alice.stats.percentage_share, 50.0);
    assert_eq!(alice.stats.diff_to_target, 0.0);
    assert_eq!(alice.stats.amount_to_match_top, 0.0);
}

#[tokio::test]
async fn test_tracker_load_failure_clears_lists() {
    let memory = team();
    let tracker = Tracker::new(memory.clone());
    tracker.load().await.unwrap();

    memory.fail_next(RemoteError::message("JWT expired"));
    let err = tracker.load().await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Error fetching data: JWT expired. Check Supabase setup and console."
    );
    assert!(tracker.contributors.contributors().is_empty());
    assert!(tracker.contributions.is_empty());
}

#[tokio::test]
async fn test_contributor_add_keeps_name_order() {
    let memory = MemoryCollection::new();
    let directory = ContributorDirectory::new(Rc::new(memory.clone()));
    directory.replace_all(vec![Contributor::new("z", "Zoe")]);

    let added = directory.add(NewContributor::named("  Adam ")).await.unwrap();

    assert_eq!(added.name, "Adam");
    let names: Vec<String> = directory.contributors().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Adam", "Zoe"]);
    assert_eq!(directory.name_of(&added.id), "Adam");
    assert_eq!(directory.name_of("nobody"), UNKNOWN_CONTRIBUTOR);
}

#[tokio::test]
async fn test_contributor_add_failures() {
    let memory = MemoryCollection::new();
    let directory = ContributorDirectory::new(Rc::new(memory.clone()));

    let err = directory.add(NewContributor::named("   ")).await.unwrap_err();
    assert!(matches!(err, ManagerError::Invalid(_)));
    assert!(memory.calls().is_empty());

    memory.fail_next(RemoteError::message("duplicate key value"));
    let err = directory.add(NewContributor::named("Ann")).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to add contributor: duplicate key value");
    assert!(directory.contributors().is_empty());
}

#[tokio::test]
async fn test_contributor_update_resorts_by_name() {
    let memory = MemoryCollection::seeded(
        vec![Contributor::new("a", "Alice"), Contributor::new("z", "Zoe")],
        vec![],
    );
    let directory = ContributorDirectory::new(Rc::new(memory.clone()));
    directory.replace_all(memory.stored_contributors());

    let patch = ContributorPatch {
        name: Some(" Aaron ".into()),
        email: Some(Some("aaron@example.com".into())),
        ..Default::default()
    };
    let updated = directory.update("z", patch).await.unwrap();

    assert_eq!(updated.name, "Aaron");
    let names: Vec<String> = directory.contributors().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Aaron", "Alice"]);
    let stored = memory.stored_contributors();
    let zoe = stored.iter().find(|c| c.id == "z").unwrap();
    assert_eq!(zoe.email.as_deref(), Some("aaron@example.com"));
}

#[tokio::test]
async fn test_contributor_update_failures() {
    let memory = MemoryCollection::seeded(vec![Contributor::new("a", "Alice")], vec![]);
    let directory = ContributorDirectory::new(Rc::new(memory.clone()));
    directory.replace_all(memory.stored_contributors());
    let before = directory.contributors();
    let rename = |name: &str| ContributorPatch {
        name: Some(name.into()),
        ..Default::default()
    };

    let err = directory.update("nobody", rename("Bea")).await.unwrap_err();
    assert_eq!(err, ManagerError::NotFound("nobody".into()));
    assert!(memory.calls().is_empty());

    let err = directory.update("a", rename("  ")).await.unwrap_err();
    assert!(matches!(err, ManagerError::Invalid(_)));
    assert!(memory.calls().is_empty());

    memory.fail_next(RemoteError::message("permission denied"));
    let err = directory.update("a", rename("Alicia")).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to update contributor: permission denied");
    assert_eq!(directory.contributors(), before);
}
