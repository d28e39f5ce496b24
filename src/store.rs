//! View state holder.
//!
//! The committed [`Snapshot`] lives behind a `watch` channel: every commit
//! swaps in a whole new [`ViewState`], so readers and subscribers never see
//! a partially applied cycle.
//!
//! Commits are checked against the close flag under the channel's write
//! lock, so nothing is applied once [`StateStore::close`] has returned.

use crate::models::Snapshot;
use chrono::{DateTime, Local};
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct ViewState {
    pub snapshot: Arc<Snapshot>,
    /// True until the first cycle completes, successfully or not.
    pub loading: bool,
    /// Highest cycle number applied so far (commit or failure).
    pub last_cycle: u64,
    /// Wall-clock time of the last successful commit.
    pub last_updated: Option<DateTime<Local>>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            snapshot: Arc::new(Snapshot::default()),
            loading: true,
            last_cycle: 0,
            last_updated: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Applied,
    /// A newer cycle was already applied; the result was dropped.
    Stale,
    /// The store was closed; the result was dropped.
    Closed,
}

#[derive(Debug, Clone)]
pub struct StateStore {
    sender: Arc<watch::Sender<ViewState>>,
    closed: CancellationToken,
}

impl StateStore {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(ViewState::default());
        Self {
            sender: Arc::new(sender),
            closed: CancellationToken::new(),
        }
    }

    /// Stops accepting results. Waits for a commit already holding the
    /// lock to finish.
    pub fn close(&self) {
        self.sender.send_if_modified(|_| {
            self.closed.cancel();
            false
        });
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Applies `update` if the store is open and `cycle` is newer than
    /// anything applied so far.
    fn apply(&self, cycle: u64, update: impl FnOnce(&mut ViewState)) -> CommitOutcome {
        let mut outcome = CommitOutcome::Stale;
        self.sender.send_if_modified(|state| {
            if self.closed.is_cancelled() {
                outcome = CommitOutcome::Closed;
                return false;
            }
            if cycle <= state.last_cycle {
                return false;
            }
            update(state);
            state.loading = false;
            state.last_cycle = cycle;
            outcome = CommitOutcome::Applied;
            true
        });
        if outcome != CommitOutcome::Applied {
            log::debug!("dropped result of cycle {cycle}: {outcome:?}");
        }
        outcome
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.sender.subscribe()
    }

    /// Current state; the snapshot is shared, not copied.
    pub fn read(&self) -> ViewState {
        self.sender.borrow().clone()
    }

    /// Replaces the snapshot wholesale with the result of `cycle`.
    pub fn commit(&self, cycle: u64, snapshot: Snapshot) -> CommitOutcome {
        let snapshot = Arc::new(snapshot);
        self.apply(cycle, |state| {
            state.snapshot = snapshot;
            state.last_updated = Some(Local::now());
        })
    }

    /// Records a failed cycle. The previous snapshot stays in place; only
    /// `loading` and the cycle watermark move.
    pub fn mark_failed(&self, cycle: u64) -> CommitOutcome {
        self.apply(cycle, |_| {})
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::fixtures::{extrinsic, tick};

    fn snapshot(ticks_count: u64) -> Snapshot {
        Snapshot {
            ticks: vec![tick(2, "τ2", "τ2", "τ0"), tick(1, "τ1", "τ1", "τ0")],
            extrinsics: vec![extrinsic(2, Some("add_stake"))],
            ticks_count,
            extrinsics_count: 99,
        }
    }

    #[test]
    fn test_starts_empty_and_loading() {
        let state = StateStore::new().read();
        assert!(state.loading);
        assert!(state.snapshot.is_empty());
        assert_eq!(state.last_cycle, 0);
        assert!(state.last_updated.is_none());
    }

    #[test]
    fn test_commit_replaces_whole_snapshot() {
        let store = StateStore::new();
        assert_eq!(store.commit(1, snapshot(1000)), CommitOutcome::Applied);

        let next = Snapshot {
            ticks: vec![],
            extrinsics: vec![extrinsic(9, None), extrinsic(8, None)],
            ticks_count: 5,
            extrinsics_count: 6,
        };
        store.commit(2, next.clone());

        let state = store.read();
        assert!(!state.loading);
        assert_eq!(*state.snapshot, next);
        assert!(state.last_updated.is_some());
    }

    #[test]
    fn test_failure_keeps_previous_snapshot() {
        let store = StateStore::new();
        store.commit(1, snapshot(1000));
        let before = store.read().snapshot;

        assert_eq!(store.mark_failed(2), CommitOutcome::Applied);

        let after = store.read();
        assert_eq!(*after.snapshot, *before);
        assert!(!after.loading);
        assert_eq!(after.last_cycle, 2);
    }

    #[test]
    fn test_first_failure_ends_loading() {
        let store = StateStore::new();
        store.mark_failed(1);

        let state = store.read();
        assert!(!state.loading);
        assert!(state.snapshot.is_empty());
        assert!(state.last_updated.is_none());
    }

    #[test]
    fn test_stale_commit_is_dropped() {
        let store = StateStore::new();
        store.commit(3, snapshot(3));

        assert_eq!(store.commit(2, snapshot(2)), CommitOutcome::Stale);
        assert_eq!(store.mark_failed(1), CommitOutcome::Stale);

        let state = store.read();
        assert_eq!(state.snapshot.ticks_count, 3);
        assert_eq!(state.last_cycle, 3);
    }

    #[test]
    fn test_closed_store_drops_results() {
        let store = StateStore::new();
        store.commit(1, snapshot(1));
        store.close();
        assert!(store.is_closed());

        assert_eq!(store.commit(2, snapshot(2)), CommitOutcome::Closed);
        assert_eq!(store.mark_failed(3), CommitOutcome::Closed);

        let state = store.read();
        assert_eq!(state.snapshot.ticks_count, 1);
        assert_eq!(state.last_cycle, 1);
    }

    #[tokio::test]
    async fn test_close_does_not_wake_subscribers() {
        let store = StateStore::new();
        let receiver = store.subscribe();
        store.close();
        assert!(!receiver.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_subscribers_see_each_commit_whole() {
        let store = StateStore::new();
        let mut receiver = store.subscribe();

        store.commit(1, snapshot(10));
        receiver.changed().await.unwrap();
        {
            let state = receiver.borrow_and_update();
            assert_eq!(state.snapshot.ticks_count, 10);
            assert_eq!(state.snapshot.extrinsics_count, 99);
            assert_eq!(state.snapshot.ticks.len(), 2);
        }

        // A stale result does not wake subscribers.
        store.commit(1, snapshot(11));
        assert!(!receiver.has_changed().unwrap());
    }
}
