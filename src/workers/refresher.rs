//! Refresh cycles: fetch, then commit into the store.
//!
//! Each cycle gets a sequence number when it starts. Cycles may overlap
//! when the backend is slower than the refresh interval; the store keeps
//! only the newest one. Once the refresher is shut down, finished cycles
//! are dropped instead of committed.

use super::core::{EventSender, RefreshConfig};
use super::fetcher::fetch_cycle;
use super::scheduler::Scheduler;
use crate::api::LedgerApi;
use crate::events::EventType;
use crate::logging::LogLevel;
use crate::store::{CommitOutcome, StateStore};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct Refresher {
    api: Arc<dyn LedgerApi>,
    store: StateStore,
    events: EventSender,
    config: RefreshConfig,
    next_cycle: Arc<AtomicU64>,
    shutdown: CancellationToken,
}

impl Refresher {
    pub fn new(
        api: Arc<dyn LedgerApi>,
        store: StateStore,
        events: EventSender,
        config: RefreshConfig,
    ) -> Self {
        Self {
            api,
            store,
            events,
            config,
            next_cycle: Arc::new(AtomicU64::new(0)),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn config(&self) -> RefreshConfig {
        self.config
    }

    /// Starts the periodic timer; the first cycle begins immediately.
    pub fn start(&self) -> Scheduler {
        let refresher = self.clone();
        self.events.send_scheduler_event(
            format!(
                "Refreshing every {}s, {} records per list",
                self.config.interval.as_secs(),
                self.config.fetch_limit
            ),
            EventType::StateChange,
            LogLevel::Info,
        );
        Scheduler::start(self.config.interval, move || {
            refresher.trigger();
        })
    }

    /// Spawns one cycle without waiting for it.
    pub fn trigger(&self) -> Option<JoinHandle<()>> {
        if self.shutdown.is_cancelled() {
            return None;
        }
        let cycle = self.next_cycle.fetch_add(1, Ordering::SeqCst) + 1;
        let refresher = self.clone();
        Some(tokio::spawn(async move { refresher.run_cycle(cycle).await }))
    }

    /// Drops the results of any cycle still in flight.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
        self.store.close();
    }

    pub async fn run_cycle(&self, cycle: u64) {
        self.events
            .send_fetch_event(
                cycle,
                format!("Refreshing from backend (limit {})", self.config.fetch_limit),
                EventType::Refresh,
                LogLevel::Debug,
            )
            .await;

        let result = fetch_cycle(self.api.as_ref(), self.config.fetch_limit).await;

        let (outcome, event_type, msg, level) = match result {
            Ok(snapshot) => {
                let summary = format!(
                    "Refreshed: {} ticks, {} extrinsics (totals {} / {})",
                    snapshot.ticks.len(),
                    snapshot.extrinsics.len(),
                    snapshot.ticks_count,
                    snapshot.extrinsics_count
                );
                (
                    self.store.commit(cycle, snapshot),
                    EventType::Success,
                    summary,
                    LogLevel::Info,
                )
            }
            Err(e) => (
                self.store.mark_failed(cycle),
                EventType::Error,
                format!("Refresh failed: {}", e),
                e.log_level(),
            ),
        };

        match outcome {
            CommitOutcome::Applied => {
                self.events
                    .send_fetch_event(cycle, msg, event_type, level)
                    .await;
            }
            CommitOutcome::Stale => {
                self.events
                    .send_store_event(
                        cycle,
                        "Discarded result from an older refresh".to_string(),
                        EventType::Waiting,
                        LogLevel::Debug,
                    )
                    .await;
            }
            CommitOutcome::Closed => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockLedgerApi;
    use crate::api::error::ApiError;
    use crate::events::Event;
    use crate::transform::fixtures::{extrinsic, tick};
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn mock_with_counts(ticks_count: u64) -> MockLedgerApi {
        let mut mock = MockLedgerApi::new();
        mock.expect_ticks_count().returning(move || Ok(ticks_count));
        mock.expect_extrinsics_count().returning(|| Ok(2));
        mock.expect_ticks()
            .returning(|_| Ok(vec![tick(1, "τ10,000", "τ9,000", "τ500")]));
        mock.expect_extrinsics()
            .returning(|_| Ok(vec![extrinsic(1, Some("add_stake")), extrinsic(0, None)]));
        mock
    }

    fn failing_mock() -> MockLedgerApi {
        let mut mock = MockLedgerApi::new();
        mock.expect_ticks_count().returning(|| {
            Err(ApiError::Http {
                status: 502,
                message: "bad gateway".to_string(),
            })
        });
        mock.expect_extrinsics_count().returning(|| Ok(2));
        mock.expect_ticks().returning(|_| Ok(vec![]));
        mock.expect_extrinsics().returning(|_| Ok(vec![]));
        mock
    }

    fn refresher(mock: MockLedgerApi) -> (Refresher, mpsc::Receiver<Event>) {
        let (sender, receiver) = mpsc::channel(100);
        let refresher = Refresher::new(
            Arc::new(mock),
            StateStore::new(),
            EventSender::new(sender),
            RefreshConfig::new(Duration::from_secs(30), 50),
        );
        (refresher, receiver)
    }

    fn drain(receiver: &mut mpsc::Receiver<Event>) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = receiver.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_successful_cycle_commits_snapshot() {
        let (refresher, mut events) = refresher(mock_with_counts(500));
        refresher.run_cycle(1).await;

        let state = refresher.store().read();
        assert!(!state.loading);
        assert_eq!(state.snapshot.ticks_count, 500);
        assert_eq!(state.snapshot.extrinsics_count, 2);
        assert_eq!(state.snapshot.ticks.len(), 1);
        assert_eq!(state.snapshot.extrinsics.len(), 2);

        let events = drain(&mut events);
        let last = events.last().unwrap();
        assert_eq!(last.event_type, EventType::Success);
        assert_eq!(last.cycle, Some(1));
    }

    #[tokio::test]
    async fn test_failed_cycle_is_reported_and_swallowed() {
        let (refresher, mut events) = refresher(failing_mock());
        refresher.run_cycle(1).await;

        let state = refresher.store().read();
        assert!(!state.loading);
        assert!(state.snapshot.is_empty());

        let events = drain(&mut events);
        let last = events.last().unwrap();
        assert_eq!(last.event_type, EventType::Error);
        assert_eq!(last.log_level, LogLevel::Warn);
        assert!(last.msg.contains("/ticks/count"));
    }

    #[tokio::test]
    async fn test_failure_after_success_keeps_last_good_snapshot() {
        let store = StateStore::new();
        let (sender, _receiver) = mpsc::channel(100);
        let events = EventSender::new(sender);
        let config = RefreshConfig::new(Duration::from_secs(30), 50);

        Refresher::new(
            Arc::new(mock_with_counts(7)),
            store.clone(),
            events.clone(),
            config,
        )
        .run_cycle(1)
        .await;
        let before = store.read().snapshot;

        Refresher::new(Arc::new(failing_mock()), store.clone(), events, config)
            .run_cycle(2)
            .await;

        let after = store.read();
        assert_eq!(*after.snapshot, *before);
        assert_eq!(after.last_cycle, 2);
    }

    #[tokio::test]
    async fn test_late_cycle_does_not_overwrite_newer_one() {
        let store = StateStore::new();
        let (sender, _receiver) = mpsc::channel(100);
        let events = EventSender::new(sender);
        let config = RefreshConfig::new(Duration::from_secs(30), 50);

        // Cycle 2 lands first; cycle 1 was slower.
        Refresher::new(Arc::new(mock_with_counts(200)), store.clone(), events.clone(), config)
            .run_cycle(2)
            .await;
        Refresher::new(Arc::new(mock_with_counts(100)), store.clone(), events, config)
            .run_cycle(1)
            .await;

        assert_eq!(store.read().snapshot.ticks_count, 200);
    }

    #[tokio::test]
    async fn test_late_failure_is_discarded_not_reported() {
        let store = StateStore::new();
        let (sender, mut receiver) = mpsc::channel(100);
        let events = EventSender::new(sender);
        let config = RefreshConfig::new(Duration::from_secs(30), 50);

        Refresher::new(Arc::new(mock_with_counts(200)), store.clone(), events.clone(), config)
            .run_cycle(2)
            .await;
        Refresher::new(Arc::new(failing_mock()), store.clone(), events, config)
            .run_cycle(1)
            .await;

        let state = store.read();
        assert_eq!(state.last_cycle, 2);
        assert_eq!(state.snapshot.ticks_count, 200);

        let events = drain(&mut receiver);
        assert!(events.iter().all(|e| e.event_type != EventType::Error));
        let last = events.last().unwrap();
        assert_eq!(last.event_type, EventType::Waiting);
        assert_eq!(last.cycle, Some(1));
    }

    #[tokio::test]
    async fn test_shutdown_closes_store() {
        let (refresher, mut events) = refresher(failing_mock());
        refresher.shutdown();
        assert!(refresher.store().is_closed());

        refresher.run_cycle(1).await;
        let events = drain(&mut events);
        assert!(events.iter().all(|e| e.event_type == EventType::Refresh));
    }

    #[tokio::test]
    async fn test_shutdown_drops_pending_commit() {
        let (refresher, _events) = refresher(mock_with_counts(500));
        refresher.shutdown();

        refresher.run_cycle(1).await;
        assert!(refresher.store().read().loading);
        assert!(refresher.trigger().is_none());
    }

    #[tokio::test]
    async fn test_trigger_numbers_cycles() {
        let (refresher, _events) = refresher(mock_with_counts(500));

        refresher.trigger().unwrap().await.unwrap();
        refresher.trigger().unwrap().await.unwrap();

        assert_eq!(refresher.store().read().last_cycle, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_drives_cycles() {
        let (refresher, _events) = refresher(mock_with_counts(500));
        let scheduler = refresher.start();

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(refresher.store().read().last_cycle, 1);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(refresher.store().read().last_cycle, 2);

        scheduler.stop();
        refresher.shutdown();
    }
}
