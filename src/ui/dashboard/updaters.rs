//! Dashboard state update logic
//!
//! Contains all methods for updating dashboard state from events

use super::state::DashboardState;

use crate::events::{Event as WorkerEvent, EventType, Worker};

impl DashboardState {
    /// Advance the animation tick and fold in queued events.
    pub fn update(&mut self) {
        self.tick += 1;

        // Process all queued events one by one
        while let Some(event) = self.pending_events.pop_front() {
            self.process_event(&event);
            self.add_to_activity_log(event);
        }
    }

    /// Process a single event and update relevant state
    fn process_event(&mut self, event: &WorkerEvent) {
        let Some(cycle) = event.cycle else {
            return;
        };
        match (event.worker, event.event_type) {
            (Worker::Fetcher, EventType::Refresh) => {
                self.in_flight.insert(cycle);
            }
            (Worker::Fetcher, EventType::Success) => {
                self.in_flight.remove(&cycle);
                self.stats.succeeded += 1;
                self.stats.last_error = None;
            }
            (Worker::Fetcher, EventType::Error) => {
                self.in_flight.remove(&cycle);
                self.stats.failed += 1;
                self.stats.last_error = Some(event.msg.clone());
            }
            (Worker::Store, EventType::Waiting) => {
                self.in_flight.remove(&cycle);
                self.stats.discarded += 1;
            }
            _ => {}
        }
    }

    /// Whether any cycle is currently waiting on the backend.
    pub fn is_refreshing(&self) -> bool {
        !self.in_flight.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::environment::Environment;
    use crate::events::{Event, EventType};
    use crate::logging::LogLevel;
    use crate::store::ViewState;
    use crate::ui::app::UIConfig;
    use crate::ui::dashboard::DashboardState;
    use crate::workers::core::RefreshConfig;
    use std::time::Instant;

    fn state() -> DashboardState {
        DashboardState::new(
            Environment::Local,
            Instant::now(),
            ViewState::default(),
            &UIConfig::new(false, RefreshConfig::default()),
        )
    }

    fn fetch(cycle: u64, event_type: EventType) -> Event {
        Event::fetcher_with_level("msg".to_string(), event_type, LogLevel::Info).for_cycle(cycle)
    }

    #[test]
    fn test_tracks_in_flight_cycles() {
        let mut state = state();
        state.add_event(fetch(1, EventType::Refresh));
        state.add_event(fetch(2, EventType::Refresh));
        state.update();
        assert!(state.is_refreshing());
        assert_eq!(state.in_flight.len(), 2);

        state.add_event(fetch(1, EventType::Success));
        state.add_event(
            Event::store_with_level("stale".to_string(), EventType::Waiting, LogLevel::Debug)
                .for_cycle(2),
        );
        state.update();
        assert!(!state.is_refreshing());
        assert_eq!(state.stats.succeeded, 1);
        assert_eq!(state.stats.discarded, 1);
        assert_eq!(state.activity_logs.len(), 4);
    }

    #[test]
    fn test_failure_then_success_clears_last_error() {
        let mut state = state();
        state.add_event(fetch(1, EventType::Error));
        state.update();
        assert_eq!(state.stats.failed, 1);
        assert_eq!(state.stats.last_error.as_deref(), Some("msg"));

        state.add_event(fetch(2, EventType::Success));
        state.update();
        assert!(state.stats.last_error.is_none());
    }

    #[test]
    fn test_activity_log_is_bounded() {
        let mut state = state();
        for cycle in 0..150 {
            state.add_event(fetch(cycle, EventType::Refresh));
        }
        state.update();
        assert_eq!(state.activity_logs.len(), 100);
        assert_eq!(state.activity_logs.front().unwrap().cycle, Some(50));
    }
}
