//! Event System
//!
//! Activity events emitted by the refresh workers. They double as the
//! diagnostic sink: failed cycles are reported here and nowhere else.

use crate::logging::{LogLevel, should_log, threshold_from_env};
use chrono::Local;
use std::fmt::Display;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Worker {
    /// The repeating timer that starts refresh cycles.
    Scheduler,
    /// A refresh cycle performing the four backend requests.
    Fetcher,
    /// The view state holder applying cycle results.
    Store,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
    Refresh,
    Waiting,
    StateChange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub worker: Worker,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
    /// Sequence number of the refresh cycle this event belongs to.
    pub cycle: Option<u64>,
}

impl Event {
    fn new(worker: Worker, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            worker,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
            cycle: None,
        }
    }

    pub fn scheduler_with_level(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Worker::Scheduler, msg, event_type, log_level)
    }

    pub fn fetcher_with_level(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Worker::Fetcher, msg, event_type, log_level)
    }

    pub fn store_with_level(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Worker::Store, msg, event_type, log_level)
    }

    pub fn for_cycle(mut self, cycle: u64) -> Self {
        self.cycle = Some(cycle);
        self
    }

    pub fn should_display(&self) -> bool {
        if self.event_type == EventType::StateChange {
            return false;
        }
        if self.event_type == EventType::Success {
            return true;
        }
        should_log(self.log_level, threshold_from_env())
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.cycle {
            Some(cycle) => write!(
                f,
                "{} [{}] #{} {}",
                self.event_type, self.timestamp, cycle, self.msg
            ),
            None => write!(f, "{} [{}] {}", self.event_type, self.timestamp, self.msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_cycle_number() {
        let event = Event::fetcher_with_level(
            "Refreshed".to_string(),
            EventType::Success,
            LogLevel::Info,
        )
        .for_cycle(7);
        let rendered = event.to_string();
        assert!(rendered.starts_with("Success ["));
        assert!(rendered.ends_with("#7 Refreshed"));
    }

    #[test]
    fn test_state_change_events_are_hidden() {
        let event = Event::store_with_level(
            "loading finished".to_string(),
            EventType::StateChange,
            LogLevel::Error,
        );
        assert!(!event.should_display());
    }

    #[test]
    fn test_success_events_always_display() {
        let event = Event::fetcher_with_level(
            "ok".to_string(),
            EventType::Success,
            LogLevel::Trace,
        );
        assert!(event.should_display());
    }
}
