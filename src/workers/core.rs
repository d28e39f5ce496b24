//! Core worker utilities

use crate::events::{Event, EventType};
use crate::logging::LogLevel;
use std::time::Duration;
use tokio::sync::mpsc;

/// Common event sending utilities for workers
///
/// Every event is mirrored to the `log` facade before it is queued for
/// the UI, so diagnostics survive even when nobody drains the channel.
#[derive(Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Send a generic event
    pub async fn send_event(&self, event: Event) {
        log::log!(log::Level::from(event.log_level), "{}", event);
        let _ = self.sender.send(event).await;
    }

    /// Non-blocking send for synchronous callers; drops the event when the
    /// queue is full.
    pub fn try_send_event(&self, event: Event) {
        log::log!(log::Level::from(event.log_level), "{}", event);
        let _ = self.sender.try_send(event);
    }

    pub async fn send_fetch_event(
        &self,
        cycle: u64,
        message: String,
        event_type: EventType,
        log_level: LogLevel,
    ) {
        self.send_event(Event::fetcher_with_level(message, event_type, log_level).for_cycle(cycle))
            .await;
    }

    pub async fn send_store_event(
        &self,
        cycle: u64,
        message: String,
        event_type: EventType,
        log_level: LogLevel,
    ) {
        self.send_event(Event::store_with_level(message, event_type, log_level).for_cycle(cycle))
            .await;
    }

    pub fn send_scheduler_event(&self, message: String, event_type: EventType, log_level: LogLevel) {
        self.try_send_event(Event::scheduler_with_level(message, event_type, log_level));
    }
}

/// Refresh configuration shared by the scheduler and every cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshConfig {
    pub interval: Duration,
    pub fetch_limit: u32,
}

impl RefreshConfig {
    pub fn new(interval: Duration, fetch_limit: u32) -> Self {
        Self {
            interval,
            fetch_limit,
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        use crate::consts::dash_consts::refresh;
        Self::new(refresh::interval(), refresh::FETCH_LIMIT)
    }
}
