//! Session setup and initialization

use crate::api::ApiClient;
use crate::config::Config;
use crate::consts::dash_consts::EVENT_QUEUE_SIZE;
use crate::environment::Environment;
use crate::events::Event;
use crate::store::StateStore;
use crate::workers::Refresher;
use crate::workers::core::EventSender;
use crate::workers::scheduler::Scheduler;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Session data for both TUI and headless modes
pub struct SessionData {
    /// Event receiver for worker events
    pub event_receiver: mpsc::Receiver<Event>,
    /// Starts cycles and owns the view state
    pub refresher: Refresher,
    /// Periodic timer driving the refresher
    pub scheduler: Scheduler,
    /// Backend the session talks to
    pub environment: Environment,
}

impl SessionData {
    pub async fn shutdown(self) {
        stop_refresh(self.scheduler, &self.refresher).await;
    }
}

/// Stops the timer, then drops whatever cycles are still in flight.
pub async fn stop_refresh(scheduler: Scheduler, refresher: &Refresher) {
    scheduler.join().await;
    refresher.shutdown();
}

/// Sets up a refresh session
///
/// This function handles all the common setup required for both TUI and headless modes:
/// 1. Creates the HTTP client for the configured backend
/// 2. Creates the view state store and event channel
/// 3. Starts the periodic refresh, whose first cycle begins immediately
///
/// # Arguments
/// * `config` - Resolved and validated configuration
pub async fn setup_session(config: Config) -> Result<SessionData, Box<dyn Error>> {
    let environment = config.environment()?;
    let client = ApiClient::new(&environment.api_url(), config.status_policy)?;

    let (event_sender, event_receiver) = mpsc::channel::<Event>(EVENT_QUEUE_SIZE);
    let refresher = Refresher::new(
        Arc::new(client),
        StateStore::new(),
        EventSender::new(event_sender),
        config.refresh_config(),
    );
    let scheduler = refresher.start();

    Ok(SessionData {
        event_receiver,
        refresher,
        scheduler,
        environment,
    })
}
