//! Dashboard state management
//!
//! Contains the main dashboard state struct

use crate::consts::dash_consts::MAX_ACTIVITY_LOGS;
use crate::environment::Environment;
use crate::events::Event as WorkerEvent;
use crate::store::ViewState;
use crate::transform::DashboardView;
use crate::ui::app::UIConfig;
use crate::workers::core::RefreshConfig;

use std::collections::{BTreeSet, VecDeque};
use std::time::Instant;

/// Outcome counters for refresh cycles seen by this dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshStats {
    pub succeeded: u64,
    pub failed: u64,
    /// Cycles that finished after a newer one was already applied.
    pub discarded: u64,
    /// Message of the most recent failure, cleared by the next success.
    pub last_error: Option<String>,
}

#[derive(Debug)]
pub struct DashboardState {
    /// The backend the dashboard reads from.
    pub environment: Environment,
    /// When the refresh schedule started; scheduled cycles fall on whole
    /// intervals after this instant.
    pub start_time: Instant,
    pub refresh: RefreshConfig,
    /// Queue of events waiting to be processed
    pub pending_events: VecDeque<WorkerEvent>,
    /// Activity logs for display (last 100 events)
    pub activity_logs: VecDeque<WorkerEvent>,
    /// Whether to enable background colors
    pub with_background_color: bool,
    /// Animation tick counter
    pub tick: usize,
    pub stats: RefreshStats,
    /// Cycles started but not yet finished.
    pub in_flight: BTreeSet<u64>,

    view_state: ViewState,
}

impl DashboardState {
    pub fn new(
        environment: Environment,
        start_time: Instant,
        view_state: ViewState,
        ui_config: &UIConfig,
    ) -> Self {
        Self {
            environment,
            start_time,
            refresh: ui_config.refresh,
            pending_events: VecDeque::new(),
            activity_logs: VecDeque::new(),
            with_background_color: ui_config.with_background_color,
            tick: 0,
            stats: RefreshStats::default(),
            in_flight: BTreeSet::new(),
            view_state,
        }
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    /// Chart and counter data, derived from the current snapshot on each call.
    pub fn view(&self) -> DashboardView {
        DashboardView::from_snapshot(&self.view_state.snapshot)
    }

    pub fn is_loading(&self) -> bool {
        self.view_state.loading
    }

    /// Swaps in a newly published view state.
    pub fn set_view_state(&mut self, view_state: ViewState) {
        self.view_state = view_state;
    }

    /// Add an event to activity logs with size limit
    pub fn add_to_activity_log(&mut self, event: WorkerEvent) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }

    /// Add an event to the processing queue
    pub fn add_event(&mut self, event: WorkerEvent) {
        self.pending_events.push_back(event);
    }
}
