//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::consts::dash_consts::view::SPLASH_SECS;
use crate::environment::Environment;
use crate::events::Event as WorkerEvent;
use crate::store::ViewState;
use crate::ui::dashboard::{DashboardState, render_dashboard};
use crate::ui::splash::render_splash;
use crate::workers::Refresher;
use crate::workers::core::RefreshConfig;
use crossterm::event::{self, Event, KeyCode};
use ratatui::{Frame, Terminal, backend::Backend};
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};

/// UI configuration data grouped by concern
#[derive(Debug, Clone, Copy)]
pub struct UIConfig {
    pub with_background_color: bool,
    pub refresh: RefreshConfig,
}

impl UIConfig {
    pub fn new(with_background_color: bool, refresh: RefreshConfig) -> Self {
        Self {
            with_background_color,
            refresh,
        }
    }
}

/// The different screens in the application.
#[derive(Debug)]
pub enum Screen {
    /// Splash screen shown at the start of the application.
    Splash,
    /// Dashboard screen displaying the latest snapshot.
    Dashboard(Box<DashboardState>),
}

/// Application state
pub struct App {
    /// When the refresh schedule started, used for the countdown and uptime.
    start_time: Instant,

    /// The backend the dashboard reads from.
    environment: Environment,

    /// The current screen being displayed in the application.
    current_screen: Screen,

    /// Starts extra cycles on demand.
    refresher: Refresher,

    /// Published view state.
    state_receiver: watch::Receiver<ViewState>,

    /// Receives events from the refresh workers.
    event_receiver: mpsc::Receiver<WorkerEvent>,

    ui_config: UIConfig,
}

impl App {
    /// Creates a new instance of the application.
    pub fn new(
        environment: Environment,
        refresher: Refresher,
        event_receiver: mpsc::Receiver<WorkerEvent>,
        ui_config: UIConfig,
    ) -> Self {
        let state_receiver = refresher.store().subscribe();
        Self {
            start_time: Instant::now(),
            environment,
            current_screen: Screen::Splash,
            refresher,
            state_receiver,
            event_receiver,
            ui_config,
        }
    }

    fn show_dashboard(&mut self) {
        let view_state = self.state_receiver.borrow_and_update().clone();
        let state = DashboardState::new(
            self.environment.clone(),
            self.start_time,
            view_state,
            &self.ui_config,
        );
        self.current_screen = Screen::Dashboard(Box::new(state));
    }

    /// Pulls queued worker events and the latest view state into the dashboard.
    fn sync_dashboard(&mut self) {
        let Screen::Dashboard(state) = &mut self.current_screen else {
            return;
        };
        while let Ok(event) = self.event_receiver.try_recv() {
            state.add_event(event);
        }
        if self.state_receiver.has_changed().unwrap_or(false) {
            state.set_view_state(self.state_receiver.borrow_and_update().clone());
        }
        state.update();
    }
}

/// Runs the application UI in a loop, handling events and rendering the appropriate screen.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    let splash_start = Instant::now();
    let splash_duration = Duration::from_secs(SPLASH_SECS);

    // UI event loop
    loop {
        // Events stay queued in the channel while the splash is up.
        app.sync_dashboard();
        terminal.draw(|f| render(f, &app.current_screen))?;

        // Handle splash-to-dashboard transition
        if matches!(app.current_screen, Screen::Splash) && splash_start.elapsed() >= splash_duration
        {
            app.show_dashboard();
            continue;
        }

        // Poll for key events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Skip events that are not KeyEventKind::Press
                if key.kind == event::KeyEventKind::Release {
                    continue;
                }

                // Handle exit events
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                    return Ok(());
                }

                if matches!(app.current_screen, Screen::Splash) {
                    // Any key press will skip the splash screen
                    app.show_dashboard();
                } else if matches!(key.code, KeyCode::Char('r') | KeyCode::Char('R')) {
                    app.refresher.trigger();
                }
            }
        }

        // Let spawned cycles progress between frames.
        tokio::task::yield_now().await;
    }
}

/// Renders the current screen based on the application state.
fn render(f: &mut Frame, screen: &Screen) {
    match screen {
        Screen::Splash => render_splash(f),
        Screen::Dashboard(state) => render_dashboard(f, state),
    }
}
