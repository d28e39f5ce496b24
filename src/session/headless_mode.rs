//! Headless mode execution

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown, print_session_starting},
};
use crate::store::ViewState;
use crate::ui::dashboard::utils::format_count;
use chrono::{DateTime, Local};
use std::error::Error;

/// Runs the application in headless mode
///
/// Prints every displayable event and a one-line summary after each
/// successful commit, until Ctrl+C.
pub async fn run_headless_mode(mut session: SessionData) -> Result<(), Box<dyn Error>> {
    print_session_starting("headless", &session.environment);

    let mut state_receiver = session.refresher.store().subscribe();
    let mut last_printed: Option<DateTime<Local>> = None;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            Some(event) = session.event_receiver.recv() => {
                if event.should_display() {
                    println!("{}", event);
                }
            }
            Ok(()) = state_receiver.changed() => {
                let state = state_receiver.borrow_and_update().clone();
                if state.last_updated.is_some() && state.last_updated != last_printed {
                    last_printed = state.last_updated;
                    println!("{}", commit_summary(&state));
                }
            }
        }
    }

    print_session_shutdown();
    session.shutdown().await;
    print_session_exit_success();

    Ok(())
}

/// `"Ticks 1,234 | Extrinsics 56 | Block 4,500,123 | Total τ10,000 | Alpha τ500"`
fn commit_summary(state: &ViewState) -> String {
    let snapshot = &state.snapshot;
    let mut summary = format!(
        "Ticks {} | Extrinsics {}",
        format_count(snapshot.ticks_count),
        format_count(snapshot.extrinsics_count)
    );
    if let Some(latest) = snapshot.ticks.first() {
        summary.push_str(&format!(
            " | Block {} | Total {} | Alpha {}",
            format_count(latest.block_number),
            latest.balance.total,
            latest.balance.alpha
        ));
    }
    summary
}
