//! Repeating refresh timer

use std::cell::Cell;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

thread_local! {
    /// Address of the gate whose callback is running on this thread, or 0.
    static FIRING: Cell<usize> = const { Cell::new(0) };
}

/// Serializes callback invocations against `stop`.
struct Gate {
    active: AtomicBool,
    running: Mutex<()>,
}

impl Gate {
    fn id(self: &Arc<Self>) -> usize {
        Arc::as_ptr(self) as usize
    }
}

/// Invokes a callback immediately and then once per interval until stopped.
///
/// Ticks are scheduled relative to the previous scheduled tick, not to the
/// end of the callback, so a slow callback does not shift the cadence.
pub struct Scheduler {
    gate: Arc<Gate>,
    shutdown: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Scheduler {
    /// Starts the timer on the current tokio runtime.
    pub fn start<F>(period: Duration, on_tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let gate = Arc::new(Gate {
            active: AtomicBool::new(true),
            running: Mutex::new(()),
        });
        let shutdown = CancellationToken::new();

        let handle = tokio::spawn(run_timer(period, gate.clone(), shutdown.clone(), on_tick));

        Self {
            gate,
            shutdown,
            handle: Some(handle),
        }
    }

    /// Stops the timer. Safe to call more than once, including from inside
    /// the callback.
    ///
    /// Once this returns the callback is never invoked again. When called
    /// from another thread, an invocation that is already running finishes
    /// first, so a slow callback delays the caller.
    pub fn stop(&self) {
        self.gate.active.store(false, Ordering::SeqCst);
        self.shutdown.cancel();
        if FIRING.with(Cell::get) != self.gate.id() {
            drop(self.gate.running.lock().unwrap_or_else(PoisonError::into_inner));
        }
    }

    pub fn is_running(&self) -> bool {
        self.gate.active.load(Ordering::SeqCst)
    }

    /// Stops the timer and waits for its task to exit.
    pub async fn join(mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_timer<F>(
    period: Duration,
    gate: Arc<Gate>,
    shutdown: CancellationToken,
    mut on_tick: F,
) where
    F: FnMut() + Send + 'static,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                if !fire(&gate, &mut on_tick) {
                    break;
                }
            }
        }
    }
}

/// Runs one tick while holding the gate. Returns false once stopped.
fn fire<F: FnMut()>(gate: &Arc<Gate>, on_tick: &mut F) -> bool {
    let _running = gate.running.lock().unwrap_or_else(PoisonError::into_inner);
    if !gate.active.load(Ordering::SeqCst) {
        return false;
    }
    FIRING.with(|firing| firing.set(gate.id()));
    // A panicking callback must not take the timer down with it.
    let result = catch_unwind(AssertUnwindSafe(|| on_tick()));
    FIRING.with(|firing| firing.set(0));
    if result.is_err() {
        log::error!("refresh callback panicked; timer keeps running");
    }
    gate.active.load(Ordering::SeqCst)
}
