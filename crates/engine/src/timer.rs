//! Elapsed-time tracking with a cancellable 1 Hz tick.
//!
//! The tick only reads the clock and pushes an integer outward; it never sees
//! the puzzle or the controllers. Time comes from `tokio::time`, so tests can
//! run on a paused clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use crate::types::TIMER_TICK_MS;

/// Called with the elapsed whole seconds on every tick.
pub type TickCallback = Box<dyn FnMut(u64) + Send + 'static>;

/// A running periodic task.
struct Ticker {
    task: JoinHandle<()>,
    /// `true` once stopped. The task checks it while holding the lock and keeps
    /// holding it through the callback, so no tick can start after `stop()`.
    cancelled: Arc<Mutex<bool>>,
}

pub struct TimerController {
    handle: Handle,
    period: Duration,
    started_at: Option<Instant>,
    /// Last published value; frozen at the final reading after `stop()`.
    elapsed: Arc<AtomicU64>,
    ticker: Option<Ticker>,
}

impl TimerController {
    /// Timer ticking once per second on `handle`'s runtime.
    pub fn new(handle: Handle) -> Self {
        Self::with_period(handle, Duration::from_millis(TIMER_TICK_MS))
    }

    pub fn with_period(handle: Handle, period: Duration) -> Self {
        Self {
            handle,
            period,
            started_at: None,
            elapsed: Arc::new(AtomicU64::new(0)),
            ticker: None,
        }
    }

    /// Start from zero. Restarts if already running.
    pub fn start(&mut self, callback: Option<TickCallback>) {
        self.stop();

        let start = Instant::now();
        self.started_at = Some(start);
        self.elapsed.store(0, Ordering::Relaxed);

        let cancelled = Arc::new(Mutex::new(false));
        let task = self.handle.spawn(run_ticker(
            start,
            self.period,
            Arc::clone(&self.elapsed),
            Arc::clone(&cancelled),
            callback,
        ));
        self.ticker = Some(Ticker { task, cancelled });
        debug!(period_ms = self.period.as_millis() as u64, "timer started");
    }

    /// Cancel the tick and freeze the elapsed value. Idempotent.
    pub fn stop(&mut self) {
        let Some(ticker) = self.ticker.take() else {
            return;
        };
        *ticker
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = true;
        ticker.task.abort();

        if let Some(start) = self.started_at {
            self.elapsed
                .store(start.elapsed().as_secs(), Ordering::Relaxed);
        }
        debug!(elapsed = self.elapsed(), "timer stopped");
    }

    /// Stop then start; used when moving to a new level.
    pub fn restart(&mut self, callback: Option<TickCallback>) {
        self.stop();
        self.start(callback);
    }

    /// Whole seconds since `start()`, or the frozen value once stopped.
    pub fn elapsed(&self) -> u64 {
        match (&self.ticker, self.started_at) {
            (Some(_), Some(start)) => start.elapsed().as_secs(),
            _ => self.elapsed.load(Ordering::Relaxed),
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }
}

impl Drop for TimerController {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_ticker(
    start: Instant,
    period: Duration,
    elapsed: Arc<AtomicU64>,
    cancelled: Arc<Mutex<bool>>,
    mut callback: Option<TickCallback>,
) {
    let mut interval = time::interval_at(start + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;

        let stopped = cancelled.lock().unwrap_or_else(PoisonError::into_inner);
        if *stopped {
            break;
        }
        let secs = start.elapsed().as_secs();
        elapsed.store(secs, Ordering::Relaxed);
        if let Some(cb) = callback.as_mut() {
            cb(secs);
        }
    }
}

/// `M:SS`, minutes unpadded.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
