//! One-shot deadline timer with cooperative cancellation (SPEC_FULL.md §4.5).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

const DEFAULT_WAKEUP_SLICE: Duration = Duration::from_millis(10);

/// Fires `callback` exactly once after `interval` elapses, unless stopped
/// first. Sleeps in small wake-up slices so `stop` returns promptly instead
/// of blocking for the whole interval.
pub struct Timer {
    stopped: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Timer {
    pub fn start<F>(interval: Duration, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::start_with_slice(interval, DEFAULT_WAKEUP_SLICE, callback)
    }

    /// Same as `start`, with an overridable wake-up slice. Tests use a
    /// shorter slice so a short-lived `GAME_DURATION_MS` override doesn't
    /// have to wait out a slice longer than the deadline itself.
    pub fn start_with_slice<F>(interval: Duration, slice: Duration, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let stopped = Arc::new(AtomicBool::new(false));
        let stopped_for_thread = stopped.clone();
        let handle = std::thread::spawn(move || {
            let deadline = Instant::now() + interval;
            loop {
                if stopped_for_thread.load(Ordering::Acquire) {
                    return;
                }
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    break;
                }
                std::thread::sleep(slice.min(remaining));
            }
            if !stopped_for_thread.load(Ordering::Acquire) {
                callback();
            }
        });
        Timer { stopped, handle: Some(handle) }
    }

    /// Stops the timer, blocking for at most one wake-up slice while the
    /// worker notices and exits.
    pub fn stop(mut self) {
        self.stopped.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.stopped.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn fires_callback_after_full_elapse() {
        let (tx, rx) = mpsc::channel();
        let timer =
            Timer::start_with_slice(Duration::from_millis(20), Duration::from_millis(2), move || {
                let _ = tx.send(());
            });
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_ok());
        drop(timer);
    }

    #[test]
    fn stop_prevents_callback() {
        let (tx, rx) = mpsc::channel::<()>();
        let timer =
            Timer::start_with_slice(Duration::from_millis(50), Duration::from_millis(2), move || {
                let _ = tx.send(());
            });
        timer.stop();
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }
}
