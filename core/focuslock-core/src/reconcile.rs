//! Periodic reconciliation driver.
//!
//! The loop is the authoritative synchronization path: change notifications
//! are a best-effort extra, so every view keeps one of these running from
//! open to close. One thread, a condvar-backed stop signal, explicit join on
//! [`Reconciler::stop`].

use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    fn new() -> (StopSignal, StopTrigger) {
        let inner = Arc::new((Mutex::new(false), Condvar::new()));
        let signal = StopSignal {
            inner: inner.clone(),
        };
        let trigger = StopTrigger { inner };
        (signal, trigger)
    }

    /// Waits for the stop signal or the timeout, whichever comes first.
    ///
    /// Returns `true` if stopped, `false` on timeout. Loops until the full
    /// duration has really elapsed so spurious wakeups cannot shorten a
    /// period. A poisoned signal reads as stopped.
    fn wait_timeout(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut stopped = match lock.lock() {
            Ok(guard) => guard,
            Err(_) => return true,
        };
        if *stopped {
            return true;
        }

        let start = Instant::now();
        let mut remaining = duration;

        loop {
            let (guard, result) = match cvar.wait_timeout(stopped, remaining) {
                Ok(pair) => pair,
                Err(_) => return true,
            };
            stopped = guard;
            if *stopped {
                return true;
            }
            if result.timed_out() {
                return false;
            }
            let elapsed = start.elapsed();
            if elapsed >= duration {
                return false;
            }
            remaining = duration - elapsed;
        }
    }
}

struct StopTrigger {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopTrigger {
    fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        if let Ok(mut stopped) = lock.lock() {
            *stopped = true;
        }
        cvar.notify_all();
    }
}

/// Handle to a running reconciliation loop.
///
/// The loop fires no more often than every `period` and keeps firing until
/// stopped. [`stop`](Reconciler::stop) signals and joins the thread; dropping
/// the handle signals without joining, so the thread winds down on its own
/// shortly after.
pub struct Reconciler {
    trigger: StopTrigger,
    thread: Option<thread::JoinHandle<()>>,
}

impl Reconciler {
    /// Spawns the loop. `tick` runs once per period; the first run happens
    /// one full period after start, since callers always evaluate once
    /// synchronously before scheduling.
    pub fn start(period: Duration, tick: impl Fn() + Send + 'static) -> Self {
        let (signal, trigger) = StopSignal::new();
        let thread = thread::spawn(move || {
            debug!(period_ms = period.as_millis() as u64, "reconciler running");
            loop {
                if signal.wait_timeout(period) {
                    break;
                }
                tick();
            }
            debug!("reconciler stopped");
        });
        Reconciler {
            trigger,
            thread: Some(thread),
        }
    }

    /// Stops the loop and joins its thread. Must not be called from inside
    /// the tick callback itself.
    pub fn stop(mut self) {
        self.trigger.stop();
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Reconciler {
    fn drop(&mut self) {
        // Signal only; a drop must never block on the loop thread.
        self.trigger.stop();
    }
}
