//! Minimum spacing between rate-limited calls
//!
//! HubSpot's search endpoints allow a handful of requests per second per
//! account. A [`QuotaGate`] serializes gated calls and keeps at least
//! `interval` between the end of one call and the start of the next,
//! across every thread sharing the gate.
//!
//! ```
//! use std::time::Duration;
//! use hubsync_core::QuotaGate;
//!
//! let gate = QuotaGate::new(Duration::from_millis(10));
//! let answer = gate.run(|| 42);
//! assert_eq!(answer, 42);
//! ```

use std::time::{Duration, Instant};

use parking_lot::{Mutex, MutexGuard};
use tracing::debug;

/// Default spacing between search calls
pub const DEFAULT_QUOTA_INTERVAL: Duration = Duration::from_millis(1050);

/// Rate limiter enforcing a minimum interval between gated calls
#[derive(Debug)]
pub struct QuotaGate {
    interval: Duration,
    /// Held for the whole gated call
    gate: Mutex<()>,
    /// End of the most recent gated call; only locked briefly
    last_release: Mutex<Option<Instant>>,
}

impl QuotaGate {
    /// Gate keeping at least `interval` between gated calls
    pub fn new(interval: Duration) -> Self {
        QuotaGate {
            interval,
            gate: Mutex::new(()),
            last_release: Mutex::new(None),
        }
    }

    /// Minimum spacing between gated calls
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for the gate and hold it until the guard is dropped.
    ///
    /// Blocks while another call holds the gate, then sleeps for whatever
    /// is left of the interval since the last release. The sleep happens
    /// with the lock held so waiting threads queue behind it.
    pub fn acquire(&self) -> QuotaGuard<'_> {
        let held = self.gate.lock();

        if let Some(released) = self.last_release() {
            let elapsed = released.elapsed();
            if elapsed < self.interval {
                let wait = self.interval - elapsed;
                debug!(
                    target: "hubsync::quota",
                    wait_ms = wait.as_millis() as u64,
                    "Waiting for quota"
                );
                std::thread::sleep(wait);
            }
        }

        QuotaGuard {
            _held: held,
            last_release: &self.last_release,
        }
    }

    /// Run `f` while holding the gate
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.acquire();
        f()
    }

    /// When the gate was last released, if ever.
    ///
    /// Never waits on a held gate, so it is safe to call from inside `run`.
    pub fn last_release(&self) -> Option<Instant> {
        *self.last_release.lock()
    }
}

impl Default for QuotaGate {
    fn default() -> Self {
        QuotaGate::new(DEFAULT_QUOTA_INTERVAL)
    }
}

/// Held gate; dropping it records the release time and unlocks
#[must_use = "the gate is released as soon as the guard is dropped"]
pub struct QuotaGuard<'a> {
    _held: MutexGuard<'a, ()>,
    last_release: &'a Mutex<Option<Instant>>,
}

impl Drop for QuotaGuard<'_> {
    fn drop(&mut self) {
        // stamp before `_held` unlocks so the next caller sees it
        *self.last_release.lock() = Some(Instant::now());
    }
}
