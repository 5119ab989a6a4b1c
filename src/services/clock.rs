//! Time sources for the vault host.
//!
//! The vault never reads time itself; the host reads a [`Clock`] exactly once
//! per call and passes the value down.

use std::cell::Cell;

/// Supplies the current unix timestamp in seconds
pub trait Clock {
    /// Current time. Successive reads never decrease.
    fn now(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> u64 {
        (**self).now()
    }
}

/// Wall-clock time from the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        // Pre-epoch system time clamps to zero
        u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
    }
}

/// Manually driven clock for tests, demos and pinned CLI runs
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    /// Clock pinned at `timestamp`
    pub fn at(timestamp: u64) -> Self {
        Self {
            now: Cell::new(timestamp),
        }
    }

    /// Move forward by `seconds`, saturating at `u64::MAX`
    pub fn advance_by(&self, seconds: u64) {
        self.now.set(self.now.get().saturating_add(seconds));
    }

    /// Move to `timestamp`. Requests to go backwards are ignored.
    pub fn advance_to(&self, timestamp: u64) {
        let current = self.now.get();
        if timestamp < current {
            log::warn!(
                "Ignoring request to move clock backwards from {} to {}",
                current,
                timestamp
            );
            return;
        }
        self.now.set(timestamp);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.get()
    }
}
