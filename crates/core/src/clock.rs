use std::fmt;

use chrono::{DateTime, Duration, Local};
use parking_lot::Mutex;

/// Source of wall-clock time for naming assets and minting album ids.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Local>;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to, optionally ticking forward by a
/// fixed step on every read.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<DateTime<Local>>,
    step: Duration,
}

impl ManualClock {
    /// A clock frozen at `at`.
    #[must_use]
    pub fn fixed(at: DateTime<Local>) -> Self {
        Self::ticking(at, Duration::zero())
    }

    /// A clock that returns `at`, then `at + step`, `at + 2 * step`, ...
    #[must_use]
    pub fn ticking(at: DateTime<Local>, step: Duration) -> Self {
        Self {
            current: Mutex::new(at),
            step,
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock();
        *current += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        let mut current = self.current.lock();
        let now = *current;
        *current += self.step;
        now
    }
}
