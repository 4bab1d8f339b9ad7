//! Injected time source
//!
//! The engine never reads the system clock directly: trade timestamps and
//! the sweeper's end-of-day deadline both go through [`TimeSource`], so
//! tests can pin time wherever they need it.

use std::sync::Mutex;

use chrono::{DateTime, Local, NaiveTime, TimeDelta};

/// Source of local wall-clock time.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Manually driven time source for deterministic tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Local>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Local>) {
        *self.now.lock().expect("manual clock poisoned") = now;
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock().expect("manual clock poisoned");
        *now = *now + by;
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().expect("manual clock poisoned")
    }
}

/// The next moment the trading session closes: today at `close` if that
/// has not passed yet, otherwise tomorrow at `close`.
pub fn next_session_close(now: DateTime<Local>, close: NaiveTime) -> DateTime<Local> {
    let mut date = now.date_naive();
    if now.time() >= close {
        date = date.succ_opt().expect("date overflow computing session close");
    }
    date.and_time(close)
        .and_local_timezone(Local)
        .earliest()
        .expect("session close must be a valid local time")
}
