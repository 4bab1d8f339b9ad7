//! Good-for-day sweeper
//!
//! A background thread that cancels every resting GoodForDay order once
//! the session close passes. The timed wait runs on the book mutex with a
//! shutdown predicate, so the sweep deadline and engine shutdown share one
//! interlock; the deadline is recomputed every cycle to survive spurious
//! wakeups and clock changes.

use std::time::Duration;

use chrono::NaiveTime;
use tracing::{debug, info};

use crate::clock::next_session_close;
use crate::engine::Shared;

/// Configuration for the good-for-day sweeper.
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// Local wall-clock time at which GoodForDay orders expire.
    pub session_close: NaiveTime,
    /// Slack added to the deadline so the close has passed by the time
    /// the sweep runs.
    pub grace: Duration,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            session_close: NaiveTime::from_hms_opt(16, 0, 0).expect("16:00:00 is a valid time"),
            grace: Duration::from_millis(100),
        }
    }
}

/// Body of the sweeper thread.
pub(crate) fn run(shared: &Shared) {
    info!(session_close = %shared.config.session_close, "gfd sweeper started");

    loop {
        let now = shared.clock.now();
        let deadline = next_session_close(now, shared.config.session_close);
        let till = (deadline - now).to_std().unwrap_or(Duration::ZERO) + shared.config.grace;
        debug!(%deadline, "gfd sweeper sleeping until session close");

        {
            let guard = shared.book();
            let (_guard, timeout) = shared
                .shutdown_cv
                .wait_timeout_while(guard, till, |_| !shared.is_shutdown())
                .expect("book mutex poisoned");
            if !timeout.timed_out() {
                info!("gfd sweeper stopping");
                return;
            }
        }

        let expired = shared.book().good_for_day_ids();
        if expired.is_empty() {
            continue;
        }
        info!(count = expired.len(), "sweeping expired good-for-day orders");
        shared.cancel_ids(&expired);
    }
}
