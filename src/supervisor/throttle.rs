//! Restart throttling for the watchdog loop.
//!
//! A worker that dies shortly after the previous restart is in a crash loop
//! and waits the slow delay before relaunch; a worker that outlived the
//! throttle window is restarted almost immediately. The comparison point is
//! the previous *restart event*, not the worker's own start time, so a
//! worker that ran for minutes but died soon after an unrelated restart is
//! still classified as looping. That is the historical behavior and callers
//! depend on it.

use chrono::{DateTime, Local};
use std::time::{Duration, Instant};

use crate::config::SupervisorConfig;

/// Per-watchdog restart state. Owned by the loop, never global.
#[derive(Debug)]
pub struct RestartThrottle {
    window: Duration,
    fast: Duration,
    slow: Duration,
    last_restart: Option<Instant>,
}

impl RestartThrottle {
    pub fn new(config: &SupervisorConfig) -> Self {
        Self {
            window: config.throttle_window(),
            fast: config.fast_restart(),
            slow: config.slow_restart(),
            last_restart: None,
        }
    }

    /// Delay to apply before relaunching a worker observed dead at `now`.
    ///
    /// Fast when more than the window has elapsed since the last recorded
    /// restart, or when no restart has been recorded yet.
    pub fn delay_after_exit(&self, now: Instant) -> Duration {
        match self.last_restart {
            Some(prev) if now.duration_since(prev) <= self.window => self.slow,
            _ => self.fast,
        }
    }

    /// Record the moment a relaunch actually happened (after the delay).
    pub fn mark_restarted(&mut self, now: Instant) {
        self.last_restart = Some(now);
    }

    pub fn last_restart(&self) -> Option<Instant> {
        self.last_restart
    }
}

/// One diagnostic line per worker death, written to the supervisor's sink.
pub(crate) fn restart_line(at: DateTime<Local>, status: i32, delay: Duration) -> String {
    let secs = delay.as_secs();
    format!(
        "{} ***DIED*** (status={}). Restarting in {} second{}.",
        at.format("%Y-%m-%d %H:%M:%S"),
        status,
        secs,
        if secs > 1 { "s" } else { "" },
    )
}
