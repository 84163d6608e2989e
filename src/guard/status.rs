//! Status values reported to the verification flow.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Result of a status query or a recorded failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockoutStatus {
    pub locked: bool,
    pub remaining_attempts: u32,
    /// Epoch millis; `None` unless locked.
    pub locked_until: Option<u64>,
}

impl LockoutStatus {
    pub fn locked(until: u64) -> Self {
        Self {
            locked: true,
            remaining_attempts: 0,
            locked_until: Some(until),
        }
    }

    pub fn unlocked(remaining_attempts: u32) -> Self {
        Self {
            locked: false,
            remaining_attempts,
            locked_until: None,
        }
    }

    /// Time left on the lock at `now`, if locked.
    pub fn retry_after(&self, now: u64) -> Option<Duration> {
        match (self.locked, self.locked_until) {
            (true, Some(until)) => Some(Duration::from_millis(until.saturating_sub(now))),
            _ => None,
        }
    }

    /// Seconds left on the lock, rounded up so callers never retry early.
    pub fn retry_after_secs(&self, now: u64) -> Option<u64> {
        self.retry_after(now).map(|d| {
            let millis = u64::try_from(d.as_millis()).unwrap_or(u64::MAX);
            millis.div_ceil(1000)
        })
    }

    /// Human-readable summary at `now`.
    pub fn describe(&self, now: u64) -> String {
        match self.retry_after_secs(now) {
            Some(secs) => format!("locked, try again in {}", format_wait(secs)),
            None if self.remaining_attempts == 1 => "1 attempt remaining".to_string(),
            None => format!("{} attempts remaining", self.remaining_attempts),
        }
    }
}

fn format_wait(secs: u64) -> String {
    let (minutes, seconds) = (secs / 60, secs % 60);
    match (minutes, seconds) {
        (0, s) => format!("{}s", s),
        (m, 0) => format!("{}m", m),
        (m, s) => format!("{}m {}s", m, s),
    }
}
