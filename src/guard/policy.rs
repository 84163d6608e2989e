//! Lockout policy: how many consecutive failures a subject may accumulate and
//! how long the resulting lockout lasts.

use std::time::Duration;

use serde::Serialize;

/// Default number of consecutive failures that triggers a lockout.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default lockout length.
pub const DEFAULT_LOCKOUT_DURATION: Duration = Duration::from_secs(5 * 60);

/// Threshold/duration pair the guard is constructed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LockoutPolicy {
    /// Failures that trigger a lockout. Always at least 1.
    pub max_attempts: u32,
    /// Time a subject stays locked once the threshold is reached.
    #[serde(rename = "lockout_secs", serialize_with = "serialize_secs")]
    pub lockout_duration: Duration,
}

impl LockoutPolicy {
    /// Create a policy. A threshold of zero is raised to one.
    pub fn new(max_attempts: u32, lockout_duration: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            lockout_duration,
        }
    }

    /// Lockout duration in milliseconds, saturating.
    pub fn lockout_millis(&self) -> u64 {
        u64::try_from(self.lockout_duration.as_millis()).unwrap_or(u64::MAX)
    }

    /// Attempts left after `failure_count` consecutive failures.
    pub fn remaining_after(&self, failure_count: u32) -> u32 {
        self.max_attempts.saturating_sub(failure_count)
    }
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            lockout_duration: DEFAULT_LOCKOUT_DURATION,
        }
    }
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_secs())
}
