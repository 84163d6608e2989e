//! Per-subject attempt record and its transitions.
//!
//! Every transition is a pure function of `(record, policy, now)`. Lock expiry
//! is never pushed: a record whose `locked_until` has passed simply reads as
//! unlocked.

use serde::{Deserialize, Serialize};

use crate::guard::policy::LockoutPolicy;
use crate::guard::status::LockoutStatus;

/// Stored state for one subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Consecutive failures since the last success, lockout or clear.
    pub failure_count: u32,
    /// Epoch millis the current lockout ends at, if one was imposed.
    #[serde(default)]
    pub locked_until: Option<u64>,
    /// Epoch millis of the last mutation.
    #[serde(default)]
    pub updated_at: u64,
}

impl AttemptRecord {
    /// Whether a lockout is in force at `now`.
    pub fn is_locked_at(&self, now: u64) -> bool {
        matches!(self.locked_until, Some(until) if until > now)
    }

    /// The record as seen at `now`: an expired lock is dropped.
    pub fn at(&self, now: u64) -> AttemptRecord {
        if self.locked_until.is_some() && !self.is_locked_at(now) {
            AttemptRecord {
                failure_count: 0,
                locked_until: None,
                updated_at: self.updated_at,
            }
        } else {
            *self
        }
    }

    /// Status reported for this record at `now`.
    pub fn status(&self, policy: &LockoutPolicy, now: u64) -> LockoutStatus {
        match self.locked_until {
            Some(until) if until > now => LockoutStatus::locked(until),
            _ => {
                // A count at or past the threshold (saved under a higher
                // policy) still leaves exactly one attempt before the lock.
                let count = self.at(now).failure_count;
                LockoutStatus::unlocked(policy.remaining_after(count).max(1))
            }
        }
    }

    /// Carries no information beyond the default state and may be dropped.
    pub fn is_evictable(&self, now: u64) -> bool {
        let current = self.at(now);
        current.failure_count == 0 && current.locked_until.is_none()
    }
}

/// Apply one failed attempt to `current`.
///
/// An active lock is left untouched. A stale lock counts as cleared before the
/// increment. Reaching the threshold imposes a lock and resets the count.
pub fn apply_failure(
    current: Option<AttemptRecord>,
    policy: &LockoutPolicy,
    now: u64,
) -> AttemptRecord {
    let record = current.map(|r| r.at(now)).unwrap_or_default();
    if record.is_locked_at(now) {
        return record;
    }

    let failure_count = record.failure_count.saturating_add(1);
    if failure_count >= policy.max_attempts {
        AttemptRecord {
            failure_count: 0,
            locked_until: Some(now.saturating_add(policy.lockout_millis())),
            updated_at: now,
        }
    } else {
        AttemptRecord {
            failure_count,
            locked_until: None,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const T0: u64 = 1_700_000_000_000;

    #[test]
    fn test_first_failure_creates_record() {
        let policy = LockoutPolicy::default();
        let record = apply_failure(None, &policy, T0);
        assert_eq!(record.failure_count, 1);
        assert_eq!(record.locked_until, None);
        assert_eq!(record.updated_at, T0);
        assert_eq!(record.status(&policy, T0), LockoutStatus::unlocked(2));
    }

    #[test]
    fn test_threshold_locks_and_resets_count() {
        let policy = LockoutPolicy::default();
        let mut record = None;
        for _ in 0..3 {
            record = Some(apply_failure(record, &policy, T0));
        }
        let record = record.unwrap();
        assert_eq!(record.failure_count, 0);
        assert_eq!(record.locked_until, Some(T0 + 300_000));
        assert!(record.is_locked_at(T0));
    }

    #[test]
    fn test_active_lock_is_not_extended() {
        let policy = LockoutPolicy::default();
        let locked = AttemptRecord {
            failure_count: 0,
            locked_until: Some(T0 + 1_000),
            updated_at: T0,
        };
        let after = apply_failure(Some(locked), &policy, T0 + 500);
        assert_eq!(after, locked);
    }

    #[test]
    fn test_stale_lock_starts_fresh() {
        let policy = LockoutPolicy::default();
        let stale = AttemptRecord {
            failure_count: 0,
            locked_until: Some(T0),
            updated_at: T0 - 300_000,
        };
        let after = apply_failure(Some(stale), &policy, T0 + 1);
        assert_eq!(after.failure_count, 1);
        assert_eq!(after.locked_until, None);
    }

    #[test]
    fn test_lock_boundary_is_exclusive() {
        let record = AttemptRecord {
            failure_count: 0,
            locked_until: Some(T0),
            updated_at: 0,
        };
        assert!(record.is_locked_at(T0 - 1));
        assert!(!record.is_locked_at(T0));
    }

    #[test]
    fn test_single_attempt_policy_locks_immediately() {
        let policy = LockoutPolicy::new(1, Duration::from_secs(60));
        let record = apply_failure(None, &policy, T0);
        assert_eq!(record.locked_until, Some(T0 + 60_000));
        assert_eq!(record.status(&policy, T0), LockoutStatus::locked(T0 + 60_000));
    }

    #[test]
    fn test_count_past_threshold_reports_one_remaining() {
        let policy = LockoutPolicy::default();
        let carried = AttemptRecord {
            failure_count: 4,
            locked_until: None,
            updated_at: T0,
        };
        assert_eq!(carried.status(&policy, T0), LockoutStatus::unlocked(1));

        let after = apply_failure(Some(carried), &policy, T0);
        assert_eq!(after.failure_count, 0);
        assert_eq!(after.locked_until, Some(T0 + 300_000));
    }

    #[test]
    fn test_evictable() {
        let counting = AttemptRecord {
            failure_count: 1,
            locked_until: None,
            updated_at: T0,
        };
        assert!(!counting.is_evictable(T0));

        let locked = AttemptRecord {
            failure_count: 0,
            locked_until: Some(T0 + 10),
            updated_at: T0,
        };
        assert!(!locked.is_evictable(T0));
        assert!(locked.is_evictable(T0 + 10));
    }
}
