//! The guard wrapping booking-code verification.

use std::sync::Arc;

use serde::Serialize;

use crate::guard::clock::{Clock, SystemClock};
use crate::guard::policy::LockoutPolicy;
use crate::guard::record::{apply_failure, AttemptRecord};
use crate::guard::status::LockoutStatus;
use crate::guard::subject::SubjectId;
use crate::observability::metrics;
use crate::store::{AttemptStore, StoreError};

/// Outcome of [`LockoutGuard::verify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Code accepted; the subject's failures were cleared.
    Granted,
    /// Code rejected; the failure was recorded.
    Denied(LockoutStatus),
    /// Subject is locked; the code was not checked.
    Rejected(LockoutStatus),
}

/// Aggregate view of the store, for the admin API.
#[derive(Debug, Clone, Serialize)]
pub struct GuardSummary {
    pub tracked: usize,
    pub locked: usize,
    pub policy: LockoutPolicy,
}

/// Per-subject failure counting and lockout.
///
/// Cheap to clone; clones share the same store and clock.
#[derive(Clone)]
pub struct LockoutGuard {
    store: Arc<dyn AttemptStore>,
    clock: Arc<dyn Clock>,
    policy: LockoutPolicy,
}

impl LockoutGuard {
    /// Guard on the host wall clock.
    pub fn new(store: Arc<dyn AttemptStore>, policy: LockoutPolicy) -> Self {
        Self::with_clock(store, Arc::new(SystemClock), policy)
    }

    pub fn with_clock(
        store: Arc<dyn AttemptStore>,
        clock: Arc<dyn Clock>,
        policy: LockoutPolicy,
    ) -> Self {
        Self {
            store,
            clock,
            policy,
        }
    }

    pub fn policy(&self) -> &LockoutPolicy {
        &self.policy
    }

    pub fn now_millis(&self) -> u64 {
        self.clock.now_millis()
    }

    /// Status of a subject nobody has failed against yet.
    pub fn fresh_status(&self) -> LockoutStatus {
        LockoutStatus::unlocked(self.policy.max_attempts)
    }

    /// Count one wrong booking code for `subject`.
    ///
    /// While a lock is active the call changes nothing and reports the lock.
    pub fn record_failure(&self, subject: &SubjectId) -> Result<LockoutStatus, StoreError> {
        let now = self.clock.now_millis();
        let policy = self.policy;
        let mut already_locked = false;

        let stored = self
            .store
            .update(subject, &mut |current| {
                already_locked = current.is_some_and(|r| r.is_locked_at(now));
                Some(apply_failure(current, &policy, now))
            })
            .inspect_err(|e| {
                tracing::error!(
                    subject = %subject,
                    error = %e,
                    "Failed to record booking code failure"
                );
                metrics::record_store_error("record_failure");
            })?
            .unwrap_or_default();

        let status = stored.status(&policy, now);
        if already_locked {
            tracing::debug!(subject = %subject, "Failure reported against locked subject");
        } else if status.locked {
            tracing::warn!(
                subject = %subject,
                locked_until = ?status.locked_until,
                max_attempts = policy.max_attempts,
                "Subject locked out after repeated booking code failures"
            );
            metrics::record_failure();
            metrics::record_lockout();
        } else {
            tracing::info!(
                subject = %subject,
                remaining_attempts = status.remaining_attempts,
                "Booking code failure recorded"
            );
            metrics::record_failure();
        }

        Ok(status)
    }

    /// Current status of `subject`. Never mutates the record.
    pub fn lockout_status(&self, subject: &SubjectId) -> Result<LockoutStatus, StoreError> {
        let now = self.clock.now_millis();
        let record = self.store.get(subject).inspect_err(|e| {
            tracing::error!(subject = %subject, error = %e, "Failed to read lockout status");
            metrics::record_store_error("status");
        })?;

        Ok(record.unwrap_or_default().status(&self.policy, now))
    }

    /// Forget every failure and lock for `subject`. Idempotent.
    pub fn clear_booking_code_failures(&self, subject: &SubjectId) -> Result<(), StoreError> {
        let existed = self.store.delete(subject).inspect_err(|e| {
            tracing::error!(
                subject = %subject,
                error = %e,
                "Failed to clear booking code failures"
            );
            metrics::record_store_error("clear");
        })?;

        if existed {
            tracing::info!(subject = %subject, "Booking code failures cleared");
            metrics::record_clear();
        }
        Ok(())
    }

    /// Run the whole verification sequence around `check`.
    ///
    /// `check` is not called while the subject is locked.
    pub fn verify<F>(&self, subject: &SubjectId, check: F) -> Result<AttemptOutcome, StoreError>
    where
        F: FnOnce() -> bool,
    {
        let status = self.lockout_status(subject)?;
        if status.locked {
            return Ok(AttemptOutcome::Rejected(status));
        }

        if check() {
            self.clear_booking_code_failures(subject)?;
            Ok(AttemptOutcome::Granted)
        } else {
            self.record_failure(subject).map(AttemptOutcome::Denied)
        }
    }

    /// Drop records that no longer carry information. Returns how many.
    pub fn evict_expired(&self) -> Result<usize, StoreError> {
        let now = self.clock.now_millis();
        let evicted = self
            .store
            .retain(&mut |_, record: &AttemptRecord| !record.is_evictable(now))?;
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted idle attempt records");
            metrics::record_evictions(evicted);
        }
        Ok(evicted)
    }

    pub fn summary(&self) -> Result<GuardSummary, StoreError> {
        let now = self.clock.now_millis();
        let records = self.store.snapshot()?;
        let locked = records.iter().filter(|(_, r)| r.is_locked_at(now)).count();
        metrics::record_tracked_subjects(records.len());

        Ok(GuardSummary {
            tracked: records.len(),
            locked,
            policy: self.policy,
        })
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.store.flush()
    }
}
