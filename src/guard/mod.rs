//! Booking-code lockout guard.
//!
//! # Data Flow
//! ```text
//! verification endpoint
//!     → LockoutGuard::lockout_status   (locked? reject without checking the code)
//!     → [caller checks the booking code]
//!     → LockoutGuard::record_failure   (mismatch)
//!     → LockoutGuard::clear_booking_code_failures (match)
//! ```
//!
//! # State Machine (per subject)
//! ```text
//! CLEAR --failure, count < max-1--> CLEAR (count + 1)
//! CLEAR --failure, count == max-1--> LOCKED (count = 0, locked_until = now + duration)
//! LOCKED --now >= locked_until--> CLEAR (implicit, evaluated on read)
//! any --success / clear--> CLEAR (record removed)
//! ```

pub mod clock;
pub mod lockout;
pub mod policy;
pub mod record;
pub mod status;
pub mod subject;

pub use clock::{Clock, ManualClock, SystemClock};
pub use lockout::{AttemptOutcome, GuardSummary, LockoutGuard};
pub use policy::LockoutPolicy;
pub use record::AttemptRecord;
pub use status::LockoutStatus;
pub use subject::{SubjectError, SubjectId};
