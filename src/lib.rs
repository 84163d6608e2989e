//! Booking-code lockout guard.
//!
//! Limits how many wrong booking codes a caller may present for a subject
//! before verification for that subject is locked for a while.

pub mod admin;
pub mod config;
pub mod guard;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod store;

pub use config::GuardConfig;
pub use guard::{
    AttemptOutcome, Clock, LockoutGuard, LockoutPolicy, LockoutStatus, ManualClock, SubjectId,
    SystemClock,
};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::{AttemptStore, MemoryStore, StoreError};
