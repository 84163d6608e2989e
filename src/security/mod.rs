//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming booking-code verification request:
//!     → lockout_gate.rs (subject locked? 429 without touching the code)
//!     → verification handler (checks the code, then records failure or clears)
//! ```
//!
//! # Design Decisions
//! - Fail closed by default: a store outage refuses the request
//! - No trust in client input: subject ids are validated before lookup

pub mod lockout_gate;

pub use lockout_gate::{lockout_gate, LOCKOUT_SUBJECT_HEADER};
