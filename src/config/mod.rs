//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GuardConfig (validated, immutable)
//!     → policy and store built once at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the lockout policy never changes while
//!   the process runs
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AdminConfig, FailureMode, GuardConfig, ListenerConfig, ObservabilityConfig, PolicyConfig,
    StoreConfig, TimeoutConfig,
};
