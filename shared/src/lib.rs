//! Shared types for the persistent-memory test harness
//!
//! Contains only truly shared vocabulary: test descriptors, outcomes,
//! size classes, error types and tracing setup. Harness-internal types
//! (scheduling state, scratch bookkeeping) live in the harness crate.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
