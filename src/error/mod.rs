//! Error handling
//!
//! Defines the namespace error taxonomy, the process-level error type and
//! the mapping of errors onto protocol reply codes.

pub mod handlers;
pub mod types;

pub use types::*;
