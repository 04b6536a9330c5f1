//! Server core functionality
//!
//! Contains the TCP front end: the listener, the accept loop and the shared
//! state handed to every session.

pub mod core;

pub use self::core::Server;
