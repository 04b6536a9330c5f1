//! Client management system
//!
//! Handles client connections, per-session state and the session registry.

pub mod handler;
pub mod registry;
pub mod state;

pub use handler::handle_client;
pub use registry::SessionRegistry;
pub use state::Session;
