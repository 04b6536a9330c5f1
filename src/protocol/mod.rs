//! Command protocol
//!
//! Handles command parsing, dispatch onto the namespace and reply formatting.

pub mod commands;
pub mod handlers;
pub mod responses;

pub use commands::{Command, CommandResult, CommandStatus, parse_command, split_commands};
pub use handlers::handle_command;
