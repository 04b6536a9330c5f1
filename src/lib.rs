//! disync - a virtual namespace of directories and reference-carrying files
//!
//! The tree is built from a YAML/JSON document and served over a small line
//! protocol, either on TCP or on an interactive console.

pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod namespace;
pub mod protocol;
pub mod server;

pub use self::config::{Frontend, ServerConfig};
pub use error::{DisyncError, NamespaceError};
pub use namespace::Namespace;
pub use server::Server;
