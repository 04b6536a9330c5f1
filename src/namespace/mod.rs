//! Namespace module
//!
//! The virtual directory tree: node model, document loader, path resolver
//! and the `Namespace` facade that ties them together.

mod facade;
pub mod loader;
mod node;
pub mod resolver;

// Re-export public types and functions
pub use facade::Namespace;
pub use node::{Directory, File, ReferenceId, validate_name};
pub use resolver::{Resolved, resolve, split};
