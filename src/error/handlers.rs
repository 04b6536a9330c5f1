//! Error handlers
//!
//! Maps namespace errors onto protocol reply codes and logs them.

use crate::error::types::NamespaceError;
use crate::protocol::responses;
use log::{debug, warn};

/// Log a namespace error raised while serving a command
pub fn handle_error(err: &NamespaceError) {
    match err {
        NamespaceError::CorruptFileSystem(_) => warn!("Namespace error: {}", err),
        _ => debug!("Namespace error: {}", err),
    }
}

/// Convert error to protocol reply code
pub fn error_to_reply_code(err: &NamespaceError) -> u16 {
    match err {
        NamespaceError::CorruptFileSystem(_) => responses::LOCAL_ERROR,
        NamespaceError::NotFound(_) => responses::NOT_FOUND,
        NamespaceError::WrongKind(_) => responses::WRONG_KIND,
        NamespaceError::NameCollision(_) => responses::NAME_COLLISION,
        NamespaceError::InvalidName(_) => responses::INVALID_NAME,
        NamespaceError::CannotAscendAboveRoot => responses::ABOVE_ROOT,
    }
}

/// Format an error as a single reply line
pub fn error_response(err: &NamespaceError) -> String {
    handle_error(err);
    responses::format_response(error_to_reply_code(err), &err.to_string())
}
