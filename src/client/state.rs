//! Module `state`
//!
//! Defines the `Session` struct holding the state of one connected client:
//! its address, its own working-directory snapshot and a command counter.

use std::net::SocketAddr;

use crate::namespace::Directory;

/// Represents the state of a connected client.
///
/// The working directory is a snapshot owned by the session, so every
/// client navigates independently while sharing one namespace tree.
pub struct Session {
    client_addr: SocketAddr,
    working_directory: Directory,
    commands_served: u64,
}

impl Session {
    /// Creates a session whose working directory starts at `root`.
    pub fn new(client_addr: SocketAddr, root: Directory) -> Self {
        Self {
            client_addr,
            working_directory: root,
            commands_served: 0,
        }
    }

    // --------------------
    // Getter methods
    // --------------------

    /// Returns the client's socket address.
    pub fn client_addr(&self) -> &SocketAddr {
        &self.client_addr
    }

    /// Returns the session's working-directory snapshot.
    pub fn working_directory(&self) -> &Directory {
        &self.working_directory
    }

    /// Returns how many commands this session has run.
    pub fn commands_served(&self) -> u64 {
        self.commands_served
    }

    // --------------------
    // Setter methods
    // --------------------

    /// Gives mutable access to the snapshot so it can be swapped into the
    /// namespace for the duration of one command.
    pub fn working_directory_mut(&mut self) -> &mut Directory {
        &mut self.working_directory
    }

    pub fn record_command(&mut self) {
        self.commands_served += 1;
    }
}
