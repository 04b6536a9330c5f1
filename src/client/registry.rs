//! Session registry
//!
//! Tracks the sessions of all connected clients and enforces the client cap.

use crate::client::Session;
use std::collections::HashMap;
use std::net::SocketAddr;

/// Registry for tracking active sessions
pub struct SessionRegistry {
    sessions: HashMap<SocketAddr, Session>,
    max_clients: usize,
}

impl SessionRegistry {
    pub fn new(max_clients: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            max_clients,
        }
    }

    /// Registers a session, handing it back when the registry is full.
    pub fn insert(&mut self, session: Session) -> Result<(), Session> {
        if self.is_full() {
            return Err(session);
        }
        self.sessions.insert(*session.client_addr(), session);
        Ok(())
    }

    pub fn remove(&mut self, addr: &SocketAddr) -> Option<Session> {
        self.sessions.remove(addr)
    }

    pub fn get(&self, addr: &SocketAddr) -> Option<&Session> {
        self.sessions.get(addr)
    }

    pub fn get_mut(&mut self, addr: &SocketAddr) -> Option<&mut Session> {
        self.sessions.get_mut(addr)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.sessions.len() >= self.max_clients
    }

    pub fn max_clients(&self) -> usize {
        self.max_clients
    }
}
