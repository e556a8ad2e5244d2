use dashmap::DashMap;
use game_types::ServerMessage;
use std::fmt;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("Connection not found")]
    NotFound,
    #[error("Connection closed")]
    Closed,
}

#[derive(Debug, Clone)]
pub struct Connection {
    pub id: ConnectionId,
    pub connected_at: Instant,
    sender: mpsc::UnboundedSender<ServerMessage>,
}

impl Connection {
    pub fn new(id: ConnectionId) -> (Self, mpsc::UnboundedReceiver<ServerMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let connection = Self {
            id,
            connected_at: Instant::now(),
            sender,
        };
        (connection, receiver)
    }

    pub fn send_message(&self, message: ServerMessage) -> Result<(), ConnectionError> {
        self.sender
            .send(message)
            .map_err(|_| ConnectionError::Closed)
    }
}

/// Registry of live connections and their outbound queues.
#[derive(Debug, Default)]
pub struct ConnectionManager {
    connections: DashMap<ConnectionId, Connection>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_connection(&self, id: ConnectionId) -> mpsc::UnboundedReceiver<ServerMessage> {
        let (connection, receiver) = Connection::new(id);
        self.connections.insert(id, connection);
        receiver
    }

    pub fn remove_connection(&self, id: ConnectionId) -> bool {
        self.connections.remove(&id).is_some()
    }

    pub fn is_connected(&self, id: ConnectionId) -> bool {
        self.connections.contains_key(&id)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn send_to_connection(
        &self,
        id: ConnectionId,
        message: ServerMessage,
    ) -> Result<(), ConnectionError> {
        self.connections
            .get(&id)
            .ok_or(ConnectionError::NotFound)?
            .send_message(message)
    }
}
