use game_types::{PlayerId, RoomId};
use std::collections::HashMap;

use crate::websocket::ConnectionId;

/// The (player, room) seat a live connection occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub player_id: PlayerId,
    pub room_id: RoomId,
}

/// Connection-to-seat mapping. A player is bound to at most one connection.
#[derive(Debug, Default)]
pub struct SessionTable {
    by_connection: HashMap<ConnectionId, Session>,
    by_player: HashMap<PlayerId, ConnectionId>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seats a connection. Returns the connection that previously held this
    /// player, if any; it is unbound and no longer receives room broadcasts.
    pub fn bind(&mut self, connection_id: ConnectionId, session: Session) -> Option<ConnectionId> {
        self.unbind(connection_id);

        let displaced = self
            .by_player
            .insert(session.player_id, connection_id)
            .filter(|previous| *previous != connection_id);
        if let Some(previous) = displaced {
            self.by_connection.remove(&previous);
        }

        self.by_connection.insert(connection_id, session);
        displaced
    }

    pub fn unbind(&mut self, connection_id: ConnectionId) -> Option<Session> {
        let session = self.by_connection.remove(&connection_id)?;
        if self.by_player.get(&session.player_id) == Some(&connection_id) {
            self.by_player.remove(&session.player_id);
        }
        Some(session)
    }

    pub fn get(&self, connection_id: ConnectionId) -> Option<Session> {
        self.by_connection.get(&connection_id).copied()
    }

    pub fn connection_for_player(&self, player_id: PlayerId) -> Option<ConnectionId> {
        self.by_player.get(&player_id).copied()
    }

    pub fn connections_in_room(&self, room_id: RoomId) -> Vec<ConnectionId> {
        self.by_connection
            .iter()
            .filter(|(_, session)| session.room_id == room_id)
            .map(|(connection_id, _)| *connection_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_connection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_connection.is_empty()
    }
}
