use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::router::{Dispatch, RoomSettings, SessionRouter};
use crate::websocket::connection::{ConnectionId, ConnectionManager};
use game_types::{ClientMessage, GameError, GameState, SafeGameState, normalize_room_code};

/// Serializes every command behind one lock so each is applied, snapshotted
/// and queued to its recipients before the next one starts.
pub struct GameManager {
    router: Mutex<SessionRouter>,
    connection_manager: Arc<ConnectionManager>,
}

impl GameManager {
    pub fn new(connection_manager: Arc<ConnectionManager>, settings: RoomSettings) -> Self {
        Self {
            router: Mutex::new(SessionRouter::new(settings)),
            connection_manager,
        }
    }

    pub async fn handle_message(&self, connection_id: ConnectionId, message: ClientMessage) {
        let mut router = self.router.lock().await;
        let dispatch = router.handle(connection_id, message);
        self.deliver(dispatch);
    }

    pub async fn handle_disconnect(&self, connection_id: ConnectionId) {
        let mut router = self.router.lock().await;
        let dispatch = router.disconnect(connection_id);
        self.deliver(dispatch);
    }

    /// Rejections raised before a command reaches the router (bad frames,
    /// rate limiting).
    pub fn send_error(&self, connection_id: ConnectionId, error: GameError) {
        self.deliver(Dispatch::reply(connection_id, error.into()));
    }

    pub async fn get_game_state(&self, room_code: &str) -> Option<GameState> {
        let router = self.router.lock().await;
        router.room_state(&normalize_room_code(room_code))
    }

    /// Snapshot with the secret word masked, for read-only HTTP clients.
    pub async fn get_safe_game_state(&self, room_code: &str) -> Option<SafeGameState> {
        self.get_game_state(room_code)
            .await
            .map(|state| SafeGameState::from(&state))
    }

    pub async fn room_count(&self) -> usize {
        self.router.lock().await.store().room_count()
    }

    pub async fn seated_connections(&self) -> usize {
        self.router.lock().await.sessions().len()
    }

    fn deliver(&self, dispatch: Dispatch) {
        for outbound in dispatch {
            let connection_id = outbound.connection_id;
            if let Err(e) = self
                .connection_manager
                .send_to_connection(connection_id, outbound.message)
            {
                debug!("Skipping delivery to {}: {}", connection_id, e);
            }
        }
    }
}

impl Default for GameManager {
    fn default() -> Self {
        Self::new(Arc::new(ConnectionManager::new()), RoomSettings::default())
    }
}
