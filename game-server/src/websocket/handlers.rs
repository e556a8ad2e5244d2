use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::game_manager::GameManager;
use crate::websocket::connection::ConnectionId;
use game_types::{ClientMessage, GameError};

/// Per-connection bridge from raw text frames to the game manager.
#[derive(Clone)]
pub struct MessageHandler {
    connection_id: ConnectionId,
    game_manager: Arc<GameManager>,
}

impl MessageHandler {
    pub fn new(connection_id: ConnectionId, game_manager: Arc<GameManager>) -> Self {
        Self {
            connection_id,
            game_manager,
        }
    }

    pub async fn handle_text(&self, text: &str) {
        match ClientMessage::decode(text) {
            Ok(message) => {
                debug!("{} sent {}", self.connection_id, message.kind());
                self.game_manager
                    .handle_message(self.connection_id, message)
                    .await;
            }
            Err(e) => {
                warn!("Invalid frame from {}: {}", self.connection_id, e);
                self.reject(GameError::InvalidMessageFormat);
            }
        }
    }

    pub fn reject(&self, error: GameError) {
        self.game_manager.send_error(self.connection_id, error);
    }

    pub async fn handle_disconnect(&self) {
        info!("Handling disconnect for connection {}", self.connection_id);
        self.game_manager.handle_disconnect(self.connection_id).await;
    }
}
