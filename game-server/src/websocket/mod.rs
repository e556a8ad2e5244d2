use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{error, info, warn};
use warp::ws::{Message, WebSocket};

use crate::game_manager::GameManager;
use game_types::GameError;

pub mod connection;
pub mod handlers;
pub mod rate_limiter;

pub use connection::{ConnectionId, ConnectionManager};
use handlers::MessageHandler;
pub use rate_limiter::RateLimiter;

pub async fn handle_connection(
    websocket: WebSocket,
    connection_manager: Arc<ConnectionManager>,
    game_manager: Arc<GameManager>,
    mut rate_limiter: RateLimiter,
) {
    let connection_id = ConnectionId::new();
    info!("New WebSocket connection: {}", connection_id);

    let (mut ws_sender, mut ws_receiver) = websocket.split();
    let message_receiver = connection_manager.create_connection(connection_id);
    let message_handler = MessageHandler::new(connection_id, game_manager);

    let incoming_handler = {
        let message_handler = message_handler.clone();

        async move {
            while let Some(result) = ws_receiver.next().await {
                let msg = match result {
                    Ok(msg) => msg,
                    Err(e) => {
                        warn!("WebSocket error for {}: {}", connection_id, e);
                        break;
                    }
                };

                if msg.is_close() {
                    break;
                }
                // Pings are answered by the transport; binary frames are not part of the protocol.
                let Ok(text) = msg.to_str() else {
                    continue;
                };

                if !rate_limiter.check_rate_limit() {
                    warn!("Rate limit exceeded for connection {}", connection_id);
                    message_handler.reject(GameError::RateLimitExceeded);
                    continue;
                }

                message_handler.handle_text(text).await;
            }
        }
    };

    let outgoing_handler = async move {
        let mut receiver = message_receiver;

        while let Some(message) = receiver.recv().await {
            let json = match message.encode() {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize message: {:?}", e);
                    continue;
                }
            };

            if let Err(e) = ws_sender.send(Message::text(json)).await {
                warn!("Failed to send message to {}: {:?}", connection_id, e);
                break;
            }
        }
    };

    tokio::select! {
        _ = incoming_handler => {},
        _ = outgoing_handler => {},
    }

    info!("Connection {} disconnected", connection_id);
    message_handler.handle_disconnect().await;
    connection_manager.remove_connection(connection_id);
}
