use std::sync::Arc;
use warp::Filter;

use crate::config::Config;
use crate::game_manager::GameManager;
use crate::websocket::{ConnectionManager, RateLimiter};

pub mod config;
pub mod game_manager;
pub mod router;
pub mod sessions;
pub mod websocket;

pub fn create_routes(
    connection_manager: Arc<ConnectionManager>,
    game_manager: Arc<GameManager>,
    config: Config,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let connection_manager_filter = warp::any().map({
        let connection_manager = connection_manager.clone();
        move || connection_manager.clone()
    });

    let game_manager_filter = warp::any().map({
        let game_manager = game_manager.clone();
        move || game_manager.clone()
    });

    // Fresh bucket per connection
    let rate_limiter_filter = warp::any().map({
        let burst = config.rate_limit_burst;
        let refill = config.rate_limit_refill();
        move || RateLimiter::new(burst, refill)
    });

    let websocket = warp::path("ws")
        .and(warp::ws())
        .and(connection_manager_filter)
        .and(game_manager_filter.clone())
        .and(rate_limiter_filter)
        .map(|ws: warp::ws::Ws, conn_mgr, game_mgr, rate_limiter| {
            ws.on_upgrade(move |socket| {
                websocket::handle_connection(socket, conn_mgr, game_mgr, rate_limiter)
            })
        });

    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", warp::http::StatusCode::OK));

    // Read-only room view with the secret word masked
    let room_state = warp::path!("rooms" / String)
        .and(warp::get())
        .and(game_manager_filter)
        .and_then(handle_room_state_request);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET"]);

    websocket
        .or(health)
        .or(room_state)
        .with(cors)
        .with(warp::log("hangman_duel"))
}

async fn handle_room_state_request(
    room_code: String,
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match game_manager.get_safe_game_state(&room_code).await {
        Some(safe_state) => Ok(warp::reply::with_status(
            warp::reply::json(&safe_state),
            warp::http::StatusCode::OK,
        )),
        None => Ok(warp::reply::with_status(
            warp::reply::json(&serde_json::json!({
                "error": "Room not found"
            })),
            warp::http::StatusCode::NOT_FOUND,
        )),
    }
}
