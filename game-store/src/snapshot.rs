use game_types::{GameState, RoomId};

use crate::RoomStore;

/// Joins store records into the denormalized [`GameState`] sent to clients.
///
/// Always rebuilt from scratch. A room that no longer exists yields `None`,
/// which callers treat as nothing to broadcast.
pub struct SnapshotAssembler;

impl SnapshotAssembler {
    pub fn by_code(store: &RoomStore, room_code: &str) -> Option<GameState> {
        let room_id = store.get_room_by_code(room_code)?.id;
        Self::by_id(store, room_id)
    }

    pub fn by_id(store: &RoomStore, room_id: RoomId) -> Option<GameState> {
        let room = store.get_room(room_id)?.clone();

        Some(GameState {
            players: store.get_players_by_room(room_id),
            history: store.get_history(room_id),
            rounds: store.get_rounds(room_id),
            current_round: store.get_current_round(room_id).cloned(),
            room,
        })
    }
}
