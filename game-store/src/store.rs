use game_types::{
    GameState, GameStatus, GuessEvent, Player, PlayerId, Room, RoomId, Round, RoundId,
    RoundStatus,
};
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::patch::{PlayerUpdate, RoomUpdate, RoundUpdate};
use crate::snapshot::SnapshotAssembler;

/// Current time as an ISO 8601 string, the format every record timestamp uses.
pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[derive(Debug, Clone)]
pub struct NewRoom {
    pub room_code: String,
    pub max_guesses: u32,
}

#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub room_id: RoomId,
    pub name: String,
    pub is_creator: bool,
}

#[derive(Debug, Clone)]
pub struct NewRound {
    pub room_id: RoomId,
    pub round_number: u32,
    pub word_giver_id: PlayerId,
    pub guesser_id: PlayerId,
    pub word: String,
    pub hint: Option<String>,
    pub max_guesses: u32,
}

#[derive(Debug, Clone)]
pub struct NewGuessEvent {
    pub room_id: RoomId,
    pub player_id: PlayerId,
    pub letter: char,
    pub is_correct: bool,
}

/// In-memory repository of rooms, players, rounds and guess history.
///
/// Plain keyed CRUD with no game rules. Lookups return `None` instead of
/// failing; updates merge only the fields marked `Set`.
#[derive(Debug, Default)]
pub struct RoomStore {
    rooms: IndexMap<RoomId, Room>,
    room_codes: HashMap<String, RoomId>,
    players: IndexMap<PlayerId, Player>,
    rounds: IndexMap<RoundId, Round>,
    history: Vec<GuessEvent>,
}

impl RoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Rooms

    /// Creates a room in `waiting`. Returns `None` if the code is already in use.
    pub fn create_room(&mut self, new_room: NewRoom) -> Option<Room> {
        if self.room_codes.contains_key(&new_room.room_code) {
            return None;
        }

        let room = Room {
            id: Uuid::new_v4(),
            room_code: new_room.room_code,
            game_status: GameStatus::Waiting,
            round_number: 1,
            word_giver_id: None,
            guesser_id: None,
            current_word: None,
            hint: None,
            max_guesses: new_room.max_guesses,
            created_at: timestamp(),
        };

        self.room_codes.insert(room.room_code.clone(), room.id);
        self.rooms.insert(room.id, room.clone());
        debug!("Created room {} ({})", room.room_code, room.id);
        Some(room)
    }

    pub fn get_room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn get_room_by_code(&self, room_code: &str) -> Option<&Room> {
        self.room_codes
            .get(room_code)
            .and_then(|id| self.rooms.get(id))
    }

    pub fn room_code_exists(&self, room_code: &str) -> bool {
        self.room_codes.contains_key(room_code)
    }

    pub fn update_room(&mut self, id: RoomId, update: RoomUpdate) -> Option<Room> {
        let room = self.rooms.get_mut(&id)?;
        update.game_status.apply_to(&mut room.game_status);
        update.round_number.apply_to(&mut room.round_number);
        update.word_giver_id.apply_to(&mut room.word_giver_id);
        update.guesser_id.apply_to(&mut room.guesser_id);
        update.current_word.apply_to(&mut room.current_word);
        update.hint.apply_to(&mut room.hint);
        update.max_guesses.apply_to(&mut room.max_guesses);
        Some(room.clone())
    }

    /// Removes a room together with its players, rounds and history.
    pub fn delete_room(&mut self, id: RoomId) -> Option<Room> {
        let room = self.rooms.shift_remove(&id)?;
        self.room_codes.remove(&room.room_code);
        self.delete_players_by_room(id);
        self.rounds.retain(|_, round| round.room_id != id);
        self.clear_history(id);
        debug!("Deleted room {} ({})", room.room_code, room.id);
        Some(room)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    // Players

    pub fn create_player(&mut self, new_player: NewPlayer) -> Player {
        let now = timestamp();
        let player = Player {
            id: Uuid::new_v4(),
            room_id: new_player.room_id,
            name: new_player.name,
            score: 0,
            is_online: true,
            is_creator: new_player.is_creator,
            joined_at: now.clone(),
            last_seen: now,
        };
        self.players.insert(player.id, player.clone());
        player
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    /// Players of a room in join order.
    pub fn get_players_by_room(&self, room_id: RoomId) -> Vec<Player> {
        self.players
            .values()
            .filter(|player| player.room_id == room_id)
            .cloned()
            .collect()
    }

    pub fn count_players_in_room(&self, room_id: RoomId) -> usize {
        self.players
            .values()
            .filter(|player| player.room_id == room_id)
            .count()
    }

    pub fn get_player_by_name(&self, room_id: RoomId, name: &str) -> Option<&Player> {
        self.players
            .values()
            .find(|player| player.room_id == room_id && player.name == name)
    }

    pub fn update_player(&mut self, id: PlayerId, update: PlayerUpdate) -> Option<Player> {
        let player = self.players.get_mut(&id)?;
        update.name.apply_to(&mut player.name);
        update.score.apply_to(&mut player.score);
        update.is_online.apply_to(&mut player.is_online);
        update.last_seen.apply_to(&mut player.last_seen);
        Some(player.clone())
    }

    /// Marks a player online or offline and stamps `last_seen`.
    pub fn set_player_online(&mut self, id: PlayerId, is_online: bool) -> Option<Player> {
        self.update_player(
            id,
            PlayerUpdate {
                is_online: crate::Patch::Set(is_online),
                last_seen: crate::Patch::Set(timestamp()),
                ..Default::default()
            },
        )
    }

    pub fn delete_player(&mut self, id: PlayerId) -> Option<Player> {
        self.players.shift_remove(&id)
    }

    pub fn delete_players_by_room(&mut self, room_id: RoomId) {
        self.players.retain(|_, player| player.room_id != room_id);
    }

    // Guess history

    pub fn add_history(&mut self, new_event: NewGuessEvent) -> GuessEvent {
        let event = GuessEvent {
            id: Uuid::new_v4(),
            room_id: new_event.room_id,
            player_id: new_event.player_id,
            letter: new_event.letter,
            is_correct: new_event.is_correct,
            timestamp: timestamp(),
        };
        self.history.push(event.clone());
        event
    }

    /// History of a room in the order the guesses were made.
    pub fn get_history(&self, room_id: RoomId) -> Vec<GuessEvent> {
        self.history
            .iter()
            .filter(|event| event.room_id == room_id)
            .cloned()
            .collect()
    }

    pub fn clear_history(&mut self, room_id: RoomId) {
        self.history.retain(|event| event.room_id != room_id);
    }

    // Rounds

    pub fn create_round(&mut self, new_round: NewRound) -> Round {
        let round = Round {
            id: Uuid::new_v4(),
            room_id: new_round.room_id,
            round_number: new_round.round_number,
            word_giver_id: new_round.word_giver_id,
            guesser_id: new_round.guesser_id,
            word: new_round.word,
            hint: new_round.hint,
            guessed_letters: Vec::new(),
            wrong_guesses: 0,
            max_guesses: new_round.max_guesses,
            status: RoundStatus::InProgress,
            points_awarded: 0,
            created_at: timestamp(),
            completed_at: None,
        };
        self.rounds.insert(round.id, round.clone());
        round
    }

    pub fn get_round(&self, id: RoundId) -> Option<&Round> {
        self.rounds.get(&id)
    }

    pub fn get_round_by_number(&self, room_id: RoomId, round_number: u32) -> Option<&Round> {
        self.rounds
            .values()
            .find(|round| round.room_id == room_id && round.round_number == round_number)
    }

    pub fn update_round(&mut self, id: RoundId, update: RoundUpdate) -> Option<Round> {
        let round = self.rounds.get_mut(&id)?;
        update.guessed_letters.apply_to(&mut round.guessed_letters);
        update.wrong_guesses.apply_to(&mut round.wrong_guesses);
        update.status.apply_to(&mut round.status);
        update.points_awarded.apply_to(&mut round.points_awarded);
        update.completed_at.apply_to(&mut round.completed_at);
        Some(round.clone())
    }

    /// Rounds of a room ordered by round number.
    pub fn get_rounds(&self, room_id: RoomId) -> Vec<Round> {
        let mut rounds: Vec<Round> = self
            .rounds
            .values()
            .filter(|round| round.room_id == room_id)
            .cloned()
            .collect();
        rounds.sort_by_key(|round| round.round_number);
        rounds
    }

    pub fn get_current_round(&self, room_id: RoomId) -> Option<&Round> {
        self.rounds
            .values()
            .find(|round| round.room_id == room_id && round.status == RoundStatus::InProgress)
    }

    // Snapshots

    pub fn get_game_state(&self, room_code: &str) -> Option<GameState> {
        SnapshotAssembler::by_code(self, room_code)
    }

    pub fn get_game_state_by_id(&self, room_id: RoomId) -> Option<GameState> {
        SnapshotAssembler::by_id(self, room_id)
    }
}
