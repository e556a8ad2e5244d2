use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

pub type RoomId = Uuid;
pub type PlayerId = Uuid;
pub type RoundId = Uuid;
pub type GuessEventId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum GameStatus {
    Waiting,       // Lobby, waiting for enough players
    WordSetting,   // Word-giver is choosing a word
    Guessing,      // Guesser is guessing letters
    RoundFinished, // Round won or lost, waiting for next round
    GameFinished,  // Final standings computed
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GameStatus::Waiting => "waiting",
            GameStatus::WordSetting => "word_setting",
            GameStatus::Guessing => "guessing",
            GameStatus::RoundFinished => "round_finished",
            GameStatus::GameFinished => "game_finished",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RoundStatus {
    InProgress,
    Won,
    Lost,
}

impl RoundStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, RoundStatus::InProgress)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Room {
    pub id: RoomId,
    pub room_code: String,
    pub game_status: GameStatus,
    pub round_number: u32,
    pub word_giver_id: Option<PlayerId>,
    pub guesser_id: Option<PlayerId>,
    pub current_word: Option<String>,
    pub hint: Option<String>,
    pub max_guesses: u32,
    pub created_at: String, // ISO 8601 string
}

impl Room {
    /// The role a player holds in the current round, if any.
    pub fn role_of(&self, player_id: PlayerId) -> Option<Role> {
        if self.word_giver_id == Some(player_id) {
            Some(Role::WordGiver)
        } else if self.guesser_id == Some(player_id) {
            Some(Role::Guesser)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    WordGiver,
    Guesser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Player {
    pub id: PlayerId,
    pub room_id: RoomId,
    pub name: String,
    pub score: u32,
    pub is_online: bool,
    pub is_creator: bool,
    pub joined_at: String, // ISO 8601 string
    pub last_seen: String, // ISO 8601 string
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Round {
    pub id: RoundId,
    pub room_id: RoomId,
    pub round_number: u32,
    pub word_giver_id: PlayerId,
    pub guesser_id: PlayerId,
    pub word: String,
    pub hint: Option<String>,
    pub guessed_letters: Vec<char>,
    pub wrong_guesses: u32,
    pub max_guesses: u32,
    pub status: RoundStatus,
    pub points_awarded: u32,
    pub created_at: String,           // ISO 8601 string
    pub completed_at: Option<String>, // ISO 8601 string
}

impl Round {
    pub fn has_guessed(&self, letter: char) -> bool {
        let letter = letter.to_ascii_uppercase();
        self.guessed_letters.contains(&letter)
    }

    /// The word with every unguessed letter replaced by `_`.
    pub fn masked_word(&self) -> String {
        self.word
            .chars()
            .map(|ch| if self.has_guessed(ch) { ch } else { '_' })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GuessEvent {
    pub id: GuessEventId,
    pub room_id: RoomId,
    pub player_id: PlayerId,
    pub letter: char,
    pub is_correct: bool,
    pub timestamp: String, // ISO 8601 string
}
