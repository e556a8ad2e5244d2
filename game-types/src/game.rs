use crate::{GuessEvent, Player, PlayerId, Room, Round};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Denormalized view of one room, rebuilt from the store after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GameState {
    pub room: Room,
    pub players: Vec<Player>,  // Join order
    pub history: Vec<GuessEvent>, // Current round only
    pub rounds: Vec<Round>,    // Ordered by round number
    pub current_round: Option<Round>,
}

impl GameState {
    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn player_named(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    /// The snapshot as one player may see it. While a round is in progress
    /// only its word-giver receives the secret word; everyone else gets the
    /// masked form. Finished rounds are shown in full.
    pub fn view_for(&self, player_id: PlayerId) -> GameState {
        let mut view = self.clone();
        let Some(current) = &self.current_round else {
            return view;
        };
        if current.word_giver_id == player_id {
            return view;
        }

        let masked = current.masked_word();
        view.room.current_word = Some(masked.clone());
        for round in view
            .rounds
            .iter_mut()
            .chain(view.current_round.iter_mut())
            .filter(|round| round.id == current.id)
        {
            round.word = masked.clone();
        }
        view
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RoundEndReason {
    WordGuessed,
    MaxGuessesReached,
}

/// Attached to every snapshot produced by a letter guess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RoundEndCheck {
    pub round_ended: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub winner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub reason: Option<RoundEndReason>,
}

impl RoundEndCheck {
    pub fn continuing() -> Self {
        Self {
            round_ended: false,
            winner: None,
            reason: None,
        }
    }

    pub fn won_by(guesser_name: String) -> Self {
        Self {
            round_ended: true,
            winner: Some(guesser_name),
            reason: Some(RoundEndReason::WordGuessed),
        }
    }

    pub fn lost() -> Self {
        Self {
            round_ended: true,
            winner: None,
            reason: Some(RoundEndReason::MaxGuessesReached),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Standing {
    pub player_id: PlayerId,
    pub name: String,
    pub score: u32,
    pub rounds_as_guesser: u32,
    pub wins_as_guesser: u32,
    pub win_rate: f64,
}

/// Attached to the snapshot produced by `end_game`. `winner` is `None` on a draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FinalWinner {
    pub winner: Option<Player>,
    pub is_draw: bool,
    pub standings: Vec<Standing>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GameStateUpdate {
    #[serde(flatten)]
    pub state: GameState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub round_end_check: Option<RoundEndCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub final_winner: Option<FinalWinner>,
}

impl From<GameState> for GameStateUpdate {
    fn from(state: GameState) -> Self {
        Self {
            state,
            round_end_check: None,
            final_winner: None,
        }
    }
}

/// Read-only view of a room that never exposes the secret word of a round in progress.
/// Used for HTTP responses where spectators may be looking.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SafeGameState {
    pub room_code: String,
    pub game_status: crate::GameStatus,
    pub round_number: u32,
    pub max_guesses: u32,
    pub players: Vec<Player>,
    pub masked_word: Option<String>,
    pub hint: Option<String>,
    pub guessed_letters: Vec<char>,
    pub wrong_guesses: u32,
    pub completed_rounds: Vec<Round>,
}

impl From<&GameState> for SafeGameState {
    fn from(game_state: &GameState) -> Self {
        let current = game_state.current_round.as_ref();
        SafeGameState {
            room_code: game_state.room.room_code.clone(),
            game_status: game_state.room.game_status,
            round_number: game_state.room.round_number,
            max_guesses: game_state.room.max_guesses,
            players: game_state.players.clone(),
            masked_word: current.map(Round::masked_word),
            hint: game_state.room.hint.clone(),
            guessed_letters: current
                .map(|round| round.guessed_letters.clone())
                .unwrap_or_default(),
            wrong_guesses: current.map(|round| round.wrong_guesses).unwrap_or(0),
            completed_rounds: game_state
                .rounds
                .iter()
                .filter(|round| round.status.is_finished())
                .cloned()
                .collect(),
        }
    }
}
