use crate::GameStatus;
use thiserror::Error;

/// Every rejection a client can receive. The `Display` text is the exact
/// message sent back in an `error` frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Invalid message format")]
    InvalidMessageFormat,
    #[error("Room not found")]
    RoomNotFound,
    #[error("Room is full")]
    RoomFull,
    #[error("Player not found in this room")]
    PlayerNotFound,
    #[error("That name is already taken in this room")]
    NameTaken,
    #[error("You are not in a room")]
    NotInRoom,
    #[error("Need {required} players to start")]
    NotEnoughPlayers { required: usize },
    #[error("Not your turn to set the word")]
    NotYourTurnToSetWord,
    #[error("Not your turn to guess")]
    NotYourTurnToGuess,
    #[error("Letter already guessed")]
    LetterAlreadyGuessed,
    #[error("Guess must be a single letter (A-Z)")]
    InvalidLetter,
    #[error("Word must be 1-{max_len} letters (A-Z)")]
    InvalidWord { max_len: usize },
    #[error("No round is in progress")]
    NoActiveRound,
    #[error("Cannot {action} while the game is {current}")]
    InvalidGameState {
        action: &'static str,
        current: GameStatus,
    },
    #[error("Could not allocate a room code")]
    RoomCodeUnavailable,
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}
