use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;

use crate::{ClientMessage, ServerMessage};

pub const ROOM_CODE_LEN: usize = 6;
pub const ROOM_CODE_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const MAX_PLAYER_NAME_LEN: usize = 24;
pub const MIN_MAX_GUESSES: u32 = 1;
pub const MAX_MAX_GUESSES: u32 = 26;

static ROOM_CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z0-9]{6}$").expect("room code pattern is a valid regex")
});

pub fn is_valid_room_code(code: &str) -> bool {
    ROOM_CODE_PATTERN.is_match(code)
}

/// Trims and uppercases a client supplied room code.
pub fn normalize_room_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown message type '{0}'")]
    UnknownType(String),
    #[error("message type '{0}' requires a payload")]
    MissingPayload(&'static str),
    #[error("invalid field '{field}': {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Option<Value>,
}

impl ClientMessage {
    /// Parses a text frame into a validated, normalized command.
    pub fn decode(text: &str) -> Result<Self, CodecError> {
        let envelope: Envelope = serde_json::from_str(text)?;
        let payload = envelope.payload;

        let message = match envelope.kind.as_str() {
            "join_room" => ClientMessage::JoinRoom(required(payload, "join_room")?),
            "rejoin_room" => ClientMessage::RejoinRoom(required(payload, "rejoin_room")?),
            "start_game" => ClientMessage::StartGame(optional(payload)?),
            "set_word" => ClientMessage::SetWord(required(payload, "set_word")?),
            "guess_letter" => ClientMessage::GuessLetter(required(payload, "guess_letter")?),
            "start_round" => ClientMessage::StartRound,
            "end_game" => ClientMessage::EndGame,
            "leave_room" => ClientMessage::LeaveRoom,
            other => return Err(CodecError::UnknownType(other.to_string())),
        };

        message.normalized()
    }

    fn normalized(self) -> Result<Self, CodecError> {
        match self {
            ClientMessage::JoinRoom(mut payload) => {
                payload.player_name = player_name(&payload.player_name)?;
                payload.room_code = match (payload.is_creating, payload.room_code.as_deref()) {
                    (true, _) => None,
                    (false, Some(code)) => Some(room_code(code)?),
                    (false, None) => {
                        return Err(CodecError::InvalidField {
                            field: "roomCode",
                            reason: "required when joining an existing room",
                        });
                    }
                };
                Ok(ClientMessage::JoinRoom(payload))
            }
            ClientMessage::RejoinRoom(mut payload) => {
                payload.player_name = player_name(&payload.player_name)?;
                payload.room_code = room_code(&payload.room_code)?;
                Ok(ClientMessage::RejoinRoom(payload))
            }
            ClientMessage::StartGame(payload) => {
                if let Some(max_guesses) = payload.max_guesses {
                    if !(MIN_MAX_GUESSES..=MAX_MAX_GUESSES).contains(&max_guesses) {
                        return Err(CodecError::InvalidField {
                            field: "maxGuesses",
                            reason: "out of range",
                        });
                    }
                }
                Ok(ClientMessage::StartGame(payload))
            }
            ClientMessage::SetWord(mut payload) => {
                payload.word = payload.word.trim().to_string();
                if payload.word.is_empty() {
                    return Err(CodecError::InvalidField {
                        field: "word",
                        reason: "must not be empty",
                    });
                }
                payload.hint = payload
                    .hint
                    .map(|hint| hint.trim().to_string())
                    .filter(|hint| !hint.is_empty());
                Ok(ClientMessage::SetWord(payload))
            }
            ClientMessage::GuessLetter(mut payload) => {
                payload.letter = payload.letter.to_ascii_uppercase();
                Ok(ClientMessage::GuessLetter(payload))
            }
            other => Ok(other),
        }
    }
}

impl ServerMessage {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn required<T: DeserializeOwned>(
    payload: Option<Value>,
    kind: &'static str,
) -> Result<T, CodecError> {
    let value = payload.ok_or(CodecError::MissingPayload(kind))?;
    Ok(serde_json::from_value(value)?)
}

fn optional<T: DeserializeOwned + Default>(payload: Option<Value>) -> Result<T, CodecError> {
    match payload {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(T::default()),
    }
}

fn player_name(raw: &str) -> Result<String, CodecError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CodecError::InvalidField {
            field: "playerName",
            reason: "must not be empty",
        });
    }
    if name.chars().count() > MAX_PLAYER_NAME_LEN {
        return Err(CodecError::InvalidField {
            field: "playerName",
            reason: "too long",
        });
    }
    Ok(name.to_string())
}

fn room_code(raw: &str) -> Result<String, CodecError> {
    let code = normalize_room_code(raw);
    if !is_valid_room_code(&code) {
        return Err(CodecError::InvalidField {
            field: "roomCode",
            reason: "must be 6 characters from A-Z and 0-9",
        });
    }
    Ok(code)
}
