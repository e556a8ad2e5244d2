use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::GameStateUpdate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct JoinRoomPayload {
    pub player_name: String,
    #[serde(default)]
    pub room_code: Option<String>,
    #[serde(default)]
    pub is_creating: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RejoinRoomPayload {
    pub player_name: String,
    pub room_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StartGamePayload {
    #[serde(default)]
    pub max_guesses: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SetWordPayload {
    pub word: String,
    #[serde(default)]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GuessLetterPayload {
    pub letter: char,
}

/// Inbound commands. Decoding goes through [`ClientMessage::decode`], which
/// also validates and normalizes every payload.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
#[ts(export)]
pub enum ClientMessage {
    JoinRoom(JoinRoomPayload),
    RejoinRoom(RejoinRoomPayload),
    StartGame(StartGamePayload),
    SetWord(SetWordPayload),
    GuessLetter(GuessLetterPayload),
    StartRound,
    EndGame,
    LeaveRoom,
}

impl ClientMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::JoinRoom(_) => "join_room",
            ClientMessage::RejoinRoom(_) => "rejoin_room",
            ClientMessage::StartGame(_) => "start_game",
            ClientMessage::SetWord(_) => "set_word",
            ClientMessage::GuessLetter(_) => "guess_letter",
            ClientMessage::StartRound => "start_round",
            ClientMessage::EndGame => "end_game",
            ClientMessage::LeaveRoom => "leave_room",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorPayload {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
#[ts(export)]
pub enum ServerMessage {
    GameStateUpdate(GameStateUpdate),
    Error(ErrorPayload),
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error(ErrorPayload {
            message: message.into(),
        })
    }

    pub fn state(update: impl Into<GameStateUpdate>) -> Self {
        ServerMessage::GameStateUpdate(update.into())
    }
}

impl From<crate::GameError> for ServerMessage {
    fn from(error: crate::GameError) -> Self {
        ServerMessage::error(error.to_string())
    }
}
