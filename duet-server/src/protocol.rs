//! Push-channel message envelopes. Every message carries a `type` tag;
//! payload fields are camelCase.

use duet_core::room::RoomView;
use duet_core::{CardType, Clue, ErrorKind, GameError, GameResult, GuessVerdict, PlayerId, RoomStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    Clue { clue_word: String, clue_number: i64 },
    #[serde(rename_all = "camelCase")]
    Guess { card_position: usize },
    NextTurn,
    Heartbeat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    RoomState {
        data: RoomView,
    },
    #[serde(rename_all = "camelCase")]
    ClueSubmitted {
        player_id: PlayerId,
        clue: Clue,
        room: RoomView,
    },
    #[serde(rename_all = "camelCase")]
    GuessResult {
        player_id: PlayerId,
        card_position: usize,
        outcome: GuessVerdict,
        card_type: CardType,
        game_status: RoomStatus,
        guesses_used: u32,
        guesses_allowed: u32,
        room: RoomView,
    },
    TurnSwitched {
        room: RoomView,
    },
    GameFinished {
        result: Option<GameResult>,
        room: RoomView,
    },
    Error {
        message: String,
        code: ErrorKind,
    },
    Pong,
}

impl ServerMessage {
    pub fn error(message: impl Into<String>, code: ErrorKind) -> Self {
        ServerMessage::Error {
            message: message.into(),
            code,
        }
    }
}

impl From<&GameError> for ServerMessage {
    fn from(err: &GameError) -> Self {
        ServerMessage::error(err.to_string(), err.kind())
    }
}
