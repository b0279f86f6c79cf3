use crate::room::ClueRejection;
use crate::types::RoomCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Room not found: {0}")]
    RoomNotFound(RoomCode),

    #[error("Room {0} is full")]
    RoomFull(RoomCode),

    #[error("Room {0} needs two players to start")]
    NotReady(RoomCode),

    #[error("Invalid clue: {0}")]
    InvalidClue(#[from] ClueRejection),

    #[error("Invalid game state: {0}")]
    InvalidState(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidInput(String),
}

impl GameError {
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::RoomNotFound(_) => ErrorKind::NotFound,
            GameError::RoomFull(_) => ErrorKind::RoomFull,
            GameError::NotReady(_) => ErrorKind::NotReady,
            GameError::InvalidClue(_)
            | GameError::InvalidState(_)
            | GameError::Config(_)
            | GameError::InvalidInput(_) => ErrorKind::Validation,
        }
    }
}

/// Machine-readable failure category reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    RoomFull,
    NotReady,
    Validation,
    /// A guess whose preconditions did not hold. The core reports these as
    /// `None`; adapters that must answer something use this code.
    IllegalAction,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::RoomFull => "ROOM_FULL",
            ErrorKind::NotReady => "NOT_READY",
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::IllegalAction => "ILLEGAL_ACTION",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
