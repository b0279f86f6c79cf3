use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_CLUE_NUMBER: i64 = 1;
pub const MAX_CLUE_NUMBER: i64 = 9;

/// First reason a clue was refused, checked in declaration order.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClueRejection {
    #[error("Game is not in progress")]
    GameNotActive,

    #[error("Not clue phase")]
    NotCluePhase,

    #[error("Not your turn")]
    NotYourTurn,

    #[error("Clue cannot be empty")]
    Empty,

    #[error("Clue must be a single word")]
    NotSingleWord,

    #[error("Clue cannot contain numbers")]
    ContainsDigit,

    #[error("Clue cannot be a word on the board")]
    OnBoard,

    #[error("Number must be between 1 and 9")]
    NumberOutOfRange,
}

/// Checks the clue text and number against the board, returning the
/// normalized (uppercase) clue word.
pub fn check_clue(
    word: &str,
    number: i64,
    board: &[String],
) -> std::result::Result<(String, u8), ClueRejection> {
    if word.trim().is_empty() {
        return Err(ClueRejection::Empty);
    }

    if word.chars().any(|c| c.is_whitespace() || c == '-') {
        return Err(ClueRejection::NotSingleWord);
    }

    if word.chars().any(|c| c.is_ascii_digit()) {
        return Err(ClueRejection::ContainsDigit);
    }

    let upper = word.to_uppercase();
    if board.iter().any(|w| w.to_uppercase() == upper) {
        return Err(ClueRejection::OnBoard);
    }

    if !(MIN_CLUE_NUMBER..=MAX_CLUE_NUMBER).contains(&number) {
        return Err(ClueRejection::NumberOutOfRange);
    }

    Ok((upper, number as u8))
}
