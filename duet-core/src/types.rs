use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client-supplied player identifier.
pub type PlayerId = String;

/// Six-character room identifier. Codes are case-insensitive and always
/// stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    pub const LEN: usize = 6;

    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Waiting,
    Active,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Clue,
    Guess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    ClueGiver,
    Guesser,
}

impl Role {
    pub fn swapped(self) -> Self {
        match self {
            Role::ClueGiver => Role::Guesser,
            Role::Guesser => Role::ClueGiver,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardType {
    Green,
    Neutral,
    Assassin,
}

/// One cell of a player's key map, aligned by `position` with the board words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub word: String,
    pub position: usize,
    pub card_type: CardType,
    pub revealed: bool,
}

/// A player's private answer key over the shared board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMap {
    pub player_id: PlayerId,
    pub cards: Vec<Card>,
}

impl KeyMap {
    pub fn count(&self, card_type: CardType) -> usize {
        self.cards
            .iter()
            .filter(|c| c.card_type == card_type)
            .count()
    }

    pub fn positions_of(&self, card_type: CardType) -> Vec<usize> {
        self.cards
            .iter()
            .filter(|c| c.card_type == card_type)
            .map(|c| c.position)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clue {
    pub word: String,
    pub number: u8,
}

/// How a single guess resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuessVerdict {
    Correct,
    Neutral,
    Assassin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameOutcome {
    Win,
    LossAssassin,
    LossTimeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndReason {
    AllWordsFound,
    AssassinFound,
    TooManyErrors,
    TurnsExhausted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerTally {
    pub player_id: PlayerId,
    pub join_order: usize,
    pub correct_guesses: u32,
}

/// Final record of a finished room. Written once, never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub outcome: GameOutcome,
    pub reason: EndReason,
    pub total_turns_played: u32,
    pub total_errors: u32,
    /// Ordered by join order.
    pub tallies: Vec<PlayerTally>,
    pub ended_at: DateTime<Utc>,
}

/// Everything an adapter needs to announce a resolved guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessOutcome {
    pub position: usize,
    pub outcome: GuessVerdict,
    pub card_type: CardType,
    pub status: RoomStatus,
    pub guesses_used: u32,
    pub guesses_allowed: u32,
    /// The guess ended the turn: a miss, or the clue allows no more guesses.
    pub turn_over: bool,
}
