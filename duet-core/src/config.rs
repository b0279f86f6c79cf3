use crate::error::{GameError, Result};
use crate::keymap::{ASSASSIN_COUNT, GREEN_PER_PLAYER};
use crate::words::WordPool;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub grid_size: usize,
    pub timer_seconds: u32, // advertised to clients, not enforced here
    pub max_errors: u32,
    pub max_turns: u32,
    pub word_pool_size: usize,
}

/// Partial configuration supplied when creating a room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfigOverrides {
    pub grid_size: Option<usize>,
    pub timer_seconds: Option<u32>,
    pub max_errors: Option<u32>,
    pub max_turns: Option<u32>,
    pub word_pool_size: Option<usize>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 5,
            timer_seconds: 30,
            max_errors: 3,
            max_turns: 9,
            word_pool_size: 100,
        }
    }
}

impl GameConfig {
    pub fn with_overrides(overrides: &GameConfigOverrides) -> Self {
        let defaults = Self::default();
        Self {
            grid_size: overrides.grid_size.unwrap_or(defaults.grid_size),
            timer_seconds: overrides.timer_seconds.unwrap_or(defaults.timer_seconds),
            max_errors: overrides.max_errors.unwrap_or(defaults.max_errors),
            max_turns: overrides.max_turns.unwrap_or(defaults.max_turns),
            word_pool_size: overrides.word_pool_size.unwrap_or(defaults.word_pool_size),
        }
    }

    /// Number of cards on the board. Only meaningful once `validate` passed.
    pub fn board_size(&self) -> usize {
        self.checked_board_size().unwrap_or(usize::MAX)
    }

    fn checked_board_size(&self) -> Option<usize> {
        self.grid_size.checked_mul(self.grid_size)
    }

    pub fn validate(&self, pool: &WordPool) -> Result<()> {
        let board_size = self.checked_board_size().ok_or_else(|| {
            GameError::config(format!("grid size {} is too large", self.grid_size))
        })?;

        let min_cards = GREEN_PER_PLAYER + ASSASSIN_COUNT;
        if board_size < min_cards {
            return Err(GameError::config(format!(
                "a {0}x{0} board has fewer than {1} cards",
                self.grid_size, min_cards
            )));
        }

        if self.word_pool_size < board_size {
            return Err(GameError::config(format!(
                "word pool size {} is smaller than the board ({} cards)",
                self.word_pool_size, board_size
            )));
        }

        if self.word_pool_size > pool.len() {
            return Err(GameError::config(format!(
                "word pool size {} exceeds the {} available words",
                self.word_pool_size,
                pool.len()
            )));
        }

        if self.max_errors == 0 {
            return Err(GameError::config("Max errors must be greater than 0"));
        }

        if self.max_turns == 0 {
            return Err(GameError::config("Max turns must be greater than 0"));
        }

        if self.timer_seconds == 0 {
            return Err(GameError::config("Timer must be greater than 0 seconds"));
        }

        Ok(())
    }
}
