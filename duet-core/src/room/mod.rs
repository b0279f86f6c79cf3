//! The room aggregate and its state machine.
//!
//! `status` and `phase` together decide which operations are legal. Once a
//! room is `Finished` nothing mutates it again.

pub mod clue;
pub mod player;
pub mod view;

pub use clue::{check_clue, ClueRejection};
pub use player::Player;
pub use view::{CardView, KeyMapView, PlayerView, RoomView};

use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::keymap::{generate_key_maps, GREEN_PER_PLAYER};
use crate::types::{
    CardType, Clue, EndReason, GameOutcome, GameResult, GuessOutcome, GuessVerdict, KeyMap,
    Phase, PlayerId, PlayerTally, Role, RoomCode, RoomStatus,
};
use crate::words::WordPool;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

pub const MAX_PLAYERS: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    code: RoomCode,
    host_id: PlayerId,
    status: RoomStatus,
    config: GameConfig,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
    /// Join order.
    players: Vec<Player>,
    words: Vec<String>,
    key_maps: HashMap<PlayerId, KeyMap>,
    current_turn: u32,
    phase: Phase,
    active_player_id: Option<PlayerId>,
    errors_remaining: u32,
    revealed_cards: Vec<usize>,
    guesses_this_turn: u32,
    guess_count_allowed: u32,
    clue: Option<Clue>,
    result: Option<GameResult>,
}

impl Room {
    pub fn new(code: RoomCode, host_id: impl Into<PlayerId>, config: GameConfig) -> Self {
        let now = Utc::now();
        Self {
            code,
            host_id: host_id.into(),
            status: RoomStatus::Waiting,
            errors_remaining: config.max_errors,
            config,
            created_at: now,
            last_activity: now,
            players: Vec::with_capacity(MAX_PLAYERS),
            words: Vec::new(),
            key_maps: HashMap::new(),
            current_turn: 0,
            phase: Phase::Clue,
            active_player_id: None,
            revealed_cards: Vec::new(),
            guesses_this_turn: 0,
            guess_count_allowed: 0,
            clue: None,
            result: None,
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn host_id(&self) -> &str {
        &self.host_id
    }

    pub fn status(&self) -> RoomStatus {
        self.status
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == player_id)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn key_map(&self, player_id: &str) -> Option<&KeyMap> {
        self.key_maps.get(player_id)
    }

    pub fn current_turn(&self) -> u32 {
        self.current_turn
    }

    pub fn turns_remaining(&self) -> u32 {
        self.config.max_turns.saturating_sub(self.current_turn)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active_player_id(&self) -> Option<&str> {
        self.active_player_id.as_deref()
    }

    pub fn errors_remaining(&self) -> u32 {
        self.errors_remaining
    }

    pub fn revealed_cards(&self) -> &[usize] {
        &self.revealed_cards
    }

    pub fn is_revealed(&self, position: usize) -> bool {
        self.revealed_cards.contains(&position)
    }

    pub fn guesses_this_turn(&self) -> u32 {
        self.guesses_this_turn
    }

    pub fn guess_count_allowed(&self) -> u32 {
        self.guess_count_allowed
    }

    pub fn clue(&self) -> Option<&Clue> {
        self.clue.as_ref()
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.status == RoomStatus::Finished
    }

    pub fn guesser(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_guesser())
    }

    /// Whether the room has been idle for longer than `max_age` at `now`.
    pub fn is_stale(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        match (now - self.last_activity).to_std() {
            Ok(idle) => idle > max_age,
            Err(_) => false,
        }
    }

    /// Add a player. Joining again with a known id refreshes the nickname
    /// and marks the player connected.
    pub fn join(&mut self, player_id: &str, nickname: &str) -> Result<()> {
        let player_id = player_id.trim();
        let nickname = nickname.trim();
        if player_id.is_empty() || nickname.is_empty() {
            return Err(GameError::invalid_input(
                "playerId and nickname are required",
            ));
        }

        if let Some(existing) = self.players.iter_mut().find(|p| p.id() == player_id) {
            existing.set_nickname(nickname);
            existing.set_connected(true);
            tracing::info!("Player {} rejoined room {}", player_id, self.code);
            return Ok(());
        }

        if self.status != RoomStatus::Waiting || self.players.len() >= MAX_PLAYERS {
            return Err(GameError::RoomFull(self.code.clone()));
        }

        let join_order = self.players.len();
        self.players
            .push(Player::new(player_id, nickname, join_order));
        self.touch();

        tracing::info!(
            "Player {} joined room {} as player {}",
            player_id,
            self.code,
            join_order + 1
        );

        Ok(())
    }

    /// Deal the board and hand the first clue to the first joiner.
    pub fn start<R: Rng + ?Sized>(&mut self, pool: &WordPool, rng: &mut R) -> Result<()> {
        if self.status != RoomStatus::Waiting {
            return Err(GameError::invalid_state(format!(
                "room {} has already started",
                self.code
            )));
        }

        if self.players.len() != MAX_PLAYERS {
            return Err(GameError::NotReady(self.code.clone()));
        }

        let words = pool.draw(self.config.board_size(), self.config.word_pool_size, rng)?;
        let first = self.players[0].id().to_string();
        let second = self.players[1].id().to_string();
        let key_maps = generate_key_maps([&first, &second], &words, rng)?;

        self.words = words;
        self.key_maps = key_maps;
        for player in &mut self.players {
            let role = if player.join_order() == 0 {
                Role::ClueGiver
            } else {
                Role::Guesser
            };
            player.set_role(role);
            player.reset_score();
        }
        self.active_player_id = Some(self.players[0].id().to_string());
        self.status = RoomStatus::Active;
        self.phase = Phase::Clue;
        self.current_turn = 0;
        self.errors_remaining = self.config.max_errors;
        self.revealed_cards.clear();
        self.guesses_this_turn = 0;
        self.guess_count_allowed = 0;
        self.clue = None;
        self.touch();

        tracing::info!(
            "Room {} started with {} words",
            self.code,
            self.words.len()
        );
        Ok(())
    }

    pub fn validate_clue(
        &self,
        player_id: &str,
        word: &str,
        number: i64,
    ) -> std::result::Result<(String, u8), ClueRejection> {
        if self.status != RoomStatus::Active {
            return Err(ClueRejection::GameNotActive);
        }

        if self.phase != Phase::Clue {
            return Err(ClueRejection::NotCluePhase);
        }

        if self.active_player_id.as_deref() != Some(player_id) {
            return Err(ClueRejection::NotYourTurn);
        }

        check_clue(word, number, &self.words)
    }

    /// Record the clue and open the guess phase. Nothing changes on failure.
    pub fn submit_clue(&mut self, player_id: &str, word: &str, number: i64) -> Result<&Clue> {
        let (word, number) = self.validate_clue(player_id, word, number)?;

        self.phase = Phase::Guess;
        self.guesses_this_turn = 0;
        self.guess_count_allowed = u32::from(number);
        self.touch();

        tracing::info!(
            "Player {} gave clue {} {} in room {}",
            player_id,
            word,
            number,
            self.code
        );

        Ok(self.clue.insert(Clue { word, number }))
    }

    /// Resolve a guess against the guesser's own key map.
    ///
    /// Returns `None`, leaving the room untouched, when the guess is not a
    /// legal action right now: wrong status or phase, the player is not the
    /// guesser, the position is off the board, or it is already revealed.
    pub fn process_guess(&mut self, player_id: &str, position: usize) -> Option<GuessOutcome> {
        if self.status != RoomStatus::Active || self.phase != Phase::Guess {
            tracing::debug!(
                "Ignoring guess from {} in room {}: not guessing",
                player_id,
                self.code
            );
            return None;
        }

        if !self.player(player_id).map_or(false, Player::is_guesser) {
            tracing::debug!(
                "Ignoring guess from {} in room {}: not the guesser",
                player_id,
                self.code
            );
            return None;
        }

        let card_type = self.key_maps.get(player_id)?.cards.get(position)?.card_type;
        if self.is_revealed(position) {
            tracing::debug!(
                "Ignoring guess on revealed card {} in room {}",
                position,
                self.code
            );
            return None;
        }

        self.revealed_cards.push(position);
        for key_map in self.key_maps.values_mut() {
            if let Some(card) = key_map.cards.get_mut(position) {
                card.revealed = true;
            }
        }
        self.guesses_this_turn += 1;

        let verdict = match card_type {
            CardType::Assassin => {
                self.finish(
                    GameOutcome::LossAssassin,
                    EndReason::AssassinFound,
                    self.current_turn + 1,
                );
                GuessVerdict::Assassin
            }
            CardType::Green => {
                if let Some(clue_giver) = self.players.iter_mut().find(|p| p.is_clue_giver()) {
                    clue_giver.record_correct_guess();
                }
                if self.all_words_found() {
                    self.finish(
                        GameOutcome::Win,
                        EndReason::AllWordsFound,
                        self.current_turn + 1,
                    );
                }
                GuessVerdict::Correct
            }
            CardType::Neutral => {
                self.errors_remaining = self.errors_remaining.saturating_sub(1);
                if self.errors_remaining == 0 {
                    self.finish(
                        GameOutcome::LossTimeout,
                        EndReason::TooManyErrors,
                        self.current_turn + 1,
                    );
                }
                GuessVerdict::Neutral
            }
        };
        self.touch();

        tracing::info!(
            "Player {} guessed card {} in room {}: {:?}",
            player_id,
            position,
            self.code,
            verdict
        );

        Some(GuessOutcome {
            position,
            outcome: verdict,
            card_type,
            status: self.status,
            guesses_used: self.guesses_this_turn,
            guesses_allowed: self.guess_count_allowed,
            turn_over: verdict != GuessVerdict::Correct || self.should_end_turn(),
        })
    }

    pub fn should_end_turn(&self) -> bool {
        self.guesses_this_turn >= self.guess_count_allowed
    }

    /// Close the current turn and swap roles, or finish the game when the
    /// turn limit is reached.
    pub fn next_turn(&mut self) -> Result<()> {
        if self.status != RoomStatus::Active {
            return Err(GameError::invalid_state(format!(
                "room {} is not in progress",
                self.code
            )));
        }

        let turn = self.current_turn + 1;
        if turn >= self.config.max_turns {
            self.current_turn = turn;
            self.finish(GameOutcome::LossTimeout, EndReason::TurnsExhausted, turn);
            self.touch();
            return Ok(());
        }

        // This turn's guesser gives the next clue.
        let next = self
            .guesser()
            .map(|p| p.id().to_string())
            .ok_or_else(|| GameError::invalid_state("room has no guesser"))?;

        self.current_turn = turn;
        self.phase = Phase::Clue;
        self.guesses_this_turn = 0;
        self.guess_count_allowed = 0;
        self.clue = None;

        for player in &mut self.players {
            player.set_role(player.role().swapped());
        }
        self.active_player_id = Some(next);
        self.touch();

        tracing::info!(
            "Room {} moved to turn {}, clue giver {}",
            self.code,
            self.current_turn,
            self.active_player_id.as_deref().unwrap_or_default()
        );
        Ok(())
    }

    /// Like [`Room::next_turn`], but only if the room is still on
    /// `expected_turn`. Returns whether the turn advanced.
    pub fn next_turn_from(&mut self, expected_turn: u32) -> Result<bool> {
        if self.status == RoomStatus::Active && self.current_turn != expected_turn {
            tracing::debug!(
                "Room {} already past turn {}, skipping advance",
                self.code,
                expected_turn
            );
            return Ok(false);
        }

        self.next_turn().map(|_| true)
    }

    pub fn set_connected(&mut self, player_id: &str, connected: bool) -> bool {
        match self.players.iter_mut().find(|p| p.id() == player_id) {
            Some(player) => {
                player.set_connected(connected);
                true
            }
            None => false,
        }
    }

    pub fn record_heartbeat(&mut self, player_id: &str) -> bool {
        match self.players.iter_mut().find(|p| p.id() == player_id) {
            Some(player) => {
                player.record_heartbeat();
                true
            }
            None => false,
        }
    }

    fn all_words_found(&self) -> bool {
        self.players.len() == MAX_PLAYERS
            && self
                .players
                .iter()
                .all(|p| p.correct_guesses() as usize >= GREEN_PER_PLAYER)
    }

    fn finish(&mut self, outcome: GameOutcome, reason: EndReason, total_turns_played: u32) {
        self.status = RoomStatus::Finished;
        self.result = Some(GameResult {
            outcome,
            reason,
            total_turns_played,
            total_errors: self.config.max_errors - self.errors_remaining,
            tallies: self
                .players
                .iter()
                .map(|p| PlayerTally {
                    player_id: p.id().to_string(),
                    join_order: p.join_order(),
                    correct_guesses: p.correct_guesses(),
                })
                .collect(),
            ended_at: Utc::now(),
        });

        tracing::info!("Room {} finished: {:?} ({:?})", self.code, outcome, reason);
    }

    fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}
