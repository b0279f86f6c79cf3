use crate::config::{GameConfig, GameConfigOverrides};
use crate::error::{GameError, Result};
use crate::room::Room;
use crate::store::{InMemoryRoomStore, RoomStore, SharedRoom};
use crate::types::{Clue, GuessOutcome, RoomCode};
use crate::words::WordPool;
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Duration;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A resolved guess together with the room right after it.
#[derive(Debug, Clone)]
pub struct GuessResolution {
    pub outcome: GuessOutcome,
    pub room: Room,
}

#[derive(Debug, Clone)]
pub struct ClueSubmission {
    pub clue: Clue,
    pub room: Room,
}

/// Entry point for transport adapters. Each call resolves a room code,
/// runs one state machine operation under that room's lock and returns a
/// snapshot of the room.
pub struct RoomService {
    store: Arc<dyn RoomStore>,
    pool: WordPool,
    rng: Mutex<ChaCha8Rng>,
}

impl RoomService {
    pub fn new(store: Arc<dyn RoomStore>, pool: WordPool) -> Self {
        Self::with_rng(store, pool, ChaCha8Rng::from_entropy())
    }

    /// Deterministic service for tests and reproducible games.
    pub fn with_seed(store: Arc<dyn RoomStore>, pool: WordPool, seed: u64) -> Self {
        Self::with_rng(store, pool, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRoomStore::new()), WordPool::standard())
    }

    fn with_rng(store: Arc<dyn RoomStore>, pool: WordPool, rng: ChaCha8Rng) -> Self {
        Self {
            store,
            pool,
            rng: Mutex::new(rng),
        }
    }

    pub fn room_count(&self) -> usize {
        self.store.len()
    }

    pub fn create_room(&self, host_id: &str, overrides: &GameConfigOverrides) -> Result<Room> {
        let host_id = host_id.trim();
        if host_id.is_empty() {
            return Err(GameError::invalid_input("hostId is required"));
        }

        let config = GameConfig::with_overrides(overrides);
        config.validate(&self.pool)?;

        // Allocation and insertion both happen under the rng lock, so two
        // creations can never claim the same code.
        let mut rng = self.rng.lock();
        let code = self.allocate_code(&mut *rng);
        let room = Room::new(code.clone(), host_id, config);
        let snapshot = room.clone();
        self.store.put(code.clone(), Arc::new(Mutex::new(room)));

        tracing::info!("Created room {} for host {}", code, host_id);
        Ok(snapshot)
    }

    pub fn get_room(&self, code: &RoomCode) -> Result<Room> {
        let room = self.shared(code)?;
        let snapshot = room.lock().clone();
        Ok(snapshot)
    }

    pub fn join_room(&self, code: &RoomCode, player_id: &str, nickname: &str) -> Result<Room> {
        self.with_room(code, |room| {
            room.join(player_id, nickname)?;
            Ok(room.clone())
        })
    }

    pub fn start_game(&self, code: &RoomCode) -> Result<Room> {
        self.with_room(code, |room| {
            let mut rng = self.rng.lock();
            room.start(&self.pool, &mut *rng)?;
            Ok(room.clone())
        })
    }

    pub fn validate_clue(
        &self,
        code: &RoomCode,
        player_id: &str,
        word: &str,
        number: i64,
    ) -> Result<()> {
        self.with_room(code, |room| {
            room.validate_clue(player_id, word, number)?;
            Ok(())
        })
    }

    pub fn submit_clue(
        &self,
        code: &RoomCode,
        player_id: &str,
        word: &str,
        number: i64,
    ) -> Result<ClueSubmission> {
        self.with_room(code, |room| {
            let clue = room.submit_clue(player_id, word, number)?.clone();
            Ok(ClueSubmission {
                clue,
                room: room.clone(),
            })
        })
    }

    /// `Ok(None)` means the guess was not a legal action and nothing changed.
    pub fn process_guess(
        &self,
        code: &RoomCode,
        player_id: &str,
        position: usize,
    ) -> Result<Option<GuessResolution>> {
        self.with_room(code, |room| {
            Ok(room
                .process_guess(player_id, position)
                .map(|outcome| GuessResolution {
                    outcome,
                    room: room.clone(),
                }))
        })
    }

    pub fn should_end_turn(&self, code: &RoomCode) -> Result<bool> {
        self.with_room(code, |room| Ok(room.should_end_turn()))
    }

    pub fn next_turn(&self, code: &RoomCode) -> Result<Room> {
        self.with_room(code, |room| {
            room.next_turn()?;
            Ok(room.clone())
        })
    }

    /// Advance only if the room is still on `expected_turn`; `Ok(None)` when
    /// someone else already moved it on.
    pub fn next_turn_from(&self, code: &RoomCode, expected_turn: u32) -> Result<Option<Room>> {
        self.with_room(code, |room| {
            let advanced = room.next_turn_from(expected_turn)?;
            Ok(advanced.then(|| room.clone()))
        })
    }

    pub fn mark_connected(&self, code: &RoomCode, player_id: &str, connected: bool) -> Result<()> {
        self.with_room(code, |room| {
            if !room.set_connected(player_id, connected) {
                return Err(GameError::invalid_input(format!(
                    "player {} is not in room {}",
                    player_id, code
                )));
            }
            Ok(())
        })
    }

    pub fn record_heartbeat(&self, code: &RoomCode, player_id: &str) -> Result<()> {
        self.with_room(code, |room| {
            if !room.record_heartbeat(player_id) {
                return Err(GameError::invalid_input(format!(
                    "player {} is not in room {}",
                    player_id, code
                )));
            }
            Ok(())
        })
    }

    /// Remove rooms idle for longer than `max_age`, returning their codes.
    /// A room touched after the scan survives.
    pub fn sweep_stale(&self, max_age: Duration) -> Vec<RoomCode> {
        let stale = self.store.list_stale(max_age);
        let removed: Vec<RoomCode> = stale
            .into_iter()
            .filter(|code| self.store.delete_if_stale(code, max_age))
            .collect();

        if !removed.is_empty() {
            tracing::info!("Swept {} stale rooms", removed.len());
        }
        removed
    }

    fn shared(&self, code: &RoomCode) -> Result<SharedRoom> {
        self.store
            .get(code)
            .ok_or_else(|| GameError::RoomNotFound(code.clone()))
    }

    fn with_room<T>(&self, code: &RoomCode, f: impl FnOnce(&mut Room) -> Result<T>) -> Result<T> {
        let room = self.shared(code)?;
        let mut guard = room.lock();
        f(&mut guard)
    }

    fn allocate_code<R: Rng + ?Sized>(&self, rng: &mut R) -> RoomCode {
        loop {
            let code: String = (0..RoomCode::LEN)
                .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
                .collect();
            let code = RoomCode::new(code);
            if !self.store.contains(&code) {
                return code;
            }
        }
    }
}
