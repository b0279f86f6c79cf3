pub mod memory;

pub use memory::InMemoryRoomStore;

use crate::room::Room;
use crate::types::RoomCode;
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// A room behind its own lock. Every mutation of a room happens while
/// holding this mutex.
pub type SharedRoom = Arc<Mutex<Room>>;

/// Mapping from room code to room, safe to use from concurrent requests.
pub trait RoomStore: Send + Sync {
    fn get(&self, code: &RoomCode) -> Option<SharedRoom>;

    /// Insert or replace the room stored under `code`.
    fn put(&self, code: RoomCode, room: SharedRoom);

    /// Returns whether a room was removed.
    fn delete(&self, code: &RoomCode) -> bool;

    /// Codes of rooms idle for longer than `max_age`.
    fn list_stale(&self, max_age: Duration) -> Vec<RoomCode>;

    /// Remove the room only if it is still idle for longer than `max_age`
    /// once its lock is held. The room lock is taken before the map lock.
    fn delete_if_stale(&self, code: &RoomCode, max_age: Duration) -> bool {
        let Some(room) = self.get(code) else {
            return false;
        };
        let guard = room.lock();
        if !guard.is_stale(max_age, Utc::now()) {
            return false;
        }
        self.delete(code)
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, code: &RoomCode) -> bool {
        self.get(code).is_some()
    }
}
