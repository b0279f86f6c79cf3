use super::{RoomStore, SharedRoom};
use crate::types::RoomCode;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;

/// Process-lifetime room store.
#[derive(Default)]
pub struct InMemoryRoomStore {
    rooms: RwLock<HashMap<RoomCode, SharedRoom>>,
}

impl InMemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoomStore for InMemoryRoomStore {
    fn get(&self, code: &RoomCode) -> Option<SharedRoom> {
        self.rooms.read().get(code).cloned()
    }

    fn put(&self, code: RoomCode, room: SharedRoom) {
        let mut rooms = self.rooms.write();
        rooms.insert(code, room);
    }

    fn delete(&self, code: &RoomCode) -> bool {
        let removed = self.rooms.write().remove(code).is_some();
        if removed {
            tracing::debug!("Removed room {} from store", code);
        }
        removed
    }

    fn list_stale(&self, max_age: Duration) -> Vec<RoomCode> {
        // Snapshot the handles first so no room lock is taken under the map lock.
        let rooms: Vec<(RoomCode, SharedRoom)> = {
            let rooms = self.rooms.read();
            rooms
                .iter()
                .map(|(code, room)| (code.clone(), room.clone()))
                .collect()
        };

        let now = Utc::now();
        rooms
            .into_iter()
            .filter(|(_, room)| room.lock().is_stale(max_age, now))
            .map(|(code, _)| code)
            .collect()
    }

    fn len(&self) -> usize {
        self.rooms.read().len()
    }
}
