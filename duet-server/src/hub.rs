use crate::protocol::ServerMessage;
use duet_core::room::RoomView;
use duet_core::{PlayerId, Room, RoomCode};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

pub type Outbox = mpsc::UnboundedSender<ServerMessage>;

struct Connection {
    id: Uuid,
    tx: Outbox,
}

/// Live push-channel connections, one per player per room.
#[derive(Default)]
pub struct Hub {
    rooms: RwLock<HashMap<RoomCode, HashMap<PlayerId, Connection>>>,
    sequencers: Mutex<HashMap<RoomCode, Arc<Mutex<()>>>>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `tx` as the player's connection, replacing any older one.
    pub fn register(&self, code: &RoomCode, player_id: &str, tx: Outbox) -> Uuid {
        let id = Uuid::new_v4();
        let mut rooms = self.rooms.write();
        let previous = rooms
            .entry(code.clone())
            .or_default()
            .insert(player_id.to_string(), Connection { id, tx });

        if previous.is_some() {
            tracing::debug!("Replaced connection of {} in room {}", player_id, code);
        }
        id
    }

    /// Remove the connection only if `id` is still the current one. Returns
    /// whether it was removed.
    pub fn unregister(&self, code: &RoomCode, player_id: &str, id: Uuid) -> bool {
        let mut rooms = self.rooms.write();
        let Some(players) = rooms.get_mut(code) else {
            return false;
        };

        if players.get(player_id).map(|c| c.id) != Some(id) {
            return false;
        }
        players.remove(player_id);
        if players.is_empty() {
            rooms.remove(code);
        }
        true
    }

    pub fn drop_room(&self, code: &RoomCode) {
        self.sequencers.lock().remove(code);
        if self.rooms.write().remove(code).is_some() {
            tracing::debug!("Dropped connections of room {}", code);
        }
    }

    /// Run a room mutation and its broadcasts as one step. Steps on the same
    /// room never interleave, so every connection sees snapshots in the order
    /// the room changed. Taken before the room lock.
    pub fn sequence<T>(&self, code: &RoomCode, step: impl FnOnce() -> T) -> T {
        let sequencer = self
            .sequencers
            .lock()
            .entry(code.clone())
            .or_default()
            .clone();
        let _guard = sequencer.lock();
        step()
    }

    pub fn connection_count(&self, code: &RoomCode) -> usize {
        self.rooms.read().get(code).map_or(0, HashMap::len)
    }

    /// Send every connected player of `room` a message built around that
    /// player's own view.
    pub fn broadcast_with<F>(&self, room: &Room, build: F)
    where
        F: Fn(RoomView) -> ServerMessage,
    {
        let targets: Vec<(PlayerId, Outbox)> = match self.rooms.read().get(room.code()) {
            Some(players) => players
                .iter()
                .map(|(id, conn)| (id.clone(), conn.tx.clone()))
                .collect(),
            None => return,
        };

        for (player_id, tx) in targets {
            let message = build(room.view_for(Some(player_id.as_str())));
            if tx.send(message).is_err() {
                tracing::debug!("Connection of {} in room {} is closed", player_id, room.code());
            }
        }
    }

    pub fn push_state(&self, room: &Room) {
        self.broadcast_with(room, |data| ServerMessage::RoomState { data });
    }

    /// Announce a turn change, or the end of the game if the change finished it.
    pub fn announce_turn(&self, room: &Room) {
        if room.is_finished() {
            let result = room.result().cloned();
            self.broadcast_with(room, |view| ServerMessage::GameFinished {
                result: result.clone(),
                room: view,
            });
        } else {
            self.broadcast_with(room, |room| ServerMessage::TurnSwitched { room });
        }
    }
}
