//! Duet core - room state machine for a two-player cooperative word game
//!
//! Two players share one board of words, each holding a private key map of
//! which words are green, neutral or assassin. They take turns giving
//! one-word clues and guessing on the partner's key. This crate owns the
//! rules; transports drive it through [`RoomService`].

pub mod config;
pub mod error;
pub mod keymap;
pub mod room;
pub mod service;
pub mod store;
pub mod types;
pub mod words;

pub use config::{GameConfig, GameConfigOverrides};
pub use error::{ErrorKind, GameError, Result};
pub use room::{ClueRejection, Room, RoomView};
pub use service::{ClueSubmission, GuessResolution, RoomService};
pub use store::{InMemoryRoomStore, RoomStore, SharedRoom};
pub use types::{
    CardType, Clue, EndReason, GameOutcome, GameResult, GuessOutcome, GuessVerdict, Phase,
    PlayerId, Role, RoomCode, RoomStatus,
};
pub use words::WordPool;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_room_setup() {
        let service = RoomService::in_memory();
        let room = service
            .create_room("host-1", &GameConfigOverrides::default())
            .unwrap();
        let code = room.code().clone();

        service.join_room(&code, "host-1", "Host").unwrap();
        service.join_room(&code, "guest-1", "Guest").unwrap();
        let room = service.start_game(&code).unwrap();

        assert_eq!(room.status(), RoomStatus::Active);
        assert_eq!(room.words().len(), 25);
    }
}
