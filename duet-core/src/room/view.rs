//! Player-scoped room snapshots.
//!
//! A card's type is disclosed when the card is revealed, or when the card
//! sits on the viewer's own key map and the viewer is currently giving
//! clues. Nothing else about an unrevealed card leaves the server.

use super::Room;
use crate::config::GameConfig;
use crate::types::{CardType, Clue, GameResult, Phase, PlayerId, Role, RoomCode, RoomStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub word: String,
    pub position: usize,
    pub revealed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_type: Option<CardType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMapView {
    pub player_id: PlayerId,
    pub cards: Vec<CardView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub player_id: PlayerId,
    pub nickname: String,
    pub role: Role,
    pub correct_guesses: u32,
    pub join_order: usize,
    pub connected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomView {
    pub room_code: RoomCode,
    pub host_id: PlayerId,
    pub status: RoomStatus,
    pub viewer_id: Option<PlayerId>,
    pub players: Vec<PlayerView>,
    pub words: Vec<String>,
    pub key_maps: Vec<KeyMapView>,
    pub current_turn: u32,
    pub turns_remaining: u32,
    pub current_phase: Phase,
    pub active_player_id: Option<PlayerId>,
    pub errors_remaining: u32,
    pub revealed_cards: Vec<usize>,
    pub guesses_this_turn: u32,
    pub guess_count_allowed: u32,
    pub clue_given: Option<Clue>,
    pub result: Option<GameResult>,
    pub config: GameConfig,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Room {
    /// Snapshot as seen by `viewer`. `None` is an outside observer and sees
    /// only revealed card types.
    pub fn view_for(&self, viewer: Option<&str>) -> RoomView {
        let viewer_gives_clues = viewer
            .and_then(|id| self.player(id))
            .map_or(false, |p| p.is_clue_giver());

        // join order keeps the boards in a stable order for clients
        let key_maps = self
            .players
            .iter()
            .filter_map(|p| self.key_maps.get(p.id()))
            .map(|key_map| {
                let sees_key = viewer_gives_clues && viewer == Some(key_map.player_id.as_str());
                KeyMapView {
                    player_id: key_map.player_id.clone(),
                    cards: key_map
                        .cards
                        .iter()
                        .map(|card| CardView {
                            word: card.word.clone(),
                            position: card.position,
                            revealed: card.revealed,
                            card_type: (card.revealed || sees_key).then_some(card.card_type),
                        })
                        .collect(),
                }
            })
            .collect();

        RoomView {
            room_code: self.code.clone(),
            host_id: self.host_id.clone(),
            status: self.status,
            viewer_id: viewer.map(str::to_string),
            players: self
                .players
                .iter()
                .map(|p| PlayerView {
                    player_id: p.id().to_string(),
                    nickname: p.nickname().to_string(),
                    role: p.role(),
                    correct_guesses: p.correct_guesses(),
                    join_order: p.join_order(),
                    connected: p.is_connected(),
                })
                .collect(),
            words: self.words.clone(),
            key_maps,
            current_turn: self.current_turn,
            turns_remaining: self.turns_remaining(),
            current_phase: self.phase,
            active_player_id: self.active_player_id.clone(),
            errors_remaining: self.errors_remaining,
            revealed_cards: self.revealed_cards.clone(),
            guesses_this_turn: self.guesses_this_turn,
            guess_count_allowed: self.guess_count_allowed,
            clue_given: self.clue.clone(),
            result: self.result.clone(),
            config: self.config.clone(),
            created_at: self.created_at,
            last_activity: self.last_activity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::WordPool;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn started_room() -> Room {
        let mut room = Room::new(RoomCode::new("VIEW01"), "alice", GameConfig::default());
        room.join("alice", "Alice").unwrap();
        room.join("bob", "Bob").unwrap();
        room.start(&WordPool::standard(), &mut ChaCha8Rng::seed_from_u64(5))
            .unwrap();
        room
    }

    fn board<'a>(view: &'a RoomView, player_id: &str) -> &'a KeyMapView {
        view.key_maps
            .iter()
            .find(|k| k.player_id == player_id)
            .unwrap()
    }

    fn disclosed(key_map: &KeyMapView) -> usize {
        key_map
            .cards
            .iter()
            .filter(|c| c.card_type.is_some())
            .count()
    }

    #[test]
    fn test_clue_giver_sees_only_own_key() {
        let room = started_room();
        let view = room.view_for(Some("alice"));

        assert_eq!(disclosed(board(&view, "alice")), 25);
        assert_eq!(disclosed(board(&view, "bob")), 0);
    }

    #[test]
    fn test_guesser_sees_no_unrevealed_types() {
        let room = started_room();
        let view = room.view_for(Some("bob"));

        assert_eq!(disclosed(board(&view, "alice")), 0);
        assert_eq!(disclosed(board(&view, "bob")), 0);
    }

    #[test]
    fn test_revealed_cards_are_disclosed_to_everyone() {
        let mut room = started_room();
        room.submit_clue("alice", "animal", 2).unwrap();
        let pos = room
            .key_map("bob")
            .unwrap()
            .cards
            .iter()
            .find(|c| c.card_type == CardType::Neutral)
            .unwrap()
            .position;
        room.process_guess("bob", pos).unwrap();

        for viewer in [None, Some("alice"), Some("bob")] {
            let view = room.view_for(viewer);
            for key_map in &view.key_maps {
                assert!(key_map.cards[pos].revealed);
                assert!(key_map.cards[pos].card_type.is_some());
            }
        }

        let anonymous = room.view_for(None);
        assert_eq!(disclosed(board(&anonymous, "alice")), 1);
        assert_eq!(disclosed(board(&anonymous, "bob")), 1);
    }

    #[test]
    fn test_roles_swap_changes_disclosure() {
        let mut room = started_room();
        room.next_turn().unwrap();

        let view = room.view_for(Some("bob"));
        assert_eq!(disclosed(board(&view, "bob")), 25);
        assert_eq!(disclosed(board(&room.view_for(Some("alice")), "alice")), 0);
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let room = started_room();
        let json = serde_json::to_value(room.view_for(None)).unwrap();

        assert_eq!(json["roomCode"], "VIEW01");
        assert_eq!(json["status"], "ACTIVE");
        assert_eq!(json["currentPhase"], "CLUE");
        assert_eq!(json["turnsRemaining"], 9);
        assert!(json["keyMaps"][0]["cards"][0].get("cardType").is_none());
    }
}
