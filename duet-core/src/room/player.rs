use crate::types::{PlayerId, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Member of a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    id: PlayerId,
    nickname: String,
    role: Role,
    /// Green cards on this player's board found while they gave clues.
    correct_guesses: u32,
    join_order: usize,
    connected: bool,
    last_heartbeat: DateTime<Utc>,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, nickname: impl Into<String>, join_order: usize) -> Self {
        let role = if join_order == 0 {
            Role::ClueGiver
        } else {
            Role::Guesser
        };

        Self {
            id: id.into(),
            nickname: nickname.into(),
            role,
            correct_guesses: 0,
            join_order,
            connected: true,
            last_heartbeat: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn correct_guesses(&self) -> u32 {
        self.correct_guesses
    }

    pub fn join_order(&self) -> usize {
        self.join_order
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn last_heartbeat(&self) -> DateTime<Utc> {
        self.last_heartbeat
    }

    pub fn is_clue_giver(&self) -> bool {
        self.role == Role::ClueGiver
    }

    pub fn is_guesser(&self) -> bool {
        self.role == Role::Guesser
    }

    pub(crate) fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    pub(crate) fn set_nickname(&mut self, nickname: impl Into<String>) {
        self.nickname = nickname.into();
    }

    pub(crate) fn record_correct_guess(&mut self) {
        self.correct_guesses += 1;
    }

    pub(crate) fn reset_score(&mut self) {
        self.correct_guesses = 0;
    }

    pub(crate) fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub(crate) fn record_heartbeat(&mut self) {
        self.last_heartbeat = Utc::now();
        self.connected = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_follow_join_order() {
        assert_eq!(Player::new("a", "Ann", 0).role(), Role::ClueGiver);
        assert_eq!(Player::new("b", "Ben", 1).role(), Role::Guesser);
    }

    #[test]
    fn test_heartbeat_marks_connected() {
        let mut player = Player::new("a", "Ann", 0);
        let before = player.last_heartbeat();
        player.set_connected(false);
        player.record_heartbeat();
        assert!(player.is_connected());
        assert!(player.last_heartbeat() >= before);
    }
}
