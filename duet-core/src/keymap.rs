//! Key map generation.
//!
//! Both players share the same three assassin positions. Each player then
//! gets an independent set of nine green positions drawn from the cells that
//! are not assassins, so the green sets may overlap each other but never an
//! assassin. Every remaining cell is neutral.

use crate::error::{GameError, Result};
use crate::types::{Card, CardType, KeyMap, PlayerId};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

pub const GREEN_PER_PLAYER: usize = 9;
pub const ASSASSIN_COUNT: usize = 3;

pub fn generate_key_maps<R: Rng + ?Sized>(
    player_ids: [&PlayerId; 2],
    words: &[String],
    rng: &mut R,
) -> Result<HashMap<PlayerId, KeyMap>> {
    if player_ids[0] == player_ids[1] {
        return Err(GameError::invalid_input(
            "key maps need two distinct players",
        ));
    }

    let total = words.len();
    if total < GREEN_PER_PLAYER + ASSASSIN_COUNT {
        return Err(GameError::config(format!(
            "board of {} cards is too small for {} green and {} assassin cards",
            total, GREEN_PER_PLAYER, ASSASSIN_COUNT
        )));
    }

    let mut positions: Vec<usize> = (0..total).collect();
    positions.shuffle(rng);
    let (assassins, safe) = positions.split_at(ASSASSIN_COUNT);

    let mut key_maps = HashMap::with_capacity(2);
    for player_id in player_ids {
        let mut own = safe.to_vec();
        own.shuffle(rng);

        let mut cards: Vec<Card> = words
            .iter()
            .enumerate()
            .map(|(position, word)| Card {
                word: word.clone(),
                position,
                card_type: CardType::Neutral,
                revealed: false,
            })
            .collect();

        for &pos in &own[..GREEN_PER_PLAYER] {
            cards[pos].card_type = CardType::Green;
        }
        for &pos in assassins {
            cards[pos].card_type = CardType::Assassin;
        }

        key_maps.insert(
            player_id.clone(),
            KeyMap {
                player_id: player_id.clone(),
                cards,
            },
        );
    }

    Ok(key_maps)
}
