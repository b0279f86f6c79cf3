//! Candidate board words.

use crate::error::{GameError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

const STANDARD_WORDS: &[&str] = &[
    "ACROBAT", "ADHESIVE", "ALARM", "ALCOHOL", "ANGEL", "ANGER", "ANGLE", "ANCHOR", "ANKLE",
    "ANSWER", "ANTELOPE", "ANVIL", "ARCADE", "ARCTIC", "ARGUMENT", "ARMY", "ARROW", "ARTERY",
    "ASTRONAUT", "ATHLETE", "ATLAS", "ATOM", "ATTORNEY", "AUDIENCE", "AUTUMN", "AVENUE",
    "AVOCADO", "AWARD", "AXLE", "BABOON", "BACKBONE", "BACON", "BACTERIA", "BADGE", "BADGER",
    "BAKER", "BALCONY", "BALLET", "BALLOON", "BAMBOO", "BANANA", "BANDAGE", "BANDIT", "BANJO",
    "BANNER", "BANQUET", "BARBER", "BARGAIN", "BATTERY", "BEACON", "BEARD", "BEETLE", "BELL",
    "BICYCLE", "BISCUIT", "BLANKET", "BLIZZARD", "BOTTLE", "BRIDGE", "BUCKET", "BUTTON",
    "CABIN", "CACTUS", "CAMEL", "CANDLE", "CANNON", "CANYON", "CAPTAIN", "CARPET", "CASTLE",
    "CATHEDRAL", "CELLAR", "CHAIN", "CHALK", "CHARIOT", "CHEESE", "CHIMNEY", "CIRCUS", "CLOCK",
    "CLOUD", "COMET", "COMPASS", "COPPER", "CORAL", "COTTON", "CRATER", "CROWN", "CRYSTAL",
    "DAGGER", "DESERT", "DIAMOND", "DINOSAUR", "DOLPHIN", "DRAGON", "DRUM", "EAGLE", "ECLIPSE",
    "ENGINE", "FALCON", "FEATHER", "FOREST", "FOSSIL", "FOUNTAIN", "GALAXY", "GARDEN", "GEYSER",
    "GLACIER", "GOBLIN", "HAMMER", "HARBOR", "HELMET", "HONEY", "ISLAND", "JUNGLE", "KETTLE",
    "LADDER", "LANTERN", "LIBRARY", "MAGNET", "MARBLE", "MIRROR", "MOUNTAIN", "NEEDLE",
    "ORCHESTRA", "PENGUIN", "PIANO", "PIRATE", "PYRAMID", "ROCKET", "SATURN", "SHADOW",
    "TELESCOPE", "THUNDER", "VOLCANO", "WHISTLE",
];

/// Fixed set of unique, uppercase candidate words.
#[derive(Debug, Clone)]
pub struct WordPool {
    words: Vec<String>,
}

impl WordPool {
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut normalized = Vec::new();

        for word in words {
            let word = word.as_ref().trim().to_uppercase();
            if word.is_empty() {
                return Err(GameError::config("word pool contains an empty word"));
            }
            if !seen.insert(word.clone()) {
                return Err(GameError::config(format!(
                    "word pool contains '{}' more than once",
                    word
                )));
            }
            normalized.push(word);
        }

        Ok(Self { words: normalized })
    }

    pub fn standard() -> Self {
        Self {
            words: STANDARD_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Draw `count` distinct words, in random order, from the first
    /// `pool_size` words of the pool.
    pub fn draw<R: Rng + ?Sized>(
        &self,
        count: usize,
        pool_size: usize,
        rng: &mut R,
    ) -> Result<Vec<String>> {
        let limit = pool_size.min(self.words.len());
        if count > limit {
            return Err(GameError::config(format!(
                "cannot draw {} words from a pool of {}",
                count, limit
            )));
        }

        let mut candidates = self.words[..limit].to_vec();
        let (chosen, _) = candidates.partial_shuffle(rng, count);
        Ok(chosen.to_vec())
    }
}

impl Default for WordPool {
    fn default() -> Self {
        Self::standard()
    }
}
