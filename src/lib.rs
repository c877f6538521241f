pub mod game;
pub mod scoring;
pub mod strategy;

use serde::{Deserialize, Serialize};
use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use strum_macros::Display;
use thiserror::Error;

pub use game::{
    card::{Card, Rank, Suit},
    deck::{Deck, DeckError},
    hand::Hand,
    EventLog, GameEngine, GameEvent, GameEventHandler, Owner, SeenCard,
};

/// Highest total that does not bust.
pub const BLACKJACK: u8 = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    /// Maximum number of cards in a hand (5 Card Charlie).
    pub charlie_limit: u8,
    /// The dealer keeps drawing below this total.
    pub dealer_stands_on: u8,
    pub reshuffle_policy: ReshufflePolicy,
    pub dealer_softening: DealerSoftening,
}

impl Default for Rule {
    fn default() -> Self {
        Rule {
            charlie_limit: 5,
            dealer_stands_on: 17,
            reshuffle_policy: ReshufflePolicy::ExcludeInPlay,
            dealer_softening: DealerSoftening::ChasePlayer,
        }
    }
}

impl Rule {
    pub fn validate(&self) -> Result<(), RuleError> {
        if !(2..=11).contains(&self.charlie_limit) {
            return Err(RuleError::CharlieLimit(self.charlie_limit));
        }
        if !(2..=BLACKJACK).contains(&self.dealer_stands_on) {
            return Err(RuleError::DealerStandsOn(self.dealer_stands_on));
        }
        Ok(())
    }
}

/// What happens to the cards still held by the hands when the deck runs dry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_enum_str, Deserialize_enum_str)]
pub enum ReshufflePolicy {
    /// Rebuild the deck without the cards currently in play.
    ExcludeInPlay,
    /// Rebuild all 52 cards. A card in play can then be dealt a second time.
    FreshDeck,
}

/// How the dealer resolves Aces during her turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_enum_str, Deserialize_enum_str)]
pub enum DealerSoftening {
    /// Also count an Ace as 1 while the dealer stands above `dealer_stands_on`
    /// but still trails the player, so she keeps drawing instead of losing.
    ChasePlayer,
    /// Same Ace resolution as the player.
    Standard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    PlayerWins,
    DealerWins,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundState {
    #[default]
    NotStarted,
    PlayerTurn,
    DealerTurn,
    Resolved {
        outcome: Outcome,
    },
}

impl RoundState {
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            RoundState::Resolved { outcome } => Some(*outcome),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.outcome().is_some()
    }
}

/// Commands accepted by [`GameEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    Deal,
    Hit,
    Stand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("{action} is not allowed while the round is {state:?}")]
    InvalidAction { action: Action, state: RoundState },
    #[error("hand already holds {limit} cards")]
    HandOverflow { limit: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("charlie_limit must be in [2, 11], got {0}")]
    CharlieLimit(u8),
    #[error("dealer_stands_on must be in [2, 21], got {0}")]
    DealerStandsOn(u8),
}
