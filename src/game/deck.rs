use std::collections::HashSet;

use log::{trace, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::ReshufflePolicy;

use super::card::Card;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("card {0} appears more than once")]
    DuplicateCard(Card),
}

/// A single 52-card deck. Cards are drawn from the back of the sequence.
///
/// Every drawn card is remembered as in play until [`Deck::collect`] moves it
/// to the discard pile, so a reshuffle can leave the cards held by the hands
/// out of the rebuilt deck.
#[derive(Debug, Clone)]
pub struct Deck<R: Rng = StdRng> {
    cards: Vec<Card>,
    in_play: Vec<Card>,
    discards: Vec<Card>,
    policy: ReshufflePolicy,
    rng: R,
}

impl Deck<StdRng> {
    /// Creates a shuffled deck seeded from the operating system.
    pub fn new(policy: ReshufflePolicy) -> Self {
        Self::with_rng(StdRng::from_entropy(), policy)
    }

    /// Creates a shuffled deck whose order only depends on `seed`.
    pub fn with_seed(seed: u64, policy: ReshufflePolicy) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), policy)
    }
}

impl<R: Rng> Deck<R> {
    pub fn with_rng(rng: R, policy: ReshufflePolicy) -> Self {
        let mut deck = Deck {
            cards: Self::build(),
            in_play: Vec::new(),
            discards: Vec::new(),
            policy,
            rng,
        };
        deck.shuffle();
        deck
    }

    /// The full set in canonical order.
    pub fn build() -> Vec<Card> {
        Card::full_set()
    }

    /// Permutes the remaining cards with the Durstenfeld variant of
    /// Fisher-Yates: for i from the last index down to 1, swap i with a
    /// uniform j in [0, i].
    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut self.rng);
    }

    /// Rebuilds the deck according to the reshuffle policy and shuffles it.
    /// The discard pile goes back into the deck.
    pub fn reshuffle(&mut self) {
        self.discards.clear();
        self.cards = match self.policy {
            ReshufflePolicy::FreshDeck => Self::build(),
            ReshufflePolicy::ExcludeInPlay => {
                let held: HashSet<Card> = self.in_play.iter().copied().collect();
                let cards: Vec<Card> = Self::build()
                    .into_iter()
                    .filter(|card| !held.contains(card))
                    .collect();
                if cards.is_empty() {
                    warn!("every card is in play, rebuilding the full deck");
                    Self::build()
                } else {
                    cards
                }
            }
        };
        self.shuffle();
    }

    /// Removes and returns the last card. An empty deck is reshuffled first,
    /// so this never fails.
    pub fn draw(&mut self) -> Card {
        if self.cards.is_empty() {
            warn!(
                "deck exhausted with {} cards in play, reshuffling ({:?})",
                self.in_play.len(),
                self.policy
            );
            self.reshuffle();
        }
        let card = self.cards.pop().expect("a reshuffled deck is never empty");
        trace!("drew {}, {} left", card, self.cards.len());
        self.in_play.push(card);
        card
    }

    /// Moves every card in play to the discard pile. Called when the hands are
    /// cleared for a new round.
    pub fn collect(&mut self) {
        self.discards.append(&mut self.in_play);
    }

    /// Returns every card to the deck and shuffles so that `firsts` are drawn
    /// first, in the given order.
    pub fn stack(&mut self, firsts: &[Card]) -> Result<(), DeckError> {
        let mut seen = HashSet::with_capacity(firsts.len());
        for card in firsts {
            if !seen.insert(*card) {
                return Err(DeckError::DuplicateCard(*card));
            }
        }

        self.in_play.clear();
        self.discards.clear();
        self.cards = Self::build()
            .into_iter()
            .filter(|card| !seen.contains(card))
            .collect();
        self.shuffle();
        self.cards.extend(firsts.iter().rev());
        Ok(())
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn in_play(&self) -> &[Card] {
        &self.in_play
    }

    pub fn discarded(&self) -> &[Card] {
        &self.discards
    }

    pub fn policy(&self) -> ReshufflePolicy {
        self.policy
    }

    /// Next cards to be drawn, nearest first.
    pub fn preview_next_few_cards(&self, number: usize) -> Vec<Card> {
        self.cards.iter().rev().take(number).copied().collect()
    }
}
