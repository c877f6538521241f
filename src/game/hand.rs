use serde::{Deserialize, Serialize};

use crate::scoring;

use super::card::Card;

/// The cards held by one participant, in the order they were received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Hand {
        Hand {
            cards: Vec::with_capacity(5),
        }
    }

    pub fn receive_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn get_cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn best_score(&self) -> u8 {
        scoring::best_score(&self.cards)
    }

    pub fn is_bust(&self) -> bool {
        scoring::is_bust(&self.cards)
    }

    pub fn is_soft(&self) -> bool {
        scoring::is_soft(&self.cards)
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cards: Vec<String> = self.cards.iter().map(|card| card.to_string()).collect();
        write!(f, "{}", cards.join(" "))
    }
}

impl FromIterator<Card> for Hand {
    fn from_iter<T: IntoIterator<Item = Card>>(iter: T) -> Self {
        Hand {
            cards: iter.into_iter().collect(),
        }
    }
}
