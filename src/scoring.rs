//! Card valuation. Scores are never stored; every query recomputes them from
//! the cards, so the same cards always give the same total.

use crate::{Card, DealerSoftening, Rank, Rule, BLACKJACK};

/// Ace counts 11, face cards 10, everything else its number.
pub fn rank_value(card: &Card) -> u8 {
    match card.rank {
        Rank::Ace => 11,
        Rank::Jack | Rank::Queen | Rank::King => 10,
        rank => rank.face_value(),
    }
}

/// Best total of the cards: the highest total not above 21 if any, otherwise
/// the lowest busting total.
pub fn best_score(cards: &[Card]) -> u8 {
    soften_while(cards, |total| total > BLACKJACK as u16)
}

/// Dealer total during her turn.
///
/// With [`DealerSoftening::ChasePlayer`] an Ace is also counted as 1 while the
/// dealer is above `dealer_stands_on` but below the player. A soft 18 against
/// a player on 20 becomes 8, and the dealer draws again.
pub fn dealer_score(cards: &[Card], player_score: u8, rule: &Rule) -> u8 {
    match rule.dealer_softening {
        DealerSoftening::Standard => best_score(cards),
        DealerSoftening::ChasePlayer => {
            let stands_on = rule.dealer_stands_on as u16;
            let player_score = player_score as u16;
            soften_while(cards, |total| {
                total > BLACKJACK as u16 || (total > stands_on && total < player_score)
            })
        }
    }
}

/// True when the best total still counts an Ace as 11.
pub fn is_soft(cards: &[Card]) -> bool {
    let hard: u16 = cards
        .iter()
        .map(|card| match card.rank {
            Rank::Ace => 1,
            _ => rank_value(card) as u16,
        })
        .sum();
    hard != best_score(cards) as u16
}

pub fn is_bust(cards: &[Card]) -> bool {
    best_score(cards) > BLACKJACK
}

/// Sums the cards with every Ace as 11, then counts one more Ace as 1 for as
/// long as `should_soften` holds and an Ace is left. Each Ace softens once.
fn soften_while(cards: &[Card], should_soften: impl Fn(u16) -> bool) -> u8 {
    let mut total: u16 = cards.iter().map(|card| rank_value(card) as u16).sum();
    let mut aces = cards.iter().filter(|card| card.rank.is_ace()).count();
    while aces > 0 && should_soften(total) {
        total -= 10;
        aces -= 1;
    }
    u8::try_from(total).unwrap_or(u8::MAX)
}
