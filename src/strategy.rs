use crate::{Card, Hand, Rule};

/// Decides the player's moves when a round is played automatically.
pub trait PlayerStrategy {
    /// Called while the player may still hit. Returning false stands.
    fn should_hit(&mut self, rule: &Rule, player_hand: &Hand, dealer_up_card: Option<Card>)
        -> bool;
}

/// Hits until the player's best score reaches `stands_on`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdStrategy {
    pub stands_on: u8,
}

impl Default for ThresholdStrategy {
    fn default() -> Self {
        ThresholdStrategy { stands_on: 17 }
    }
}

impl PlayerStrategy for ThresholdStrategy {
    fn should_hit(&mut self, _: &Rule, player_hand: &Hand, _: Option<Card>) -> bool {
        player_hand.best_score() < self.stands_on
    }
}
