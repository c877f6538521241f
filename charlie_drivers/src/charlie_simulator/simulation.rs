use charlie::{
    strategy::ThresholdStrategy, Card, GameEngine, GameError, GameEventHandler, Hand, Outcome,
    Owner, SeenCard,
};
use log::{debug, info};
use rand::Rng;
use serde::Serialize;

/// Counts what happened over many rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub rounds: u64,
    pub player_wins: u64,
    pub dealer_wins: u64,
    pub draws: u64,
    pub player_busts: u64,
    pub dealer_busts: u64,
    /// Rounds where the player stood on the maximum number of cards.
    pub charlie_hands: u64,
    #[serde(skip)]
    charlie_limit: u8,
}

impl Tally {
    pub fn new(charlie_limit: u8) -> Self {
        Tally {
            charlie_limit,
            ..Default::default()
        }
    }

    pub fn player_win_rate(&self) -> f64 {
        if self.rounds == 0 {
            return 0.0;
        }
        self.player_wins as f64 / self.rounds as f64
    }
}

impl GameEventHandler for Tally {
    fn on_card_dealt(&mut self, _: Owner, _: SeenCard) {}

    fn on_hole_card_revealed(&mut self, _: Card) {}

    fn on_scores_updated(&mut self, _: u8, _: u8) {}

    fn on_round_resolved(&mut self, outcome: Outcome, player_hand: &Hand, dealer_hand: &Hand) {
        self.rounds += 1;
        match outcome {
            Outcome::PlayerWins => self.player_wins += 1,
            Outcome::DealerWins => self.dealer_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
        if player_hand.is_bust() {
            self.player_busts += 1;
            return;
        }
        if dealer_hand.is_bust() {
            self.dealer_busts += 1;
        }
        if player_hand.len() >= self.charlie_limit as usize {
            self.charlie_hands += 1;
        }
    }
}

/// Plays `rounds` rounds with a player hitting below `player_stands_on`.
pub fn simulate<R: Rng>(
    engine: &mut GameEngine<R>,
    rounds: u64,
    player_stands_on: u8,
) -> Result<Tally, GameError> {
    let mut strategy = ThresholdStrategy {
        stands_on: player_stands_on,
    };
    let mut tally = Tally::new(engine.rule().charlie_limit);
    for round in 1..=rounds {
        engine.autoplay_round(&mut strategy, &mut tally)?;
        if round % 1000 == 0 {
            debug!("{} rounds played, player win rate {:.4}", round, tally.player_win_rate());
        }
    }
    info!("simulation finished after {} rounds", tally.rounds);
    Ok(tally)
}
