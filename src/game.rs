pub mod card;
pub mod deck;
pub mod hand;

use charlie_macros::allowed_state;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::{
    scoring, strategy::PlayerStrategy, Action, GameError, Outcome, RoundState, Rule, RuleError,
    BLACKJACK,
};

use self::{card::Card, deck::Deck, hand::Hand};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Dealer,
}

/// A card as the presentation may show it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeenCard {
    FaceUp(Card),
    FaceDown,
}

/// What the dealer does next during her turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealerMove {
    Draw,
    Resolve(Outcome),
}

/// The dealer's fixed policy, checked in this order:
/// 1. bust: player wins.
/// 2. standing total above the player's: dealer wins.
/// 3. standing total below the player's: player wins.
/// 4. standing total equal to the player's: draw.
/// 5. below `dealer_stands_on`: draw another card.
pub fn dealer_move(dealer_score: u8, player_score: u8, rule: &Rule) -> DealerMove {
    let stands_on = rule.dealer_stands_on;
    if dealer_score > BLACKJACK {
        DealerMove::Resolve(Outcome::PlayerWins)
    } else if dealer_score >= stands_on && dealer_score > player_score {
        DealerMove::Resolve(Outcome::DealerWins)
    } else if dealer_score >= stands_on && dealer_score < player_score {
        DealerMove::Resolve(Outcome::PlayerWins)
    } else if dealer_score >= stands_on && dealer_score == player_score {
        DealerMove::Resolve(Outcome::Draw)
    } else {
        DealerMove::Draw
    }
}

/// Plain comparison of final totals. Used when the dealer runs into the
/// Charlie limit before her policy settles the round.
pub fn compare_scores(player_score: u8, dealer_score: u8) -> Outcome {
    if player_score > BLACKJACK {
        Outcome::DealerWins
    } else if dealer_score > BLACKJACK || player_score > dealer_score {
        Outcome::PlayerWins
    } else if player_score < dealer_score {
        Outcome::DealerWins
    } else {
        Outcome::Draw
    }
}

/// One Charlie Blackjack table: a deck, the player's hand and the dealer's
/// hand, driven through rounds by `deal`, `hit` and `stand`.
///
/// Commands called in the wrong round state are rejected with
/// [`GameError::InvalidAction`] and change nothing.
#[derive(Debug)]
pub struct GameEngine<R: Rng = StdRng> {
    rule: Rule,
    state: RoundState,
    deck: Deck<R>,
    player_hand: Hand,
    dealer_hand: Hand,
    hole_card_revealed: bool,
}

impl GameEngine<StdRng> {
    pub fn new(rule: &Rule) -> Result<Self, RuleError> {
        Self::with_deck(rule, Deck::new(rule.reshuffle_policy))
    }

    /// Engine whose whole card sequence only depends on `seed`.
    pub fn with_seed(rule: &Rule, seed: u64) -> Result<Self, RuleError> {
        Self::with_deck(rule, Deck::with_seed(seed, rule.reshuffle_policy))
    }
}

impl<R: Rng> GameEngine<R> {
    pub fn with_deck(rule: &Rule, deck: Deck<R>) -> Result<Self, RuleError> {
        rule.validate()?;
        Ok(GameEngine {
            rule: *rule,
            state: RoundState::NotStarted,
            deck,
            player_hand: Hand::new(),
            dealer_hand: Hand::new(),
            hole_card_revealed: false,
        })
    }

    /// Starts a new round. Deals player, dealer, player, dealer; the dealer's
    /// second card stays face-down until the player stands.
    #[allowed_state(NotStarted, Resolved)]
    pub fn deal<U: GameEventHandler>(&mut self, handler: &mut U) -> Result<(), GameError> {
        self.new_round();
        for owner in [Owner::Player, Owner::Dealer, Owner::Player, Owner::Dealer] {
            self.deal_card_to(owner, handler);
        }
        self.state = RoundState::PlayerTurn;
        debug!(
            "dealt player [{}], dealer up card {:?}",
            self.player_hand,
            self.dealer_up_card()
        );

        self.publish_scores(handler);
        self.check_if_busted(handler);
        Ok(())
    }

    /// Gives the player one more card. A bust ends the round. Reaching the
    /// Charlie limit does not; the player still has to stand.
    #[allowed_state(PlayerTurn)]
    pub fn hit<U: GameEventHandler>(&mut self, handler: &mut U) -> Result<(), GameError> {
        let limit = self.rule.charlie_limit;
        if self.player_hand.len() >= limit as usize {
            return Err(GameError::HandOverflow { limit });
        }

        self.deal_card_to(Owner::Player, handler);
        self.publish_scores(handler);
        self.check_if_busted(handler);
        Ok(())
    }

    /// Ends the player's turn. Reveals the hole card and plays the dealer's
    /// whole turn before returning.
    #[allowed_state(PlayerTurn)]
    pub fn stand<U: GameEventHandler>(&mut self, handler: &mut U) -> Result<(), GameError> {
        self.state = RoundState::DealerTurn;
        self.reveal_hole_card(handler);
        let outcome = self.dealer_plays(handler);
        self.resolve(outcome, handler);
        Ok(())
    }

    /// Plays a full round: deals, hits while `strategy` asks for it and the
    /// hand is below the Charlie limit, then stands unless the player busted.
    pub fn autoplay_round<T: PlayerStrategy, U: GameEventHandler>(
        &mut self,
        strategy: &mut T,
        handler: &mut U,
    ) -> Result<Outcome, GameError> {
        self.deal(handler)?;
        while self.state == RoundState::PlayerTurn
            && self.player_hand.len() < self.rule.charlie_limit as usize
            && strategy.should_hit(&self.rule, &self.player_hand, self.dealer_up_card())
        {
            self.hit(handler)?;
        }
        if self.state == RoundState::PlayerTurn {
            self.stand(handler)?;
        }

        self.state.outcome().ok_or(GameError::InvalidAction {
            action: Action::Stand,
            state: self.state,
        })
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome()
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn player_hand(&self) -> &Hand {
        &self.player_hand
    }

    /// Every dealer card, the face-down one included.
    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer_hand
    }

    pub fn dealer_up_card(&self) -> Option<Card> {
        self.dealer_hand.get_cards().first().copied()
    }

    pub fn is_hole_card_revealed(&self) -> bool {
        self.hole_card_revealed
    }

    /// The dealer's cards with the hole card hidden until it is revealed.
    pub fn dealer_view(&self) -> Vec<SeenCard> {
        self.dealer_hand
            .get_cards()
            .iter()
            .enumerate()
            .map(|(i, card)| self.seen(Owner::Dealer, i, *card))
            .collect()
    }

    pub fn player_score(&self) -> u8 {
        self.player_hand.best_score()
    }

    /// Dealer score as the player may see it: only the face-up cards count
    /// while the hole card is hidden.
    pub fn dealer_score(&self) -> u8 {
        if self.hole_card_revealed {
            self.dealer_full_score()
        } else {
            let visible: Vec<Card> = self
                .dealer_view()
                .into_iter()
                .filter_map(|seen| match seen {
                    SeenCard::FaceUp(card) => Some(card),
                    SeenCard::FaceDown => None,
                })
                .collect();
            scoring::best_score(&visible)
        }
    }

    pub fn deck(&self) -> &Deck<R> {
        &self.deck
    }

    pub fn deck_mut(&mut self) -> &mut Deck<R> {
        &mut self.deck
    }

    fn new_round(&mut self) {
        self.deck.collect();
        self.player_hand.clear();
        self.dealer_hand.clear();
        self.hole_card_revealed = false;
        self.state = RoundState::NotStarted;
    }

    fn deal_card_to<U: GameEventHandler>(&mut self, owner: Owner, handler: &mut U) {
        let card = self.deck.draw();
        let hand = match owner {
            Owner::Player => &mut self.player_hand,
            Owner::Dealer => &mut self.dealer_hand,
        };
        hand.receive_card(card);
        let index = hand.len() - 1;
        let seen = self.seen(owner, index, card);
        debug!("{} receives {:?}", owner, seen);
        handler.on_card_dealt(owner, seen);
    }

    fn seen(&self, owner: Owner, index: usize, card: Card) -> SeenCard {
        if owner == Owner::Dealer && index == 1 && !self.hole_card_revealed {
            SeenCard::FaceDown
        } else {
            SeenCard::FaceUp(card)
        }
    }

    fn reveal_hole_card<U: GameEventHandler>(&mut self, handler: &mut U) {
        self.hole_card_revealed = true;
        if let Some(card) = self.dealer_hand.get_cards().get(1) {
            debug!("dealer reveals {}", card);
            handler.on_hole_card_revealed(*card);
        }
    }

    /// Dealer total over all her cards, for her own decisions.
    fn dealer_full_score(&self) -> u8 {
        scoring::dealer_score(
            self.dealer_hand.get_cards(),
            self.player_score(),
            &self.rule,
        )
    }

    fn dealer_plays<U: GameEventHandler>(&mut self, handler: &mut U) -> Outcome {
        let player_score = self.player_score();
        loop {
            self.publish_scores(handler);
            let dealer_score = self.dealer_full_score();
            match dealer_move(dealer_score, player_score, &self.rule) {
                DealerMove::Resolve(outcome) => {
                    debug!(
                        "dealer settles on {} against {}: {:?}",
                        dealer_score, player_score, outcome
                    );
                    return outcome;
                }
                DealerMove::Draw if self.dealer_hand.len() < self.rule.charlie_limit as usize => {
                    debug!("dealer draws on {}", dealer_score);
                    self.deal_card_to(Owner::Dealer, handler);
                }
                DealerMove::Draw => {
                    debug!(
                        "dealer reached {} cards on {}, comparing totals",
                        self.dealer_hand.len(),
                        dealer_score
                    );
                    return compare_scores(player_score, dealer_score);
                }
            }
        }
    }

    fn check_if_busted<U: GameEventHandler>(&mut self, handler: &mut U) {
        if self.player_hand.is_bust() {
            self.resolve(Outcome::DealerWins, handler);
        } else if self.dealer_full_score() > BLACKJACK {
            self.resolve(Outcome::PlayerWins, handler);
        }
    }

    fn publish_scores<U: GameEventHandler>(&self, handler: &mut U) {
        handler.on_scores_updated(self.player_score(), self.dealer_score());
    }

    fn resolve<U: GameEventHandler>(&mut self, outcome: Outcome, handler: &mut U) {
        self.state = RoundState::Resolved { outcome };
        info!(
            "round resolved: {:?} (player [{}] {}, dealer [{}] {})",
            outcome,
            self.player_hand,
            self.player_score(),
            self.dealer_hand,
            self.dealer_full_score()
        );
        handler.on_round_resolved(outcome, &self.player_hand, &self.dealer_hand);
    }
}

/// Receives what happens at the table, in order.
pub trait GameEventHandler {
    fn on_card_dealt(&mut self, owner: Owner, card: SeenCard);
    fn on_hole_card_revealed(&mut self, card: Card);
    fn on_scores_updated(&mut self, player_score: u8, dealer_score: u8);
    fn on_round_resolved(&mut self, outcome: Outcome, player_hand: &Hand, dealer_hand: &Hand);
}

impl GameEventHandler for () {
    fn on_card_dealt(&mut self, _: Owner, _: SeenCard) {}
    fn on_hole_card_revealed(&mut self, _: Card) {}
    fn on_scores_updated(&mut self, _: u8, _: u8) {}
    fn on_round_resolved(&mut self, _: Outcome, _: &Hand, _: &Hand) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    CardDealt { owner: Owner, card: SeenCard },
    HoleCardRevealed { card: Card },
    ScoresUpdated { player: u8, dealer: u8 },
    RoundResolved { outcome: Outcome },
}

/// Records events for a presentation that polls instead of reacting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Hands over the recorded events and starts a fresh log.
    pub fn take(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl GameEventHandler for EventLog {
    fn on_card_dealt(&mut self, owner: Owner, card: SeenCard) {
        self.events.push(GameEvent::CardDealt { owner, card });
    }

    fn on_hole_card_revealed(&mut self, card: Card) {
        self.events.push(GameEvent::HoleCardRevealed { card });
    }

    fn on_scores_updated(&mut self, player_score: u8, dealer_score: u8) {
        self.events.push(GameEvent::ScoresUpdated {
            player: player_score,
            dealer: dealer_score,
        });
    }

    fn on_round_resolved(&mut self, outcome: Outcome, _: &Hand, _: &Hand) {
        self.events.push(GameEvent::RoundResolved { outcome });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::ThresholdStrategy;
    use crate::{DealerSoftening, Rank, Suit};

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    fn stacked_engine(rule: &Rule, firsts: &[Card]) -> GameEngine {
        let mut engine = GameEngine::with_seed(rule, 1).unwrap();
        engine.deck_mut().stack(firsts).unwrap();
        engine
    }

    fn is_invalid_action(result: Result<(), GameError>, action: Action) -> bool {
        matches!(result, Err(GameError::InvalidAction { action: a, .. }) if a == action)
    }

    #[test]
    fn invalid_rule_is_rejected() {
        let rule = Rule {
            charlie_limit: 1,
            ..Default::default()
        };
        assert_eq!(
            GameEngine::with_seed(&rule, 0).err(),
            Some(RuleError::CharlieLimit(1))
        );
    }

    #[test]
    fn hit_and_stand_need_a_round() {
        let mut engine = GameEngine::with_seed(&Rule::default(), 0).unwrap();
        assert_eq!(engine.state(), RoundState::NotStarted);
        assert_eq!(
            engine.hit(&mut ()),
            Err(GameError::InvalidAction {
                action: Action::Hit,
                state: RoundState::NotStarted,
            })
        );
        assert!(is_invalid_action(engine.stand(&mut ()), Action::Stand));
        assert!(engine.player_hand().is_empty());
        assert_eq!(engine.deck().remaining(), 52);
    }

    #[test]
    fn deal_alternates_player_and_dealer() {
        let c1 = card(Rank::Four, Suit::Clubs);
        let c2 = card(Rank::Nine, Suit::Hearts);
        let c3 = card(Rank::Six, Suit::Spades);
        let c4 = card(Rank::King, Suit::Diamonds);
        let mut engine = stacked_engine(&Rule::default(), &[c1, c2, c3, c4]);
        let mut log = EventLog::new();
        engine.deal(&mut log).unwrap();

        assert_eq!(engine.state(), RoundState::PlayerTurn);
        assert_eq!(engine.player_hand().get_cards(), &[c1, c3]);
        assert_eq!(engine.dealer_hand().get_cards(), &[c2, c4]);
        assert_eq!(
            engine.dealer_view(),
            vec![SeenCard::FaceUp(c2), SeenCard::FaceDown]
        );
        assert_eq!(engine.player_score(), 10);
        assert_eq!(engine.dealer_score(), 9);
        assert_eq!(
            log.take(),
            vec![
                GameEvent::CardDealt {
                    owner: Owner::Player,
                    card: SeenCard::FaceUp(c1)
                },
                GameEvent::CardDealt {
                    owner: Owner::Dealer,
                    card: SeenCard::FaceUp(c2)
                },
                GameEvent::CardDealt {
                    owner: Owner::Player,
                    card: SeenCard::FaceUp(c3)
                },
                GameEvent::CardDealt {
                    owner: Owner::Dealer,
                    card: SeenCard::FaceDown
                },
                GameEvent::ScoresUpdated {
                    player: 10,
                    dealer: 9
                },
            ]
        );
    }

    #[test]
    fn deal_is_rejected_during_a_round() {
        let mut engine = GameEngine::with_seed(&Rule::default(), 4).unwrap();
        engine.deal(&mut ()).unwrap();
        let before = engine.player_hand().clone();
        assert_eq!(
            engine.deal(&mut ()),
            Err(GameError::InvalidAction {
                action: Action::Deal,
                state: RoundState::PlayerTurn,
            })
        );
        assert_eq!(engine.player_hand(), &before);
    }

    #[test]
    fn player_bust_ends_the_round() {
        let c1 = card(Rank::King, Suit::Hearts);
        let c2 = card(Rank::Nine, Suit::Clubs);
        let c3 = card(Rank::Queen, Suit::Spades);
        let c4 = card(Rank::Seven, Suit::Diamonds);
        let c5 = card(Rank::Five, Suit::Clubs);
        let mut engine = stacked_engine(&Rule::default(), &[c1, c2, c3, c4, c5]);
        let mut log = EventLog::new();
        engine.deal(&mut log).unwrap();
        engine.hit(&mut log).unwrap();

        assert_eq!(engine.player_hand().get_cards(), &[c1, c3, c5]);
        assert_eq!(engine.player_score(), 25);
        let resolved = RoundState::Resolved {
            outcome: Outcome::DealerWins,
        };
        assert_eq!(engine.state(), resolved);
        assert_eq!(
            log.events().last(),
            Some(&GameEvent::RoundResolved {
                outcome: Outcome::DealerWins
            })
        );

        assert_eq!(
            engine.hit(&mut log),
            Err(GameError::InvalidAction {
                action: Action::Hit,
                state: resolved,
            })
        );
        assert!(is_invalid_action(engine.stand(&mut log), Action::Stand));
        assert_eq!(engine.player_hand().len(), 3);
        assert!(!engine.is_hole_card_revealed());
    }

    #[test]
    fn five_cards_need_an_explicit_stand() {
        // Player 2C 3C 2D 3D 4C = 14, dealer KH 7H = 17.
        let firsts = [
            card(Rank::Two, Suit::Clubs),
            card(Rank::King, Suit::Hearts),
            card(Rank::Three, Suit::Clubs),
            card(Rank::Seven, Suit::Hearts),
            card(Rank::Two, Suit::Diamonds),
            card(Rank::Three, Suit::Diamonds),
            card(Rank::Four, Suit::Clubs),
        ];
        let mut engine = stacked_engine(&Rule::default(), &firsts);
        engine.deal(&mut ()).unwrap();
        for _ in 0..3 {
            engine.hit(&mut ()).unwrap();
        }
        assert_eq!(engine.player_hand().len(), 5);
        assert_eq!(engine.player_score(), 14);
        assert_eq!(engine.state(), RoundState::PlayerTurn);

        assert_eq!(engine.hit(&mut ()), Err(GameError::HandOverflow { limit: 5 }));
        assert_eq!(engine.player_hand().len(), 5);
        assert_eq!(engine.state(), RoundState::PlayerTurn);

        engine.stand(&mut ()).unwrap();
        assert_eq!(engine.outcome(), Some(Outcome::DealerWins));
        assert_eq!(engine.dealer_hand().len(), 2);
    }

    #[test]
    fn dealer_on_18_loses_to_20_without_drawing() {
        let firsts = [
            card(Rank::King, Suit::Hearts),
            card(Rank::King, Suit::Clubs),
            card(Rank::Queen, Suit::Hearts),
            card(Rank::Eight, Suit::Clubs),
        ];
        let mut engine = stacked_engine(&Rule::default(), &firsts);
        let mut log = EventLog::new();
        engine.deal(&mut log).unwrap();
        log.take();
        engine.stand(&mut log).unwrap();

        assert_eq!(engine.outcome(), Some(Outcome::PlayerWins));
        assert_eq!(engine.dealer_hand().len(), 2);
        assert_eq!(engine.dealer_score(), 18);
        assert_eq!(
            log.take(),
            vec![
                GameEvent::HoleCardRevealed {
                    card: card(Rank::Eight, Suit::Clubs)
                },
                GameEvent::ScoresUpdated {
                    player: 20,
                    dealer: 18
                },
                GameEvent::RoundResolved {
                    outcome: Outcome::PlayerWins
                },
            ]
        );
    }

    #[test]
    fn dealer_draws_below_17_and_can_draw_the_round() {
        let firsts = [
            card(Rank::Ten, Suit::Hearts),
            card(Rank::Ten, Suit::Clubs),
            card(Rank::Nine, Suit::Hearts),
            card(Rank::Six, Suit::Clubs),
            card(Rank::Three, Suit::Diamonds),
        ];
        let mut engine = stacked_engine(&Rule::default(), &firsts);
        engine.deal(&mut ()).unwrap();
        engine.stand(&mut ()).unwrap();

        assert_eq!(engine.dealer_hand().len(), 3);
        assert_eq!(engine.dealer_score(), 19);
        assert_eq!(engine.outcome(), Some(Outcome::Draw));
    }

    #[test]
    fn dealer_bust_gives_the_player_the_round() {
        let firsts = [
            card(Rank::Ten, Suit::Hearts),
            card(Rank::Ten, Suit::Clubs),
            card(Rank::Eight, Suit::Hearts),
            card(Rank::Six, Suit::Clubs),
            card(Rank::King, Suit::Diamonds),
        ];
        let mut engine = stacked_engine(&Rule::default(), &firsts);
        let mut log = EventLog::new();
        engine.deal(&mut log).unwrap();
        engine.stand(&mut log).unwrap();

        assert_eq!(engine.dealer_score(), 26);
        assert_eq!(engine.outcome(), Some(Outcome::PlayerWins));
        assert!(log.events().contains(&GameEvent::CardDealt {
            owner: Owner::Dealer,
            card: SeenCard::FaceUp(card(Rank::King, Suit::Diamonds)),
        }));
    }

    #[test]
    fn dealer_chases_player_with_soft_18() {
        // Player TH KH = 20, dealer AC 7C, then 2D.
        let firsts = [
            card(Rank::Ten, Suit::Hearts),
            card(Rank::Ace, Suit::Clubs),
            card(Rank::King, Suit::Hearts),
            card(Rank::Seven, Suit::Clubs),
            card(Rank::Two, Suit::Diamonds),
        ];
        let mut engine = stacked_engine(&Rule::default(), &firsts);
        engine.deal(&mut ()).unwrap();
        engine.stand(&mut ()).unwrap();
        assert_eq!(engine.dealer_hand().len(), 3);
        assert_eq!(engine.outcome(), Some(Outcome::Draw));

        let rule = Rule {
            dealer_softening: DealerSoftening::Standard,
            ..Default::default()
        };
        let mut engine = stacked_engine(&rule, &firsts);
        engine.deal(&mut ()).unwrap();
        engine.stand(&mut ()).unwrap();
        assert_eq!(engine.dealer_hand().len(), 2);
        assert_eq!(engine.outcome(), Some(Outcome::PlayerWins));
    }

    #[test]
    fn dealer_stopped_by_charlie_limit_compares_totals() {
        // Dealer 2C 3C 2D 3D 4C = 14 after reaching five cards.
        let dealer_cards = [
            card(Rank::Two, Suit::Clubs),
            card(Rank::Three, Suit::Clubs),
            card(Rank::Two, Suit::Diamonds),
            card(Rank::Three, Suit::Diamonds),
            card(Rank::Four, Suit::Clubs),
        ];
        let with_player = |first: Card, second: Card| {
            [
                first,
                dealer_cards[0],
                second,
                dealer_cards[1],
                dealer_cards[2],
                dealer_cards[3],
                dealer_cards[4],
            ]
        };

        let firsts = with_player(card(Rank::Ten, Suit::Hearts), card(Rank::King, Suit::Hearts));
        let mut engine = stacked_engine(&Rule::default(), &firsts);
        engine.deal(&mut ()).unwrap();
        engine.stand(&mut ()).unwrap();
        assert_eq!(engine.dealer_hand().len(), 5);
        assert_eq!(engine.dealer_score(), 14);
        assert_eq!(engine.outcome(), Some(Outcome::PlayerWins));

        let firsts = with_player(card(Rank::Ten, Suit::Hearts), card(Rank::Two, Suit::Hearts));
        let mut engine = stacked_engine(&Rule::default(), &firsts);
        engine.deal(&mut ()).unwrap();
        engine.stand(&mut ()).unwrap();
        assert_eq!(engine.dealer_hand().len(), 5);
        assert_eq!(engine.outcome(), Some(Outcome::DealerWins));
    }

    #[test]
    fn new_deal_resets_hands_and_discards_old_cards() {
        let mut engine = GameEngine::with_seed(&Rule::default(), 8).unwrap();
        engine.deal(&mut ()).unwrap();
        engine.stand(&mut ()).unwrap();
        assert!(engine.state().is_resolved());
        let used = engine.player_hand().len() + engine.dealer_hand().len();

        engine.deal(&mut ()).unwrap();
        assert_eq!(engine.state(), RoundState::PlayerTurn);
        assert_eq!(engine.player_hand().len(), 2);
        assert_eq!(engine.dealer_hand().len(), 2);
        assert!(!engine.is_hole_card_revealed());
        assert_eq!(engine.deck().discarded().len(), used);
        assert_eq!(engine.deck().in_play().len(), 4);
    }

    #[test]
    fn many_rounds_never_duplicate_cards_in_play() {
        let mut engine = GameEngine::with_seed(&Rule::default(), 99).unwrap();
        let mut strategy = ThresholdStrategy::default();
        for _ in 0..500 {
            engine.autoplay_round(&mut strategy, &mut ()).unwrap();
            let mut held: Vec<Card> = engine.player_hand().get_cards().to_vec();
            held.extend_from_slice(engine.dealer_hand().get_cards());
            let unique: std::collections::HashSet<Card> = held.iter().copied().collect();
            assert_eq!(unique.len(), held.len());
            assert!(engine.player_hand().len() <= 5);
            assert!(engine.dealer_hand().len() <= 5);
        }
    }

    #[test]
    fn autoplay_hits_until_threshold_then_stands() {
        let firsts = [
            card(Rank::Five, Suit::Clubs),
            card(Rank::Ten, Suit::Diamonds),
            card(Rank::Six, Suit::Clubs),
            card(Rank::Seven, Suit::Diamonds),
            card(Rank::Ten, Suit::Clubs),
        ];
        let mut engine = stacked_engine(&Rule::default(), &firsts);
        let outcome = engine
            .autoplay_round(&mut ThresholdStrategy { stands_on: 17 }, &mut ())
            .unwrap();
        assert_eq!(engine.player_score(), 21);
        assert_eq!(engine.player_hand().len(), 3);
        assert_eq!(outcome, Outcome::PlayerWins);
    }

    #[test]
    fn autoplay_never_hits_past_the_charlie_limit() {
        let firsts = [
            card(Rank::Two, Suit::Clubs),
            card(Rank::King, Suit::Hearts),
            card(Rank::Three, Suit::Clubs),
            card(Rank::Seven, Suit::Hearts),
            card(Rank::Two, Suit::Diamonds),
            card(Rank::Three, Suit::Diamonds),
            card(Rank::Four, Suit::Clubs),
        ];
        let mut engine = stacked_engine(&Rule::default(), &firsts);
        let outcome = engine
            .autoplay_round(&mut ThresholdStrategy { stands_on: 22 }, &mut ())
            .unwrap();
        assert_eq!(engine.player_hand().len(), 5);
        assert_eq!(outcome, Outcome::DealerWins);
    }

    #[test]
    fn dealer_policy_order() {
        let rule = Rule::default();
        assert_eq!(dealer_move(22, 20, &rule), DealerMove::Resolve(Outcome::PlayerWins));
        assert_eq!(dealer_move(19, 18, &rule), DealerMove::Resolve(Outcome::DealerWins));
        assert_eq!(dealer_move(18, 20, &rule), DealerMove::Resolve(Outcome::PlayerWins));
        assert_eq!(dealer_move(17, 17, &rule), DealerMove::Resolve(Outcome::Draw));
        assert_eq!(dealer_move(16, 20, &rule), DealerMove::Draw);
        assert_eq!(dealer_move(16, 12, &rule), DealerMove::Draw);
        assert_eq!(dealer_move(12, 12, &rule), DealerMove::Draw);
    }

    #[test]
    fn final_comparison() {
        assert_eq!(compare_scores(20, 14), Outcome::PlayerWins);
        assert_eq!(compare_scores(12, 14), Outcome::DealerWins);
        assert_eq!(compare_scores(14, 14), Outcome::Draw);
        assert_eq!(compare_scores(20, 23), Outcome::PlayerWins);
    }
}
