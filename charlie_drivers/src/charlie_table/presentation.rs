use std::io::{self, BufRead, Write};

use charlie::{Card, GameEngine, GameEventHandler, Hand, Outcome, Owner, RoundState, SeenCard};
use log::warn;
use rand::Rng;

/// Turns table events into lines of text for the terminal.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Vec<String>,
}

impl Transcript {
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

fn show(card: SeenCard) -> String {
    match card {
        SeenCard::FaceUp(card) => format!("[{}]", card),
        SeenCard::FaceDown => String::from("[##]"),
    }
}

pub fn banner(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::PlayerWins => "You Win!",
        Outcome::DealerWins => "You Lose!",
        Outcome::Draw => "It's a Draw!",
    }
}

impl GameEventHandler for Transcript {
    fn on_card_dealt(&mut self, owner: Owner, card: SeenCard) {
        self.lines.push(format!("{} gets {}", owner, show(card)));
    }

    fn on_hole_card_revealed(&mut self, card: Card) {
        self.lines.push(format!("Dealer reveals [{}]", card));
    }

    fn on_scores_updated(&mut self, player_score: u8, dealer_score: u8) {
        self.lines.push(format!(
            "Player: {}  Dealer: {}",
            player_score, dealer_score
        ));
    }

    fn on_round_resolved(&mut self, outcome: Outcome, player_hand: &Hand, _: &Hand) {
        if player_hand.is_bust() {
            self.lines.push(String::from("Bust!"));
        }
        self.lines.push(banner(outcome).to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Deal,
    Hit,
    Stand,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_lowercase().as_str() {
        "d" | "deal" => Some(Command::Deal),
        "h" | "hit" => Some(Command::Hit),
        "s" | "stand" => Some(Command::Stand),
        "q" | "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

fn prompt(state: RoundState) -> &'static str {
    match state {
        RoundState::PlayerTurn => "(h)it, (s)tand or (q)uit> ",
        _ => "(d)eal or (q)uit> ",
    }
}

/// Reads commands from `input` until it ends or the player quits.
pub fn run<R: Rng, I: BufRead, W: Write>(
    engine: &mut GameEngine<R>,
    input: I,
    output: &mut W,
) -> io::Result<()> {
    let mut transcript = Transcript::default();
    write!(output, "{}", prompt(engine.state()))?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        let result = match parse_command(&line) {
            Some(Command::Deal) => engine.deal(&mut transcript),
            Some(Command::Hit) => engine.hit(&mut transcript),
            Some(Command::Stand) => engine.stand(&mut transcript),
            Some(Command::Quit) => break,
            None => {
                writeln!(output, "Unknown command: {}", line.trim())?;
                Ok(())
            }
        };
        for text in transcript.take() {
            writeln!(output, "{}", text)?;
        }
        if let Err(err) = result {
            warn!("rejected command {:?}: {}", line.trim(), err);
            writeln!(output, "Not now: {}", err)?;
        }
        write!(output, "{}", prompt(engine.state()))?;
        output.flush()?;
    }
    writeln!(output)?;
    Ok(())
}
