mod presentation;

use std::error::Error;
use std::io;
use std::path::PathBuf;

use charlie::{GameEngine, Rule};
use charlie_drivers::{init_logger, load_config};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, about = "Plays Charlie Blackjack in the terminal", long_about = None)]
struct CommandLineArgs {
    /// The path of the config file. Defaults to ~/.charlie.yml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Deck seed, overriding the config file
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logger();
    let args = CommandLineArgs::parse();

    let config = load_config(args.config.as_deref())?;
    let rule: Rule = config.rule.try_into()?;
    let mut engine = match args.seed.or(config.table.seed) {
        Some(seed) => GameEngine::with_seed(&rule, seed)?,
        None => GameEngine::new(&rule)?,
    };

    println!(
        "Charlie Blackjack: {} cards win, dealer stands on {}",
        rule.charlie_limit, rule.dealer_stands_on
    );
    presentation::run(&mut engine, io::stdin().lock(), &mut io::stdout())?;
    Ok(())
}
