mod simulation;

use std::error::Error;
use std::path::PathBuf;

use charlie::{GameEngine, Rule};
use charlie_drivers::{init_logger, load_config};
use clap::Parser;
use log::info;

#[derive(Debug, Parser)]
#[command(author, about = "Plays many rounds of Charlie Blackjack automatically", long_about = None)]
struct CommandLineArgs {
    /// The path of the config file. Defaults to ~/.charlie.yml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of rounds, overriding the config file
    #[arg(short, long)]
    rounds: Option<u64>,

    /// Deck seed, overriding the config file
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logger();
    let args = CommandLineArgs::parse();

    let config = load_config(args.config.as_deref())?;
    let rule: Rule = config.rule.try_into()?;
    let rounds = args.rounds.unwrap_or(config.simulator.rounds);
    let seed = args.seed.or(config.simulator.seed);
    info!("simulating {} rounds with {:?}", rounds, rule);

    let mut engine = match seed {
        Some(seed) => GameEngine::with_seed(&rule, seed)?,
        None => GameEngine::new(&rule)?,
    };
    let tally = simulation::simulate(&mut engine, rounds, config.simulator.player_stands_on)?;
    print!("{}", serde_yaml::to_string(&tally)?);
    Ok(())
}
