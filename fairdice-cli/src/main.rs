mod commands;
mod config;
mod console;
mod render;

use clap::{Parser, Subcommand};
use config::CliConfig;
use fairdice_core::GameError;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE_HINT: &str = "Example: fairdice play 2,2,4,4,9,9 1,1,6,6,8,8 3,3,5,5,7,7
Dice starting with a negative face go after `--`: fairdice play -- -1,2,3 0,1,2 3,4,5";

#[derive(Parser)]
#[command(name = "fairdice")]
#[command(about = "Provably fair dice game against the computer")]
#[command(version)]
struct Cli {
    /// Settings file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game with the given dice
    Play {
        /// Dice as comma separated faces, at least 3. Pass them after `--`
        /// when one starts with a negative face
        dice: Vec<String>,
        /// Number of rounds
        #[arg(short, long)]
        rounds: Option<u32>,
        /// Decimals in the probability table
        #[arg(short, long)]
        precision: Option<usize>,
    },
    /// Show the win probability table for the given dice
    Table {
        /// Dice as comma separated faces, at least 3. Pass them after `--`
        /// when one starts with a negative face
        dice: Vec<String>,
        /// Decimals in the probability table
        #[arg(short, long)]
        precision: Option<usize>,
    },
    /// Check a revealed value and key against the published HMAC
    Verify {
        /// Revealed value
        value: u32,
        /// Revealed key (hex)
        key: String,
        /// Published HMAC (hex)
        mac: String,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "fairdice={},fairdice_core={}",
            log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = CliConfig::load(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Play {
            dice,
            rounds,
            precision,
        } => commands::play(&config, dice, rounds, precision),
        Commands::Table { dice, precision } => commands::show_table(&config, dice, precision),
        Commands::Verify { value, key, mac } => commands::verify(value, &key, &mac),
    });

    if let Err(e) = result {
        match e.downcast_ref::<GameError>() {
            Some(GameError::Configuration(problem)) => {
                eprintln!("Error: Invalid dice: {}", problem);
                eprintln!("Pass at least 3 dice with the same number of integer faces.");
                eprintln!("{}", USAGE_HINT);
            }
            Some(GameError::Entropy(reason)) => {
                eprintln!("Error: No secure randomness available: {}", reason);
            }
            _ => {
                eprintln!("Error: {:#}", e);
            }
        }
        std::process::exit(1);
    }
}
