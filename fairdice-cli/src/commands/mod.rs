use crate::config::CliConfig;
use crate::console::TerminalConsole;
use crate::render;
use anyhow::{bail, Context};
use fairdice_core::commitment::{self, MacTag, SecretKey, MAC_SIZE};
use fairdice_core::{
    Committer, DiceSet, GameState, ProbabilityTable, RoundEngine, Session, SessionEnd,
};
use rand::rngs::OsRng;

pub fn play(
    config: &CliConfig,
    dice: Vec<String>,
    rounds: Option<u32>,
    precision: Option<usize>,
) -> anyhow::Result<()> {
    let dice = DiceSet::parse(&config.dice_or(dice))?;

    let mut settings = config.session.clone();
    if let Some(rounds) = rounds {
        settings.rounds = rounds;
    }
    if let Some(precision) = precision {
        settings.precision = precision;
    }
    settings.validate()?;

    let session = Session::new(
        GameState::new(dice),
        settings,
        Committer::new(OsRng),
        RoundEngine::new(OsRng),
        TerminalConsole::new(),
    );

    match session.run()? {
        SessionEnd::Completed(board) => {
            tracing::debug!(
                "Session completed after {} round(s)",
                board.rounds.len()
            );
        }
        SessionEnd::Quit => {
            tracing::debug!("Session quit by the user");
        }
    }

    Ok(())
}

pub fn show_table(
    config: &CliConfig,
    dice: Vec<String>,
    precision: Option<usize>,
) -> anyhow::Result<()> {
    let dice = DiceSet::parse(&config.dice_or(dice))?;

    let mut settings = config.session.clone();
    if let Some(precision) = precision {
        settings.precision = precision;
    }
    settings.validate()?;

    let table = ProbabilityTable::new(dice.all(), settings.precision);
    println!("{}", table.title());
    println!("{}", render::probability_table(&table));

    Ok(())
}

pub fn verify(value: u32, key_hex: &str, mac_hex: &str) -> anyhow::Result<()> {
    let key = SecretKey::from_hex(key_hex)?;
    let mac = parse_mac(mac_hex)?;

    if !commitment::verify(value, &key, &mac) {
        bail!("HMAC does not match value {} and the given key", value);
    }

    println!("HMAC matches: the value {} was committed before your answer.", value);
    Ok(())
}

fn parse_mac(mac_hex: &str) -> anyhow::Result<MacTag> {
    let bytes = hex::decode(mac_hex.trim()).context("HMAC is not valid hex")?;
    let bytes: [u8; MAC_SIZE] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow::anyhow!("HMAC must be {} bytes, got {}", MAC_SIZE, b.len()))?;
    Ok(MacTag::from_bytes(bytes))
}
