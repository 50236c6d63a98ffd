//! Provably fair dice game for a human against the computer.
//!
//! Every random decision the computer makes is committed with an HMAC before
//! the user answers and revealed afterwards, so the user can check that the
//! computer did not change its mind after seeing the answer.

pub mod commitment;
pub mod dice;
pub mod dice_set;
pub mod error;
pub mod game;
pub mod probability;
pub mod round;
pub mod session;
pub mod settings;

pub use commitment::{Committer, FairChoice, GuessScheme, MacTag, ModularSum, SecretKey};
pub use dice::{parse_dice, DiceConfiguration, MIN_DICE};
pub use dice_set::DiceSet;
pub use error::{ConfigurationError, GameError, Result};
pub use game::{GameState, Party};
pub use probability::{win_probability, ProbabilityTable, WinProbability};
pub use round::{RoundEngine, RoundOutcome, Throw, Winner};
pub use session::{Console, MenuOption, Scoreboard, Session, SessionEnd};
pub use settings::SessionSettings;
