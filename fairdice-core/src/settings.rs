use crate::error::{GameError, Result};
use crate::probability::DEFAULT_PRECISION;
use serde::{Deserialize, Serialize};

pub const MAX_PRECISION: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Rounds played with the selected dice.
    pub rounds: u32,
    /// Decimals shown in the probability table.
    pub precision: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            rounds: 1,
            precision: DEFAULT_PRECISION,
        }
    }
}

impl SessionSettings {
    pub fn validate(&self) -> Result<()> {
        if self.rounds == 0 {
            return Err(GameError::settings("Rounds must be greater than 0"));
        }

        if self.precision == 0 || self.precision > MAX_PRECISION {
            return Err(GameError::settings(format!(
                "Precision must be between 1 and {}",
                MAX_PRECISION
            )));
        }

        Ok(())
    }
}
