use crate::dice::DiceConfiguration;
use crate::dice_set::DiceSet;
use crate::error::{GameError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two sides of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Party {
    Computer,
    User,
}

impl Party {
    pub fn other(self) -> Self {
        match self {
            Party::Computer => Party::User,
            Party::User => Party::Computer,
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::Computer => f.write_str("computer"),
            Party::User => f.write_str("user"),
        }
    }
}

/// State of one game: dice left on the table, who holds which die and who
/// moves first.
#[derive(Debug)]
pub struct GameState {
    dice: DiceSet,
    computer_dice: Option<DiceConfiguration>,
    user_dice: Option<DiceConfiguration>,
    first_mover: Option<Party>,
}

impl GameState {
    pub fn new(dice: DiceSet) -> Self {
        Self {
            dice,
            computer_dice: None,
            user_dice: None,
            first_mover: None,
        }
    }

    pub fn dice(&self) -> &DiceSet {
        &self.dice
    }

    pub fn face_count(&self) -> usize {
        self.dice.face_count()
    }

    pub fn first_mover(&self) -> Option<Party> {
        self.first_mover
    }

    pub fn set_first_mover(&mut self, party: Party) -> Result<()> {
        if let Some(existing) = self.first_mover {
            return Err(GameError::invalid_state(format!(
                "First mover already decided: {}",
                existing
            )));
        }

        self.first_mover = Some(party);
        tracing::info!("First move goes to the {}", party);
        Ok(())
    }

    /// Order in which the parties pick their dice.
    pub fn selection_order(&self) -> Result<[Party; 2]> {
        let first = self
            .first_mover
            .ok_or_else(|| GameError::invalid_state("First mover not decided yet"))?;
        Ok([first, first.other()])
    }

    pub fn selected(&self, party: Party) -> Option<&DiceConfiguration> {
        match party {
            Party::Computer => self.computer_dice.as_ref(),
            Party::User => self.user_dice.as_ref(),
        }
    }

    /// Take the die at `index` for `party`.
    pub fn select(&mut self, party: Party, index: usize) -> Result<&DiceConfiguration> {
        if self.selected(party).is_some() {
            return Err(GameError::invalid_state(format!(
                "The {} already selected a die",
                party
            )));
        }

        let dice = self.dice.take(index)?;
        tracing::info!("The {} selected dice {}", party, dice);

        let slot = match party {
            Party::Computer => &mut self.computer_dice,
            Party::User => &mut self.user_dice,
        };
        Ok(&*slot.insert(dice))
    }

    /// Both dice, once both parties have chosen.
    pub fn matchup(&self) -> Result<(&DiceConfiguration, &DiceConfiguration)> {
        match (&self.computer_dice, &self.user_dice) {
            (Some(computer), Some(user)) => Ok((computer, user)),
            _ => Err(GameError::invalid_state("Both parties must select a die first")),
        }
    }
}
