use crate::dice::{parse_dice, validate_dice, DiceConfiguration};
use crate::error::{GameError, Result};

/// Dice still available for selection. Indices are stable: taking one die
/// does not shift the others.
#[derive(Debug, Clone)]
pub struct DiceSet {
    all: Vec<DiceConfiguration>,
    available: Vec<bool>,
}

impl DiceSet {
    pub fn new(dice: Vec<DiceConfiguration>) -> Result<Self> {
        validate_dice(&dice, |position| dice[position].to_string())?;
        let available = vec![true; dice.len()];
        Ok(Self {
            all: dice,
            available,
        })
    }

    /// Build from raw command line style inputs.
    pub fn parse<S: AsRef<str>>(inputs: &[S]) -> Result<Self> {
        let dice = parse_dice(inputs)?;
        Self::new(dice)
    }

    /// Remaining dice with their indices, in original order.
    pub fn list(&self) -> Vec<(usize, &DiceConfiguration)> {
        self.all
            .iter()
            .enumerate()
            .filter(|(index, _)| self.available[*index])
            .collect()
    }

    pub fn available_indices(&self) -> Vec<usize> {
        self.list().into_iter().map(|(index, _)| index).collect()
    }

    pub fn is_available(&self, index: usize) -> bool {
        self.available.get(index).copied().unwrap_or(false)
    }

    /// Remove a die from availability and hand it out.
    pub fn take(&mut self, index: usize) -> Result<DiceConfiguration> {
        if !self.is_available(index) {
            return Err(GameError::out_of_range(index, &self.available_indices()));
        }

        self.available[index] = false;
        tracing::debug!("Dice #{} taken: {}", index, self.all[index]);
        Ok(self.all[index].clone())
    }

    /// Every die of the game, taken or not.
    pub fn all(&self) -> &[DiceConfiguration] {
        &self.all
    }

    pub fn face_count(&self) -> usize {
        self.all.first().map_or(0, DiceConfiguration::face_count)
    }

    pub fn remaining(&self) -> usize {
        self.available.iter().filter(|a| **a).count()
    }
}
