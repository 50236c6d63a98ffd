use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum number of dice a game needs.
pub const MIN_DICE: usize = 3;

/// Face values of one die, fixed once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiceConfiguration {
    faces: Vec<i64>,
}

impl DiceConfiguration {
    pub fn new(faces: Vec<i64>) -> Self {
        Self { faces }
    }

    pub fn faces(&self) -> &[i64] {
        &self.faces
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn face(&self, index: usize) -> Option<i64> {
        self.faces.get(index).copied()
    }

    /// Parse a comma separated list like `2,2,4,4,9,9`. `position` is only
    /// used in error messages.
    pub fn parse(input: &str, position: usize) -> Result<Self, ConfigurationError> {
        if input.trim().is_empty() {
            return Err(ConfigurationError::EmptyDice {
                position,
                input: input.to_string(),
            });
        }

        let faces = input
            .split(',')
            .map(|face| {
                face.trim()
                    .parse::<i64>()
                    .map_err(|_| ConfigurationError::InvalidFace {
                        position,
                        input: input.to_string(),
                        face: face.trim().to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { faces })
    }
}

impl fmt::Display for DiceConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces = self
            .faces
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "[{}]", faces)
    }
}

/// Parse and validate the full dice list of a game: at least [`MIN_DICE`]
/// entries, all integers, all with the face count of the first one.
pub fn parse_dice<S: AsRef<str>>(
    inputs: &[S],
) -> Result<Vec<DiceConfiguration>, ConfigurationError> {
    if inputs.len() < MIN_DICE {
        return Err(ConfigurationError::TooFewDice {
            min: MIN_DICE,
            found: inputs.len(),
            inputs: inputs.iter().map(|i| i.as_ref().to_string()).collect(),
        });
    }

    let dice = inputs
        .iter()
        .enumerate()
        .map(|(position, input)| DiceConfiguration::parse(input.as_ref(), position))
        .collect::<Result<Vec<_>, _>>()?;

    validate_dice(&dice, |position| inputs[position].as_ref().to_string())?;
    Ok(dice)
}

/// Validate already parsed dice, e.g. coming from a settings file.
pub fn validate_dice<F>(dice: &[DiceConfiguration], echo: F) -> Result<(), ConfigurationError>
where
    F: Fn(usize) -> String,
{
    if dice.len() < MIN_DICE {
        return Err(ConfigurationError::TooFewDice {
            min: MIN_DICE,
            found: dice.len(),
            inputs: (0..dice.len()).map(&echo).collect(),
        });
    }

    let expected = dice[0].face_count();
    for (position, die) in dice.iter().enumerate() {
        if die.face_count() == 0 {
            return Err(ConfigurationError::EmptyDice {
                position,
                input: echo(position),
            });
        }
        if die.face_count() != expected {
            return Err(ConfigurationError::FaceCountMismatch {
                position,
                input: echo(position),
                expected,
                found: die.face_count(),
            });
        }
    }

    Ok(())
}
