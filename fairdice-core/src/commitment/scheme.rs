use crate::error::{GameError, Result};

/// How the counterparty's response is combined with the committed value.
pub trait FairScheme {
    type Response: Copy + std::fmt::Debug + std::fmt::Display;
    type Outcome: Copy + std::fmt::Debug;

    /// Range the committed value is drawn from.
    fn range(&self) -> u32;

    fn check_response(&self, response: Self::Response) -> Result<()>;

    fn combine(&self, secret: u32, response: Self::Response) -> Self::Outcome;
}

/// Counterparty guesses the committed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuessScheme {
    range: u32,
}

impl GuessScheme {
    pub fn new(range: u32) -> Self {
        Self { range }
    }

    /// Guess the committer's bit.
    pub fn coin() -> Self {
        Self::new(2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Guessed,
    Missed,
}

impl FairScheme for GuessScheme {
    type Response = u32;
    type Outcome = GuessOutcome;

    fn range(&self) -> u32 {
        self.range
    }

    fn check_response(&self, guess: u32) -> Result<()> {
        if guess >= self.range {
            return Err(GameError::InvalidResponse {
                value: guess,
                range: self.range,
            });
        }
        Ok(())
    }

    fn combine(&self, secret: u32, guess: u32) -> GuessOutcome {
        if secret == guess {
            GuessOutcome::Guessed
        } else {
            GuessOutcome::Missed
        }
    }
}

/// Counterparty adds its own number; the outcome is the sum modulo the range.
/// Uniform as long as one of the two addends is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModularSum {
    modulus: u32,
}

impl ModularSum {
    pub fn new(modulus: u32) -> Self {
        Self { modulus }
    }
}

impl FairScheme for ModularSum {
    type Response = u32;
    type Outcome = u32;

    fn range(&self) -> u32 {
        self.modulus
    }

    fn check_response(&self, addend: u32) -> Result<()> {
        if addend >= self.modulus {
            return Err(GameError::InvalidResponse {
                value: addend,
                range: self.modulus,
            });
        }
        Ok(())
    }

    fn combine(&self, secret: u32, addend: u32) -> u32 {
        ((u64::from(secret) + u64::from(addend)) % u64::from(self.modulus)) as u32
    }
}
