use crate::commitment::uniform_below;
use crate::dice::DiceConfiguration;
use crate::error::{GameError, Result};
use crate::game::Party;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Party(Party),
    Tie,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Party(party) => write!(f, "{}", party),
            Winner::Tie => f.write_str("tie"),
        }
    }
}

/// One throw: the local selector, the face it landed on and its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Throw {
    pub selector: usize,
    pub face: usize,
    pub value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub computer: Throw,
    pub user: Throw,
    pub winner: Winner,
}

impl RoundOutcome {
    pub fn throw_of(&self, party: Party) -> &Throw {
        match party {
            Party::Computer => &self.computer,
            Party::User => &self.user,
        }
    }
}

/// Throws dice and scores a round.
pub struct RoundEngine<R> {
    rng: R,
}

impl<R: RngCore + CryptoRng> RoundEngine<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Local uniform face selector for one throw.
    pub fn draw_selector(&mut self, faces: usize) -> Result<usize> {
        let faces = u32::try_from(faces)
            .map_err(|_| GameError::internal(format!("Dice with {} faces", faces)))?;
        Ok(uniform_below(&mut self.rng, faces)? as usize)
    }

    /// Play a round with freshly drawn selectors for both parties.
    pub fn play(
        &mut self,
        computer_dice: &DiceConfiguration,
        user_dice: &DiceConfiguration,
        offset: u32,
    ) -> Result<RoundOutcome> {
        let faces = computer_dice.face_count();
        let selectors = [self.draw_selector(faces)?, self.draw_selector(faces)?];
        play_with(computer_dice, user_dice, offset, selectors)
    }
}

/// Value of the face at `face_selector`.
pub fn throw(dice: &DiceConfiguration, face_selector: usize) -> Result<i64> {
    dice.face(face_selector).ok_or_else(|| {
        GameError::out_of_range(face_selector, &(0..dice.face_count()).collect::<Vec<_>>())
    })
}

/// Higher face wins, equal faces tie.
pub fn compare(computer: i64, user: i64) -> Winner {
    match computer.cmp(&user) {
        Ordering::Greater => Winner::Party(Party::Computer),
        Ordering::Less => Winner::Party(Party::User),
        Ordering::Equal => Winner::Tie,
    }
}

/// Play a round with known selectors (computer first). The face thrown is
/// `(selector + offset) mod faces`.
pub fn play_with(
    computer_dice: &DiceConfiguration,
    user_dice: &DiceConfiguration,
    offset: u32,
    selectors: [usize; 2],
) -> Result<RoundOutcome> {
    let computer = throw_with_offset(computer_dice, selectors[0], offset)?;
    let user = throw_with_offset(user_dice, selectors[1], offset)?;
    let winner = compare(computer.value, user.value);

    tracing::info!(
        "Round thrown: computer {} vs user {} -> {}",
        computer.value,
        user.value,
        winner
    );

    Ok(RoundOutcome {
        computer,
        user,
        winner,
    })
}

fn throw_with_offset(dice: &DiceConfiguration, selector: usize, offset: u32) -> Result<Throw> {
    let faces = dice.face_count();
    if faces == 0 {
        return Err(GameError::internal("Dice without faces"));
    }
    if selector >= faces {
        return Err(GameError::out_of_range(
            selector,
            &(0..faces).collect::<Vec<_>>(),
        ));
    }

    let face = (selector + offset as usize % faces) % faces;
    Ok(Throw {
        selector,
        face,
        value: throw(dice, face)?,
    })
}
