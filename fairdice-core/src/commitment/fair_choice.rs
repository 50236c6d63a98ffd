//! Commit → respond → reveal exchange.
//!
//! The committed value is fixed before the counterparty answers, and the
//! answer is fixed before anything is revealed. `reveal` only exists on the
//! [`Responded`] state, so revealing early does not compile:
//!
//! ```compile_fail
//! use fairdice_core::commitment::{Committer, FairChoice, ModularSum};
//! use rand::rngs::OsRng;
//!
//! let mut committer = Committer::new(OsRng);
//! let choice = FairChoice::start(ModularSum::new(6), &mut committer).unwrap();
//! let revealed = choice.reveal();
//! ```

use super::scheme::FairScheme;
use super::{verify, Commitment, Committer, MacTag, SecretKey};
use crate::error::{GameError, Result};
use rand::{CryptoRng, RngCore};

/// Value committed, MAC published, waiting for the counterparty.
#[derive(Debug)]
pub struct Committed {
    commitment: Commitment,
}

/// Counterparty has answered; the committer may now reveal.
#[derive(Debug)]
pub struct Responded<T> {
    commitment: Commitment,
    response: T,
}

#[derive(Debug)]
pub struct FairChoice<S, State> {
    scheme: S,
    state: State,
}

impl<S: FairScheme> FairChoice<S, Committed> {
    /// Draw a uniform value for the scheme's range and commit to it.
    pub fn start<R: RngCore + CryptoRng>(scheme: S, committer: &mut Committer<R>) -> Result<Self> {
        let value = committer.draw(scheme.range())?;
        Self::with_value(scheme, committer, value)
    }

    /// Commit to a value chosen by the caller.
    pub fn with_value<R: RngCore + CryptoRng>(
        scheme: S,
        committer: &mut Committer<R>,
        value: u32,
    ) -> Result<Self> {
        if value >= scheme.range() {
            return Err(GameError::internal(format!(
                "Committed value {} outside range 0..{}",
                value,
                scheme.range()
            )));
        }

        let commitment = committer.commit(value)?;
        Ok(Self {
            scheme,
            state: Committed { commitment },
        })
    }

    pub fn mac(&self) -> &MacTag {
        self.state.commitment.mac()
    }

    pub fn range(&self) -> u32 {
        self.scheme.range()
    }

    /// Record the counterparty's response. An out of range response ends
    /// this exchange; start a new one with a fresh commitment.
    pub fn respond(self, response: S::Response) -> Result<FairChoice<S, Responded<S::Response>>> {
        self.scheme.check_response(response)?;
        tracing::debug!("Counterparty responded with {}", response);

        Ok(FairChoice {
            scheme: self.scheme,
            state: Responded {
                commitment: self.state.commitment,
                response,
            },
        })
    }
}

impl<S: FairScheme> FairChoice<S, Responded<S::Response>> {
    pub fn mac(&self) -> &MacTag {
        self.state.commitment.mac()
    }

    pub fn response(&self) -> S::Response {
        self.state.response
    }

    /// Disclose value and key and compute the agreed outcome.
    pub fn reveal(self) -> Revealed<S> {
        let mac = *self.state.commitment.mac();
        let response = self.state.response;
        let (value, key) = self.state.commitment.open();
        let outcome = self.scheme.combine(value, response);

        Revealed {
            range: self.scheme.range(),
            value,
            key,
            mac,
            response,
            outcome,
        }
    }
}

/// Everything the counterparty needs to check the exchange.
#[derive(Debug)]
pub struct Revealed<S: FairScheme> {
    pub range: u32,
    pub value: u32,
    pub key: SecretKey,
    pub mac: MacTag,
    pub response: S::Response,
    pub outcome: S::Outcome,
}

impl<S: FairScheme> Revealed<S> {
    /// Recompute the published MAC from the revealed value and key.
    pub fn verify(&self) -> bool {
        verify(self.value, &self.key, &self.mac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitment::{GuessOutcome, GuessScheme, ModularSum};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn committer(seed: u64) -> Committer<StdRng> {
        Committer::new(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_guess_exchange() {
        let mut committer = committer(1);
        let choice = FairChoice::with_value(GuessScheme::coin(), &mut committer, 1).unwrap();
        let published = *choice.mac();

        let revealed = choice.respond(1).unwrap().reveal();
        assert_eq!(revealed.value, 1);
        assert_eq!(revealed.mac, published);
        assert_eq!(revealed.outcome, GuessOutcome::Guessed);
        assert!(revealed.verify());
    }

    #[test]
    fn test_offset_exchange() {
        let mut committer = committer(2);
        let choice = FairChoice::with_value(ModularSum::new(6), &mut committer, 3).unwrap();
        let revealed = choice.respond(4).unwrap().reveal();

        assert_eq!(revealed.outcome, 1);
        assert_eq!(revealed.response, 4);
        assert!(revealed.verify());
    }

    #[test]
    fn test_response_out_of_range() {
        let mut committer = committer(3);
        let choice = FairChoice::start(ModularSum::new(6), &mut committer).unwrap();
        assert!(matches!(
            choice.respond(9),
            Err(GameError::InvalidResponse { value: 9, range: 6 })
        ));
    }

    #[test]
    fn test_value_outside_range_is_rejected() {
        let mut committer = committer(4);
        assert!(FairChoice::with_value(GuessScheme::coin(), &mut committer, 2).is_err());
    }

    #[test]
    fn test_forged_reveal_does_not_verify() {
        let mut committer = committer(5);
        let choice = FairChoice::with_value(ModularSum::new(6), &mut committer, 2).unwrap();
        let mut revealed = choice.respond(0).unwrap().reveal();

        revealed.value = 5;
        assert!(!revealed.verify());
    }

    #[test]
    fn test_offset_uniform_with_fixed_response() {
        let mut committer = committer(42);
        let mut histogram = [0u32; 6];

        for _ in 0..6000 {
            let choice = FairChoice::start(ModularSum::new(6), &mut committer).unwrap();
            let revealed = choice.respond(2).unwrap().reveal();
            histogram[revealed.outcome as usize] += 1;
        }

        for count in histogram {
            assert!((800..=1200).contains(&count), "histogram {:?}", histogram);
        }
    }
}
