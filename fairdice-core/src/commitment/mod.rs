//! HMAC based commitments.
//!
//! The committer publishes `HMAC-SHA256(key, decimal(value))` and keeps the
//! value and key to itself. Both are only handed out through
//! [`fair_choice::FairChoice`] once the counterparty has responded.

pub mod fair_choice;
pub mod scheme;

pub use fair_choice::{Committed, FairChoice, Responded, Revealed};
pub use scheme::{FairScheme, GuessOutcome, GuessScheme, ModularSum};

use crate::error::{GameError, Result};
use hmac::{Hmac, Mac};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

pub const KEY_SIZE: usize = 32;
pub const MAC_SIZE: usize = 32;

/// One-time HMAC key.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; KEY_SIZE]);

impl SecretKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| GameError::internal(format!("Invalid key hex: {}", e)))?;
        let bytes: [u8; KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| GameError::internal(format!("Key must be {} bytes", KEY_SIZE)))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// Published authentication tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacTag([u8; MAC_SIZE]);

impl MacTag {
    pub fn from_bytes(bytes: [u8; MAC_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; MAC_SIZE] {
        &self.0
    }
}

impl fmt::Debug for MacTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacTag({})", hex::encode_upper(&self.0[..8]))
    }
}

impl fmt::Display for MacTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(self.0))
    }
}

/// A value bound to a one-time key. Only the MAC is public; the secret parts
/// leave through [`Commitment::open`], which only the fair choice protocol
/// can call.
pub struct Commitment {
    value: u32,
    key: SecretKey,
    mac: MacTag,
}

impl Commitment {
    pub fn mac(&self) -> &MacTag {
        &self.mac
    }

    pub(crate) fn open(self) -> (u32, SecretKey) {
        (self.value, self.key)
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commitment")
            .field("mac", &self.mac)
            .finish_non_exhaustive()
    }
}

/// Produces commitments from an injected secure generator.
pub struct Committer<R> {
    rng: R,
}

impl<R: RngCore + CryptoRng> Committer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Uniform value in `[0, range)`.
    pub fn draw(&mut self, range: u32) -> Result<u32> {
        uniform_below(&mut self.rng, range)
    }

    /// Commit to `value` under a fresh key.
    pub fn commit(&mut self, value: u32) -> Result<Commitment> {
        let mut bytes = [0u8; KEY_SIZE];
        self.rng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| GameError::entropy(e.to_string()))?;
        let key = SecretKey(bytes);
        bytes.zeroize();

        let mac = compute_mac(value, &key)?;
        tracing::debug!("Committed to a value, HMAC={}", mac);

        Ok(Commitment { value, key, mac })
    }
}

/// Uniform value in `[0, range)` read through `try_fill_bytes`. Words at or
/// above the largest multiple of `range` are redrawn.
pub(crate) fn uniform_below<R: RngCore + ?Sized>(rng: &mut R, range: u32) -> Result<u32> {
    if range == 0 {
        return Err(GameError::internal("Cannot draw from an empty range"));
    }

    let range = u64::from(range);
    let limit = (1u64 << 32) / range * range;
    loop {
        let mut word = [0u8; 4];
        rng.try_fill_bytes(&mut word)
            .map_err(|e| GameError::entropy(e.to_string()))?;
        let candidate = u64::from(u32::from_le_bytes(word));
        if candidate < limit {
            return Ok((candidate % range) as u32);
        }
    }
}

/// `HMAC-SHA256(key, decimal(value))`.
pub fn compute_mac(value: u32, key: &SecretKey) -> Result<MacTag> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key.as_bytes())
        .map_err(|e| GameError::internal(format!("HMAC init failed: {}", e)))?;
    mac.update(value.to_string().as_bytes());
    Ok(MacTag(mac.finalize().into_bytes().into()))
}

/// Recompute the MAC for a revealed value and key and compare it with the
/// one published earlier.
pub fn verify(value: u32, key: &SecretKey, mac: &MacTag) -> bool {
    match <HmacSha256 as Mac>::new_from_slice(key.as_bytes()) {
        Ok(mut hmac) => {
            hmac.update(value.to_string().as_bytes());
            hmac.verify_slice(mac.as_bytes()).is_ok()
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{Exhausted, Words};
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn committer() -> Committer<StdRng> {
        Committer::new(StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_commitment_verifies() {
        let mut committer = committer();
        let commitment = committer.commit(4).unwrap();
        let mac = *commitment.mac();

        let (value, key) = commitment.open();
        assert_eq!(value, 4);
        assert!(verify(value, &key, &mac));
    }

    #[test]
    fn test_tampered_value_fails() {
        let mut committer = committer();
        let commitment = committer.commit(1).unwrap();
        let mac = *commitment.mac();
        let (_, key) = commitment.open();

        for tampered in [0u32, 2, 5, 10, u32::MAX] {
            assert!(!verify(tampered, &key, &mac));
        }
    }

    #[test]
    fn test_wrong_key_fails() {
        let mut committer = committer();
        let first = committer.commit(3).unwrap();
        let second = committer.commit(3).unwrap();

        // same value, fresh key per commit
        assert_ne!(first.mac(), second.mac());

        let mac = *first.mac();
        let (_, other_key) = second.open();
        assert!(!verify(3, &other_key, &mac));
    }

    #[test]
    fn test_mac_matches_hmac_of_decimal_string() {
        let key = SecretKey::from_bytes([0x0b; KEY_SIZE]);
        let mac = compute_mac(42, &key).unwrap();

        let mut hmac = <HmacSha256 as Mac>::new_from_slice(&[0x0b; KEY_SIZE]).unwrap();
        hmac.update(b"42");
        let expected: [u8; MAC_SIZE] = hmac.finalize().into_bytes().into();
        assert_eq!(mac.as_bytes(), &expected);
    }

    #[test]
    fn test_key_hex_round_trip() {
        let key = SecretKey::from_bytes([0xab; KEY_SIZE]);
        let parsed = SecretKey::from_hex(&key.to_hex()).unwrap();
        assert_eq!(parsed, key);
        assert!(SecretKey::from_hex("abcd").is_err());
    }

    #[test]
    fn test_draw_stays_in_range() {
        let mut committer = committer();
        for _ in 0..200 {
            assert!(committer.draw(6).unwrap() < 6);
        }
        assert!(committer.draw(0).is_err());
    }

    #[test]
    fn test_entropy_failure_is_reported() {
        let err = Committer::new(Exhausted).commit(1).unwrap_err();
        assert!(matches!(err, GameError::Entropy(_)));
        assert!(err.is_fatal());

        let err = Committer::new(Exhausted).draw(6).unwrap_err();
        assert!(matches!(err, GameError::Entropy(_)));
    }

    #[test]
    fn test_draw_redraws_biased_words() {
        // 4294967292 is the largest multiple of 6 below 2^32
        let mut rng = Words::new(&[u32::MAX, 4_294_967_292, 7]);
        assert_eq!(uniform_below(&mut rng, 6).unwrap(), 1);
        assert!(rng.is_empty());

        let mut rng = Words::new(&[4_294_967_291]);
        assert_eq!(uniform_below(&mut rng, 6).unwrap(), 4_294_967_291 % 6);
    }
}
