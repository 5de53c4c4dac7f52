//! Digest, Salt and Disclosure for the commit-reveal scheme.
//!
//! A disclosure is `salt || move_byte`. Participants publish
//! `Digest::of(disclosure)` first and the disclosure itself later.

use crate::games::Move;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::fmt;
use std::str::FromStr;

/// Length of the random salt in a canonical disclosure
pub const SALT_LEN: usize = 31;

/// Length of a canonical disclosure: salt plus one move byte
pub const DISCLOSURE_LEN: usize = SALT_LEN + 1;

/// Salt for commitment scheme
#[derive(Clone, Serialize, Deserialize)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    /// Create a new random salt
    pub fn random() -> Self {
        let mut bytes = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; SALT_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Salt({})", hex::encode(&self.0[..8]))
    }
}

/// Digest = SHA256(disclosed value)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(#[serde(with = "hex_serde")] [u8; 32]);

mod hex_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        hex::encode(bytes).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let hex_str = String::deserialize(d)?;
        let bytes = hex::decode(&hex_str).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 32 bytes"))
    }
}

impl Digest {
    /// Hash a candidate disclosed value
    pub fn of(value: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(value);
        Self(hasher.finalize().into())
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Verify that the given value hashes to this digest
    pub fn matches(&self, value: &[u8]) -> bool {
        *self == Self::of(value)
    }
}

impl FromStr for Digest {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s.trim_start_matches("0x"), &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Canonical disclosed value: a salt followed by the move byte
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disclosure(#[serde(with = "hex::serde")] Vec<u8>);

impl Disclosure {
    /// Seal a move behind the given salt
    pub fn new(salt: &Salt, mv: Move) -> Self {
        let mut bytes = Vec::with_capacity(DISCLOSURE_LEN);
        bytes.extend_from_slice(salt.as_bytes());
        bytes.push(mv.to_byte());
        Self(bytes)
    }

    /// Seal a move behind a fresh random salt
    pub fn random(mv: Move) -> Self {
        Self::new(&Salt::random(), mv)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The value to submit at commit time
    pub fn digest(&self) -> Digest {
        Digest::of(&self.0)
    }
}

impl fmt::Debug for Disclosure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Disclosure({})", self.digest())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_verification() {
        let disclosure = Disclosure::random(Move::Rock);
        let digest = disclosure.digest();

        assert!(digest.matches(disclosure.as_bytes()));
    }

    #[test]
    fn test_digest_is_deterministic() {
        let value = b"some disclosed value";
        assert_eq!(Digest::of(value), Digest::of(value));
    }

    #[test]
    fn test_known_sha256_vector() {
        assert_eq!(
            Digest::of(b"abc").to_string(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_different_moves_different_digests() {
        let salt = Salt::random();
        let rock = Disclosure::new(&salt, Move::Rock);
        let paper = Disclosure::new(&salt, Move::Paper);

        assert_ne!(rock.digest(), paper.digest());
    }

    #[test]
    fn test_different_salts_different_digests() {
        let first = Disclosure::new(&Salt::random(), Move::Rock);
        let second = Disclosure::new(&Salt::random(), Move::Rock);

        assert_ne!(first.digest(), second.digest());
    }

    #[test]
    fn test_move_is_last_byte() {
        let salt = Salt::from_bytes([7u8; SALT_LEN]);
        let disclosure = Disclosure::new(&salt, Move::Scissors);

        assert_eq!(disclosure.as_bytes().len(), DISCLOSURE_LEN);
        assert_eq!(disclosure.as_bytes().last(), Some(&Move::Scissors.to_byte()));
        assert_eq!(&disclosure.as_bytes()[..SALT_LEN], salt.as_bytes());
    }

    #[test]
    fn test_digest_hex_parsing() {
        let digest = Digest::of(b"value");
        let parsed: Digest = digest.to_string().parse().unwrap();
        assert_eq!(parsed, digest);

        let prefixed: Digest = format!("0x{}", digest).parse().unwrap();
        assert_eq!(prefixed, digest);

        assert!("abcd".parse::<Digest>().is_err());
    }

    #[test]
    fn test_digest_serializes_as_hex() {
        let digest = Digest::of(b"value");
        let json = serde_json::to_string(&digest).unwrap();

        assert_eq!(json, format!("\"{}\"", digest));
        let back: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, digest);
    }
}
