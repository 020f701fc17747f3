use std::fmt::{Display, Formatter};
use std::str::FromStr;

use secp256k1::SECP256K1;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::hashing::hash160;

#[derive(Error, Debug)]
pub enum KeyError {
    #[error("key is not valid hex")]
    InvalidHex,

    #[error("Secp256k1 -> {0}")]
    Secp256k1Error(#[from] secp256k1::Error),
}

/// A secp256k1 private key, parsed from 32 hex-encoded bytes and validated at
/// construction.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PrivateKey(secp256k1::SecretKey);

impl PrivateKey {
    pub fn from_hex(hex: &str) -> Result<Self, KeyError> {
        if hex.len() != 64 {
            return Err(KeyError::InvalidHex);
        }
        let mut bytes = [0u8; 32];
        faster_hex::hex_decode(hex.as_bytes(), &mut bytes).map_err(|_| KeyError::InvalidHex)?;
        Ok(Self(secp256k1::SecretKey::from_slice(&bytes)?))
    }

    pub fn to_public_key(&self) -> PublicKey {
        PublicKey(secp256k1::PublicKey::from_secret_key(SECP256K1, &self.0))
    }

    pub(crate) fn secret_key(&self) -> &secp256k1::SecretKey {
        &self.0
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

/// A compressed secp256k1 public key (33 bytes), validated at construction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PublicKey(secp256k1::PublicKey);

impl PublicKey {
    pub fn from_hex(hex: &str) -> Result<Self, KeyError> {
        if hex.len() != 66 {
            return Err(KeyError::InvalidHex);
        }
        let mut bytes = [0u8; 33];
        faster_hex::hex_decode(hex.as_bytes(), &mut bytes).map_err(|_| KeyError::InvalidHex)?;
        Ok(Self(secp256k1::PublicKey::from_slice(&bytes)?))
    }

    /// Compressed serialization, the form pushed into scripts.
    pub fn serialize(&self) -> [u8; 33] {
        self.0.serialize()
    }

    /// RIPEMD160(SHA256(pubkey)), the hash locked by P2PKH outputs.
    pub fn hash(&self) -> [u8; 20] {
        hash160(&self.serialize())
    }

    pub(crate) fn inner(&self) -> &secp256k1::PublicKey {
        &self.0
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&faster_hex::hex_string(&self.serialize()))
    }
}

impl FromStr for PublicKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_generator_point() {
        // secret key 1 maps to the curve generator
        let key = PrivateKey::from_hex("0000000000000000000000000000000000000000000000000000000000000001").unwrap();
        assert_eq!(
            key.to_public_key().to_string(),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
    }

    #[test]
    fn test_public_key_hex_round_trip() {
        let key = PrivateKey::from_hex(&"11".repeat(32)).unwrap();
        let public = key.to_public_key();
        let reparsed = PublicKey::from_hex(&public.to_string()).unwrap();
        assert_eq!(reparsed, public);
        assert_eq!(public.hash().len(), 20);
    }

    #[test]
    fn test_rejects_invalid_keys() {
        assert!(matches!(PrivateKey::from_hex("00"), Err(KeyError::InvalidHex)));
        assert!(matches!(PrivateKey::from_hex(&"zz".repeat(32)), Err(KeyError::InvalidHex)));
        // zero is outside the valid scalar range
        assert!(matches!(PrivateKey::from_hex(&"00".repeat(32)), Err(KeyError::Secp256k1Error(_))));
        assert!(matches!(PublicKey::from_hex(&"02".repeat(32)), Err(KeyError::InvalidHex)));
    }
}
