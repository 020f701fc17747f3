use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::keys::PublicKey;

/// Version byte of mainnet pay-to-public-key-hash addresses.
pub const P2PKH_VERSION: u8 = 0x00;

#[derive(Error, PartialEq, Eq, Debug, Clone)]
pub enum AddressError {
    #[error("Invalid version {0}")]
    InvalidVersion(u8),

    #[error("Invalid payload length {0}")]
    InvalidLength(usize),

    #[error("Checksum is invalid")]
    BadChecksum,

    #[error("Invalid base58 encoding")]
    DecodingError,
}

/// A base58check pay-to-public-key-hash address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Address {
    payload: [u8; 20],
}

impl Address {
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        Self { payload: public_key.hash() }
    }

    /// The raw public key hash the address encodes.
    pub fn payload(&self) -> &[u8; 20] {
        &self.payload
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut versioned = [0u8; 21];
        versioned[0] = P2PKH_VERSION;
        versioned[1..].copy_from_slice(&self.payload);
        f.write_str(&bs58::encode(versioned).with_check().into_string())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = bs58::decode(s).with_check(None).into_vec().map_err(|err| match err {
            bs58::decode::Error::InvalidChecksum { .. } => AddressError::BadChecksum,
            _ => AddressError::DecodingError,
        })?;
        if decoded.len() != 21 {
            return Err(AddressError::InvalidLength(decoded.len()));
        }
        if decoded[0] != P2PKH_VERSION {
            return Err(AddressError::InvalidVersion(decoded[0]));
        }
        let mut payload = [0u8; 20];
        payload.copy_from_slice(&decoded[1..]);
        Ok(Self { payload })
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
