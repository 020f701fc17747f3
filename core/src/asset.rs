use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::tx::{TransactionId, TransactionIdError};

/// Canonical asset id length: 64 hex chars of genesis txid + 8 of output index.
pub const ASSET_ID_HEX_LENGTH: usize = 72;

#[derive(Error, PartialEq, Eq, Debug, Clone)]
pub enum AssetIdError {
    #[error("asset id must be {ASSET_ID_HEX_LENGTH} hex characters, got {0}")]
    InvalidLength(usize),

    #[error("asset id transaction part: {0}")]
    InvalidTransactionId(#[from] TransactionIdError),

    #[error("asset id index part is not valid hex")]
    InvalidIndex,
}

/// The identity of an asset for its whole lifetime: the outpoint of the
/// genesis covenant output. The canonical form is big-endian hex; the wire
/// form reverses the byte order of each half independently, matching the
/// little-endian encoding script-level comparisons operate on.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct AssetId {
    transaction_id: TransactionId,
    index: u32,
}

impl AssetId {
    pub fn new(transaction_id: TransactionId, index: u32) -> Self {
        Self { transaction_id, index }
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.transaction_id
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// The 36-byte little-endian form embedded in locking scripts. Always
    /// derived from the canonical value, and identical to the serialized
    /// outpoint wire encoding.
    pub fn to_wire(&self) -> [u8; 36] {
        let mut wire = [0u8; 36];
        wire[..32].copy_from_slice(self.transaction_id.as_bytes());
        wire[32..].copy_from_slice(&self.index.to_le_bytes());
        wire
    }
}

impl Display for AssetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:08x}", self.transaction_id, self.index)
    }
}

impl FromStr for AssetId {
    type Err = AssetIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ASSET_ID_HEX_LENGTH {
            return Err(AssetIdError::InvalidLength(s.len()));
        }
        let transaction_id = s[..64].parse()?;
        let index = u32::from_str_radix(&s[64..], 16).map_err(|_| AssetIdError::InvalidIndex)?;
        Ok(Self { transaction_id, index })
    }
}

impl Serialize for AssetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_round_trip() {
        let hex = format!("{}{:08x}", "3c".repeat(32), 7);
        let id: AssetId = hex.parse().unwrap();
        assert_eq!(id.to_string(), hex);
        assert_eq!(id.index(), 7);
    }

    #[test]
    fn test_wire_form_reverses_each_half() {
        let txid_hex = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";
        let id = AssetId::new(txid_hex.parse().unwrap(), 0x01020304);
        let wire = id.to_wire();
        // txid wire bytes are the display hex reversed
        assert_eq!(wire[0], 0x1f);
        assert_eq!(wire[31], 0x00);
        // index is little-endian
        assert_eq!(&wire[32..], &[0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_wire_round_trips_through_canonical() {
        let hex = format!("{}{:08x}", "ab".repeat(32), 0);
        let id: AssetId = hex.parse().unwrap();
        let reparsed: AssetId = id.to_string().parse().unwrap();
        assert_eq!(reparsed.to_wire(), id.to_wire());
        assert_eq!(reparsed, id);
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!("00".parse::<AssetId>(), Err(AssetIdError::InvalidLength(2))));
        let bad_index = format!("{}zzzzzzzz", "00".repeat(32));
        assert!(matches!(bad_index.parse::<AssetId>(), Err(AssetIdError::InvalidIndex)));
    }
}
