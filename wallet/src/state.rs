use serde::{Deserialize, Serialize};

use superasset_core::{AssetId, PublicKey, TransactionId};

/// Serde helpers encoding binary script and payload fields as hex strings.
mod hex {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&faster_hex::hex_string(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        let mut bytes = vec![0u8; s.len() / 2];
        faster_hex::hex_decode(s.as_bytes(), &mut bytes).map_err(serde::de::Error::custom)?;
        Ok(bytes)
    }

    pub mod opt {
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
            match bytes {
                Some(bytes) => serializer.serialize_some(&faster_hex::hex_string(bytes)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
            let s = Option::<String>::deserialize(deserializer)?;
            match s {
                Some(s) => {
                    let mut bytes = vec![0u8; s.len() / 2];
                    faster_hex::hex_decode(s.as_bytes(), &mut bytes).map_err(serde::de::Error::custom)?;
                    Ok(Some(bytes))
                }
                None => Ok(None),
            }
        }
    }
}

/// A live token output: everything needed to build the next transfer or
/// melt spending it. Returned by deploy and transfer, fed back into the
/// next lifecycle call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetState {
    /// Transaction carrying the token output.
    pub txid: TransactionId,
    /// Index of the token output; always 0 for transactions this library builds.
    pub index: u32,
    /// Human-readable outpoint, `<txid>_o<index>`.
    pub txoutpoint: String,
    /// Stable asset identifier, fixed at genesis.
    pub asset_id: AssetId,
    /// The covenant body the locking script was built around.
    #[serde(with = "hex")]
    pub static_template: Vec<u8>,
    /// Full locking script of the token output.
    #[serde(with = "hex")]
    pub locking_script: Vec<u8>,
    /// Compressed public key of the current owner.
    pub owner_public_key: PublicKey,
    /// Satoshis carried by the token output.
    pub satoshis: u64,
    /// Payload attached to the token output, if any.
    #[serde(default, with = "hex::opt")]
    pub payload: Option<Vec<u8>>,
}

/// Record of a completed melt: the token is gone, its satoshis released to
/// the receiver as a plain pay-to-public-key-hash output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeltRecord {
    /// Transaction that melted the token.
    pub txid: TransactionId,
    /// Index of the released output; always 0.
    pub index: u32,
    /// Human-readable outpoint, `<txid>_o<index>`.
    pub txoutpoint: String,
    /// Identifier of the asset that was melted.
    pub melted_asset_id: AssetId,
    /// The covenant body the melted token was built around.
    #[serde(with = "hex")]
    pub melted_static_template: Vec<u8>,
    /// Public key the released satoshis were paid to.
    pub melted_owner_public_key: PublicKey,
    /// Satoshis released from the token output.
    pub melted_satoshis: u64,
}

/// Formats the `<txid>_o<index>` outpoint string used in state records.
pub fn outpoint_string(txid: &TransactionId, index: u32) -> String {
    format!("{txid}_o{index}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_state_round_trips_through_json() {
        let txid: TransactionId = "880e2d30bd37e9dcbc4a2d21a60a82dbe1a270f29a3c8eda9b4a0ef0f58953c3".parse().unwrap();
        let state = AssetState {
            txid,
            index: 0,
            txoutpoint: outpoint_string(&txid, 0),
            asset_id: AssetId::new(txid, 0),
            static_template: vec![0x61],
            locking_script: vec![0x61, 0x6a, 0x24],
            owner_public_key: "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798".parse().unwrap(),
            satoshis: 3000,
            payload: Some(vec![0xde, 0xad]),
        };

        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"locking_script\":\"616a24\""));
        assert!(json.contains("\"payload\":\"dead\""));
        assert!(json.contains("_o0"));

        let decoded: AssetState = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.locking_script, state.locking_script);
        assert_eq!(decoded.payload, state.payload);
        assert_eq!(decoded.asset_id, state.asset_id);
    }

    #[test]
    fn test_absent_payload_defaults_to_none() {
        let txid = "11".repeat(32);
        let json = format!(
            r#"{{"txid":"{txid}","index":0,"txoutpoint":"{txid}_o0","asset_id":"{txid}00000000",
                "static_template":"61","locking_script":"61",
                "owner_public_key":"0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
                "satoshis":1}}"#
        );
        let decoded: AssetState = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.payload, None);
    }
}
