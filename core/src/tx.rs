use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::hashing::sha256d;

/// The wire size of a serialized outpoint (txid + output index).
pub const OUTPOINT_SIZE: usize = 36;

/// Transaction version used for every transaction this library builds.
pub const TX_VERSION: u32 = 1;

/// Final sequence number; none of the lifecycle transactions use relative locks.
pub const SEQUENCE_FINAL: u32 = 0xffffffff;

#[derive(Error, PartialEq, Eq, Debug, Clone)]
pub enum TransactionIdError {
    #[error("transaction id must be 64 hex characters, got {0}")]
    InvalidLength(usize),

    #[error("transaction id is not valid hex")]
    InvalidHex,
}

/// A transaction id, stored in internal (wire) byte order. The hex form used
/// everywhere outside the wire encoding is byte-reversed, following ledger
/// convention.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TransactionId([u8; 32]);

impl TransactionId {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Bytes in wire order, as they appear inside serialized transactions.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        f.write_str(&faster_hex::hex_string(&reversed))
    }
}

impl std::fmt::Debug for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl FromStr for TransactionId {
    type Err = TransactionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 64 {
            return Err(TransactionIdError::InvalidLength(s.len()));
        }
        let mut bytes = [0u8; 32];
        faster_hex::hex_decode(s.as_bytes(), &mut bytes).map_err(|_| TransactionIdError::InvalidHex)?;
        bytes.reverse();
        Ok(Self(bytes))
    }
}

impl Serialize for TransactionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// A reference to the output of a previous transaction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct TransactionOutpoint {
    pub transaction_id: TransactionId,
    pub index: u32,
}

impl TransactionOutpoint {
    pub fn new(transaction_id: TransactionId, index: u32) -> Self {
        Self { transaction_id, index }
    }
}

impl Display for TransactionOutpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.transaction_id, self.index)
    }
}

/// A transaction input
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TransactionInput {
    pub previous_outpoint: TransactionOutpoint,
    pub signature_script: Vec<u8>,
    pub sequence: u32,
}

impl TransactionInput {
    pub fn new(previous_outpoint: TransactionOutpoint) -> Self {
        Self { previous_outpoint, signature_script: Vec::new(), sequence: SEQUENCE_FINAL }
    }
}

/// A transaction output
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TransactionOutput {
    pub value: u64,
    pub script_public_key: Vec<u8>,
}

impl TransactionOutput {
    pub fn new(value: u64, script_public_key: Vec<u8>) -> Self {
        Self { value, script_public_key }
    }
}

/// Details of the output a transaction input spends: the amount and the
/// locking script, both of which feed the sighash computation.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct UtxoEntry {
    pub amount: u64,
    pub script_public_key: Vec<u8>,
}

impl UtxoEntry {
    pub fn new(amount: u64, script_public_key: Vec<u8>) -> Self {
        Self { amount, script_public_key }
    }
}

/// A ledger transaction
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub lock_time: u32,
}

impl Transaction {
    pub fn new(inputs: Vec<TransactionInput>, outputs: Vec<TransactionOutput>) -> Self {
        Self { version: TX_VERSION, inputs, outputs, lock_time: 0 }
    }

    /// Serializes the transaction into its wire encoding.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.estimate_size());
        buf.extend_from_slice(&self.version.to_le_bytes());
        write_var_int(&mut buf, self.inputs.len() as u64);
        for input in self.inputs.iter() {
            buf.extend_from_slice(input.previous_outpoint.transaction_id.as_bytes());
            buf.extend_from_slice(&input.previous_outpoint.index.to_le_bytes());
            write_var_bytes(&mut buf, &input.signature_script);
            buf.extend_from_slice(&input.sequence.to_le_bytes());
        }
        write_var_int(&mut buf, self.outputs.len() as u64);
        for output in self.outputs.iter() {
            serialize_output(&mut buf, output);
        }
        buf.extend_from_slice(&self.lock_time.to_le_bytes());
        buf
    }

    pub fn to_hex(&self) -> String {
        faster_hex::hex_string(&self.serialize())
    }

    /// The canonical transaction id: double SHA-256 of the wire encoding.
    pub fn id(&self) -> TransactionId {
        TransactionId::from_bytes(sha256d(&self.serialize()))
    }

    fn estimate_size(&self) -> usize {
        let inputs: usize = self.inputs.iter().map(|input| OUTPOINT_SIZE + 9 + input.signature_script.len() + 4).sum();
        let outputs: usize = self.outputs.iter().map(|output| 8 + 5 + output.script_public_key.len()).sum();
        4 + 9 + inputs + 9 + outputs + 4
    }
}

/// A transaction paired with the utxo entry backing each of its inputs, which
/// is the information signing and sighash computation need beyond the
/// transaction itself. Entries are index-aligned with `tx.inputs`.
#[derive(Clone, Debug)]
pub struct SignableTransaction {
    pub tx: Transaction,
    pub entries: Vec<UtxoEntry>,
}

impl SignableTransaction {
    pub fn new(tx: Transaction, entries: Vec<UtxoEntry>) -> Self {
        assert_eq!(tx.inputs.len(), entries.len(), "every input needs a backing utxo entry");
        Self { tx, entries }
    }
}

pub(crate) fn serialize_output(buf: &mut Vec<u8>, output: &TransactionOutput) {
    buf.extend_from_slice(&output.value.to_le_bytes());
    write_var_bytes(buf, &output.script_public_key);
}

/// Writes `n` in the ledger's variable-length integer encoding.
pub fn write_var_int(buf: &mut Vec<u8>, n: u64) {
    if n < 0xfd {
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(0xfd);
        buf.extend_from_slice(&(n as u16).to_le_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(0xfe);
        buf.extend_from_slice(&(n as u32).to_le_bytes());
    } else {
        buf.push(0xff);
        buf.extend_from_slice(&n.to_le_bytes());
    }
}

/// Writes a length-prefixed byte string.
pub fn write_var_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    write_var_int(buf, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tx() -> Transaction {
        let outpoint = TransactionOutpoint::new("aa".repeat(32).parse().unwrap(), 1);
        Transaction::new(
            vec![TransactionInput::new(outpoint)],
            vec![TransactionOutput::new(5000, vec![0x51]), TransactionOutput::new(1000, vec![0x52])],
        )
    }

    #[test]
    fn test_var_int_encoding() {
        struct Test {
            value: u64,
            expected: Vec<u8>,
        }
        let tests = vec![
            Test { value: 0, expected: vec![0x00] },
            Test { value: 0xfc, expected: vec![0xfc] },
            Test { value: 0xfd, expected: vec![0xfd, 0xfd, 0x00] },
            Test { value: 0xffff, expected: vec![0xfd, 0xff, 0xff] },
            Test { value: 0x10000, expected: vec![0xfe, 0x00, 0x00, 0x01, 0x00] },
            Test { value: 0xffff_ffff, expected: vec![0xfe, 0xff, 0xff, 0xff, 0xff] },
            Test { value: 0x1_0000_0000, expected: vec![0xff, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00] },
        ];
        for test in tests {
            let mut buf = Vec::new();
            write_var_int(&mut buf, test.value);
            assert_eq!(buf, test.expected, "wrong encoding for {}", test.value);
        }
    }

    #[test]
    fn test_transaction_id_hex_round_trip() {
        let hex = "880eb9819a31821d9d2399e2f35e2433b72637e393d71ecc9b8d0250f49153c3";
        let id: TransactionId = hex.parse().unwrap();
        assert_eq!(id.to_string(), hex);
        // Display is byte-reversed relative to the wire order
        assert_eq!(id.as_bytes()[0], 0xc3);
        assert_eq!(id.as_bytes()[31], 0x88);
    }

    #[test]
    fn test_transaction_id_rejects_bad_input() {
        assert_eq!("00".parse::<TransactionId>(), Err(TransactionIdError::InvalidLength(2)));
        assert_eq!("zz".repeat(32).parse::<TransactionId>(), Err(TransactionIdError::InvalidHex));
    }

    #[test]
    fn test_serialized_layout() {
        let tx = sample_tx();
        let bytes = tx.serialize();
        // version | 1 input (outpoint + empty script + sequence) | 2 outputs | lock time
        assert_eq!(bytes.len(), 4 + 1 + (36 + 1 + 4) + 1 + 2 * (8 + 1 + 1) + 4);
        assert_eq!(&bytes[0..4], &1u32.to_le_bytes());
        assert_eq!(bytes[4], 1, "input count");
        // outpoint txid is in wire order (reversed display hex)
        assert_eq!(&bytes[5..37], "aa".repeat(32).parse::<TransactionId>().unwrap().as_bytes());
        assert_eq!(&bytes[37..41], &1u32.to_le_bytes());
    }

    #[test]
    fn test_id_changes_with_content() {
        let tx = sample_tx();
        let mut modified = tx.clone();
        modified.outputs[0].value += 1;
        assert_eq!(tx.id(), tx.id());
        assert_ne!(tx.id(), modified.id());
        assert_eq!(tx.id().to_string().len(), 64);
    }
}
