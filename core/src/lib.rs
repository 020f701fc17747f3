//! Ledger primitives for the SuperAsset token protocol: transactions and
//! their wire encoding, asset identifiers, sighash computation, keys,
//! addresses and ECDSA signing.

pub mod address;
pub mod asset;
pub mod hashing;
pub mod keys;
pub mod sign;
pub mod tx;

pub use address::Address;
pub use asset::AssetId;
pub use keys::{PrivateKey, PublicKey};
pub use tx::{
    SignableTransaction, Transaction, TransactionId, TransactionInput, TransactionOutpoint, TransactionOutput, UtxoEntry,
};
