use thiserror::Error;

use superasset_core::tx::TransactionIdError;
use superasset_txscript::{PayloadError, ScriptBuilderError};

use crate::relay::PushResponse;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    InvalidPayload(#[from] PayloadError),

    #[error("Insufficient funds for {address}, largerThan: {larger_than}")]
    InsufficientFunds { address: String, larger_than: u64 },

    #[error(transparent)]
    ScriptBuilder(#[from] ScriptBuilderError),

    #[error(transparent)]
    TransactionId(#[from] TransactionIdError),

    #[error("hex decoding error: {0}")]
    Hex(#[from] faster_hex::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed relay response: {0}")]
    RelayResponse(#[from] serde_json::Error),

    #[error("transaction {local_txid} rejected by relay: {response:?}")]
    BroadcastRejected { local_txid: String, response: PushResponse },
}
