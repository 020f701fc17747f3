use async_trait::async_trait;

use superasset_core::{TransactionOutpoint, UtxoEntry};

use crate::config::Config;
use crate::error::Error;
use crate::result::Result;
use serde::{Deserialize, Serialize};

/// A spendable pay-to-public-key-hash coin as reported by a UTXO index.
/// Field names follow the JSON shape the public indexers serve.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingUtxo {
    pub txid: String,
    pub output_index: u32,
    pub satoshis: u64,
    pub script: String,
}

impl FundingUtxo {
    pub fn outpoint(&self) -> Result<TransactionOutpoint> {
        Ok(TransactionOutpoint::new(self.txid.parse()?, self.output_index))
    }

    /// The locking script of this coin, decoded from hex.
    pub fn script_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; self.script.len() / 2];
        faster_hex::hex_decode(self.script.as_bytes(), &mut bytes)?;
        Ok(bytes)
    }

    pub fn entry(&self) -> Result<UtxoEntry> {
        Ok(UtxoEntry::new(self.satoshis, self.script_bytes()?))
    }
}

/// Source of spendable funding coins for an address.
#[async_trait]
pub trait UtxoSource: Send + Sync {
    async fn utxos_for_address(&self, address: &str) -> Result<Vec<FundingUtxo>>;

    /// Returns the first coin strictly larger than `value` satoshis.
    async fn utxo_larger_than(&self, address: &str, value: u64) -> Result<FundingUtxo> {
        let utxos = self.utxos_for_address(address).await?;
        utxos
            .into_iter()
            .find(|utxo| utxo.satoshis > value)
            .ok_or_else(|| Error::InsufficientFunds { address: address.to_string(), larger_than: value })
    }
}

/// [`UtxoSource`] backed by an HTTP UTXO index.
pub struct HttpUtxoSource {
    client: reqwest::Client,
    config: Config,
}

impl HttpUtxoSource {
    pub fn new(config: &Config) -> Self {
        Self { client: reqwest::Client::new(), config: config.clone() }
    }
}

#[async_trait]
impl UtxoSource for HttpUtxoSource {
    async fn utxos_for_address(&self, address: &str) -> Result<Vec<FundingUtxo>> {
        let url = self.config.utxo_url_for(address);
        let utxos = self.client.get(url).send().await?.error_for_status()?.json::<Vec<FundingUtxo>>().await?;
        Ok(utxos)
    }
}
