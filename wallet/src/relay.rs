use async_trait::async_trait;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::result::Result;

pub const RETURN_RESULT_SUCCESS: &str = "success";

/// Verdict returned by the relay for a pushed transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushResponse {
    pub return_result: String,
    #[serde(default)]
    pub result_description: String,
    #[serde(default)]
    pub txid: String,
}

impl PushResponse {
    /// Whether the relay accepted the transaction under the expected id.
    pub fn accepted(&self, expected_txid: &str) -> bool {
        self.return_result == RETURN_RESULT_SUCCESS && self.txid == expected_txid
    }
}

/// mAPI responses wrap the miner's verdict as a JSON string inside an
/// envelope, alongside a signature over it.
#[derive(Deserialize)]
struct MapiEnvelope {
    payload: String,
}

/// Gateway for broadcasting raw transactions to the network.
#[async_trait]
pub trait RelayGateway: Send + Sync {
    async fn push_transaction(&self, tx_hex: &str) -> Result<PushResponse>;
}

/// [`RelayGateway`] backed by an mAPI-style HTTP endpoint.
pub struct HttpRelayGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRelayGateway {
    pub fn new(config: &Config) -> Self {
        Self { client: reqwest::Client::new(), base_url: config.relay_base_url.clone() }
    }
}

#[async_trait]
impl RelayGateway for HttpRelayGateway {
    async fn push_transaction(&self, tx_hex: &str) -> Result<PushResponse> {
        let url = format!("{}/mapi/tx", self.base_url);
        let envelope = self
            .client
            .post(url)
            .json(&serde_json::json!({ "rawtx": tx_hex }))
            .send()
            .await?
            .error_for_status()?
            .json::<MapiEnvelope>()
            .await?;
        Ok(serde_json::from_str(&envelope.payload)?)
    }
}
