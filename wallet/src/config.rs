use serde::{Deserialize, Serialize};

use superasset_txscript::DEFAULT_COVENANT_TEMPLATE;

/// Placeholder substituted with the queried address when expanding
/// [`Config::utxo_url`].
pub const ADDRESS_PLACEHOLDER: &str = "ADDRESS_STR";

const DEFAULT_RELAY_BASE_URL: &str = "https://public.txq-app.com";
const DEFAULT_UTXO_URL: &str = "https://api.mattercloud.io/api/v3/main/address/ADDRESS_STR/utxo";
const DEFAULT_FEE_RATE: f64 = 0.5;
const DEFAULT_MIN_FEE: u64 = 1000;

/// Client configuration. [`Config::default`] targets the public mainnet
/// endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the transaction relay (mAPI-style endpoint).
    pub relay_base_url: String,
    /// UTXO query URL template; must contain [`ADDRESS_PLACEHOLDER`].
    pub utxo_url: String,
    /// Fee rate in satoshis per byte of serialized transaction.
    pub fee_rate: f64,
    /// Lower bound applied to every computed fee.
    pub min_fee: u64,
    /// Compiled covenant body prepended to every token locking script.
    /// The bundled default is a stand-in that enforces nothing.
    pub covenant_template: Vec<u8>,
    /// Emit debug logs for built transactions and fetched coins.
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            relay_base_url: DEFAULT_RELAY_BASE_URL.to_string(),
            utxo_url: DEFAULT_UTXO_URL.to_string(),
            fee_rate: DEFAULT_FEE_RATE,
            min_fee: DEFAULT_MIN_FEE,
            covenant_template: DEFAULT_COVENANT_TEMPLATE.to_vec(),
            verbose: false,
        }
    }
}

impl Config {
    /// Expands the UTXO URL template for the given address.
    pub fn utxo_url_for(&self, address: &str) -> String {
        self.utxo_url.replace(ADDRESS_PLACEHOLDER, address)
    }
}
