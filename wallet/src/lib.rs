//! Client library for the SuperAsset token lifecycle: deploying an asset,
//! transferring it between owners and melting it back to plain satoshis.
//!
//! The heavy lifting happens in [`client::TokenClient`], which talks to a
//! [`utxo::UtxoSource`] for funding coins and a [`relay::RelayGateway`] for
//! broadcasting. Both boundaries are traits, with HTTP implementations
//! provided for production use and simple mocks used in the tests.

pub mod client;
pub mod config;
pub mod error;
pub mod fees;
pub mod relay;
pub mod result;
pub mod state;
pub mod utxo;

pub use client::TokenClient;
pub use config::Config;
pub use error::Error;
pub use relay::{HttpRelayGateway, PushResponse, RelayGateway};
pub use result::Result;
pub use state::{AssetState, MeltRecord};
pub use utxo::{FundingUtxo, HttpUtxoSource, UtxoSource};
