use log::debug;

use superasset_core::hashing::sighash::{calc_signature_hash_preimage, SigHashReusedValues};
use superasset_core::hashing::sighash_type::{SIG_HASH_ALL_FORKID, SIG_HASH_COVENANT};
use superasset_core::hashing::sha256d;
use superasset_core::sign::{sign_hash, sign_input};
use superasset_core::{
    Address, AssetId, PrivateKey, PublicKey, SignableTransaction, Transaction, TransactionId, TransactionInput,
    TransactionOutpoint, TransactionOutput, UtxoEntry,
};
use superasset_txscript::{
    genesis_script, live_script, melt_signature_script, p2pkh_signature_script, parse_payload_hex, pay_to_address_script,
    pay_to_pub_key_hash, transfer_signature_script,
};

use crate::config::Config;
use crate::error::Error;
use crate::fees::{finalize_with_fee, FUNDING_THRESHOLD, SIMULATION_FEE};
use crate::relay::{HttpRelayGateway, RelayGateway};
use crate::result::Result;
use crate::state::{outpoint_string, AssetState, MeltRecord};
use crate::utxo::{FundingUtxo, HttpUtxoSource, UtxoSource};

/// Token lifecycle client: deploys, transfers and melts assets over a UTXO
/// source and a broadcast relay.
pub struct TokenClient<U, R> {
    config: Config,
    utxo_source: U,
    relay: R,
}

impl TokenClient<HttpUtxoSource, HttpRelayGateway> {
    /// Creates a client wired to the HTTP endpoints named in `config`.
    pub fn connect(config: Config) -> Self {
        let utxo_source = HttpUtxoSource::new(&config);
        let relay = HttpRelayGateway::new(&config);
        Self::new(config, utxo_source, relay)
    }
}

impl<U: UtxoSource, R: RelayGateway> TokenClient<U, R> {
    pub fn new(config: Config, utxo_source: U, relay: R) -> Self {
        Self { config, utxo_source, relay }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Deploys a new asset: spends the funding address' coins into a genesis
    /// token output of `satoshis` owned by `initial_owner`, with change back
    /// to the funding address.
    pub async fn deploy(&self, initial_owner: &PublicKey, satoshis: u64, funding_key: &PrivateKey) -> Result<AssetState> {
        let funding_public_key = funding_key.to_public_key();
        let funding_address = Address::from_public_key(&funding_public_key);
        let utxos = self.utxo_source.utxos_for_address(&funding_address.to_string()).await?;
        if self.config.verbose {
            debug!("deploy: spending {} coins of {funding_address}", utxos.len());
        }
        let genesis = genesis_script(&self.config.covenant_template, initial_owner)?;

        let tx = finalize_with_fee(&self.config, self.config.min_fee, |fee| {
            self.build_deploy(&utxos, &genesis, satoshis, fee, funding_key, &funding_address)
        })?;
        let txid = self.broadcast(&tx).await?;

        Ok(AssetState {
            txid,
            index: 0,
            txoutpoint: outpoint_string(&txid, 0),
            asset_id: AssetId::new(txid, 0),
            static_template: self.config.covenant_template.clone(),
            locking_script: genesis,
            owner_public_key: *initial_owner,
            satoshis,
            payload: None,
        })
    }

    fn build_deploy(
        &self,
        utxos: &[FundingUtxo],
        genesis: &[u8],
        satoshis: u64,
        fee: u64,
        funding_key: &PrivateKey,
        funding_address: &Address,
    ) -> Result<Transaction> {
        let total: u64 = utxos.iter().map(|utxo| utxo.satoshis).sum();
        let needed = satoshis + fee;
        if total < needed {
            return Err(Error::InsufficientFunds { address: funding_address.to_string(), larger_than: needed });
        }

        let mut inputs = Vec::with_capacity(utxos.len());
        let mut entries = Vec::with_capacity(utxos.len());
        for utxo in utxos {
            inputs.push(TransactionInput::new(utxo.outpoint()?));
            entries.push(utxo.entry()?);
        }
        let outputs = vec![
            TransactionOutput::new(satoshis, genesis.to_vec()),
            TransactionOutput::new(total - needed, pay_to_address_script(funding_address)),
        ];

        let mut stx = SignableTransaction::new(Transaction::new(inputs, outputs), entries);
        let funding_public_key = funding_key.to_public_key();
        let mut reused = SigHashReusedValues::new();
        for input_index in 0..stx.tx.inputs.len() {
            let sig = sign_input(&stx, input_index, funding_key, SIG_HASH_ALL_FORKID, &mut reused);
            stx.tx.inputs[input_index].signature_script = p2pkh_signature_script(&sig, &funding_public_key)?;
        }
        Ok(stx.tx)
    }

    /// Transfers the asset to `next_owner`, optionally replacing its payload.
    /// `payload_update` must be an even-length hex string; an empty string
    /// (or `None`) leaves the new output without a payload.
    pub async fn transfer(
        &self,
        state: &AssetState,
        current_owner_key: &PrivateKey,
        next_owner: &PublicKey,
        funding_key: &PrivateKey,
        payload_update: Option<&str>,
    ) -> Result<AssetState> {
        let payload = match payload_update {
            Some(payload_update) => parse_payload_hex(payload_update)?,
            None => None,
        };
        let funding_public_key = funding_key.to_public_key();
        let funding_address = Address::from_public_key(&funding_public_key);
        let utxo = self.utxo_source.utxo_larger_than(&funding_address.to_string(), FUNDING_THRESHOLD).await?;
        if self.config.verbose {
            debug!("transfer: funding with {}:{} ({} sats)", utxo.txid, utxo.output_index, utxo.satoshis);
        }
        let new_script = live_script(&self.config.covenant_template, &state.asset_id, next_owner, payload.as_deref())?;

        let tx = finalize_with_fee(&self.config, SIMULATION_FEE, |fee| {
            let change = self.change_satoshis(&utxo, fee, &funding_address)?;
            let mut stx = self.token_spend_base(state, &utxo, TransactionOutput::new(state.satoshis, new_script.clone()), change, &funding_public_key)?;

            let mut reused = SigHashReusedValues::new();
            let preimage = calc_signature_hash_preimage(&stx, 0, SIG_HASH_COVENANT, &mut reused);
            let sig = sign_hash(sha256d(&preimage), current_owner_key, SIG_HASH_COVENANT);
            stx.tx.inputs[0].signature_script = transfer_signature_script(
                &sig,
                next_owner,
                &preimage,
                &funding_public_key.hash(),
                change,
                payload.as_deref(),
            )?;
            self.sign_funding_input(&mut stx, funding_key, &mut reused)?;
            Ok(stx.tx)
        })?;
        let txid = self.broadcast(&tx).await?;

        Ok(AssetState {
            txid,
            index: 0,
            txoutpoint: outpoint_string(&txid, 0),
            asset_id: state.asset_id,
            static_template: self.config.covenant_template.clone(),
            locking_script: new_script,
            owner_public_key: *next_owner,
            satoshis: state.satoshis,
            payload,
        })
    }

    /// Melts the asset: releases its satoshis to `receiver` as a plain
    /// pay-to-public-key-hash output, ending the asset's lifecycle.
    pub async fn melt(
        &self,
        state: &AssetState,
        current_owner_key: &PrivateKey,
        receiver: &PublicKey,
        funding_key: &PrivateKey,
    ) -> Result<MeltRecord> {
        let funding_public_key = funding_key.to_public_key();
        let funding_address = Address::from_public_key(&funding_public_key);
        let utxo = self.utxo_source.utxo_larger_than(&funding_address.to_string(), FUNDING_THRESHOLD).await?;
        if self.config.verbose {
            debug!("melt: funding with {}:{} ({} sats)", utxo.txid, utxo.output_index, utxo.satoshis);
        }
        let receiver_pkh = receiver.hash();

        let tx = finalize_with_fee(&self.config, SIMULATION_FEE, |fee| {
            let change = self.change_satoshis(&utxo, fee, &funding_address)?;
            let released = TransactionOutput::new(state.satoshis, pay_to_pub_key_hash(&receiver_pkh));
            let mut stx = self.token_spend_base(state, &utxo, released, change, &funding_public_key)?;

            let mut reused = SigHashReusedValues::new();
            let preimage = calc_signature_hash_preimage(&stx, 0, SIG_HASH_COVENANT, &mut reused);
            let sig = sign_hash(sha256d(&preimage), current_owner_key, SIG_HASH_COVENANT);
            stx.tx.inputs[0].signature_script =
                melt_signature_script(&sig, &receiver_pkh, &preimage, &funding_public_key.hash(), change)?;
            self.sign_funding_input(&mut stx, funding_key, &mut reused)?;
            Ok(stx.tx)
        })?;
        let txid = self.broadcast(&tx).await?;

        Ok(MeltRecord {
            txid,
            index: 0,
            txoutpoint: outpoint_string(&txid, 0),
            melted_asset_id: state.asset_id,
            melted_static_template: self.config.covenant_template.clone(),
            melted_owner_public_key: *receiver,
            melted_satoshis: state.satoshis,
        })
    }

    fn change_satoshis(&self, utxo: &FundingUtxo, fee: u64, funding_address: &Address) -> Result<u64> {
        utxo.satoshis
            .checked_sub(fee)
            .ok_or_else(|| Error::InsufficientFunds { address: funding_address.to_string(), larger_than: fee })
    }

    /// Builds the unsigned two-input skeleton shared by transfer and melt:
    /// the token output spent at input 0, the funding coin at input 1, the
    /// successor output at 0 and funding change at 1.
    fn token_spend_base(
        &self,
        state: &AssetState,
        utxo: &FundingUtxo,
        successor: TransactionOutput,
        change: u64,
        funding_public_key: &PublicKey,
    ) -> Result<SignableTransaction> {
        let inputs = vec![
            TransactionInput::new(TransactionOutpoint::new(state.txid, state.index)),
            TransactionInput::new(utxo.outpoint()?),
        ];
        let outputs = vec![successor, TransactionOutput::new(change, pay_to_pub_key_hash(&funding_public_key.hash()))];
        let entries = vec![UtxoEntry::new(state.satoshis, state.locking_script.clone()), utxo.entry()?];
        Ok(SignableTransaction::new(Transaction::new(inputs, outputs), entries))
    }

    fn sign_funding_input(
        &self,
        stx: &mut SignableTransaction,
        funding_key: &PrivateKey,
        reused: &mut SigHashReusedValues,
    ) -> Result<()> {
        let sig = sign_input(stx, 1, funding_key, SIG_HASH_COVENANT, reused);
        stx.tx.inputs[1].signature_script = p2pkh_signature_script(&sig, &funding_key.to_public_key())?;
        Ok(())
    }

    async fn broadcast(&self, tx: &Transaction) -> Result<TransactionId> {
        let local_txid = tx.id();
        let hex = tx.to_hex();
        if self.config.verbose {
            debug!("broadcasting {local_txid}: {hex}");
        }
        let response = self.relay.push_transaction(&hex).await?;
        if response.accepted(&local_txid.to_string()) {
            Ok(local_txid)
        } else {
            Err(Error::BroadcastRejected { local_txid: local_txid.to_string(), response })
        }
    }
}
