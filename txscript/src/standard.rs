//! Standard pay-to-public-key-hash scripts.

use superasset_core::{Address, PublicKey};

use crate::opcodes::codes::*;
use crate::script_builder::{ScriptBuilder, ScriptBuilderResult};

/// Creates a script that pays to the given 20-byte public key hash:
/// `OP_DUP OP_HASH160 <pkh> OP_EQUALVERIFY OP_CHECKSIG`.
pub fn pay_to_pub_key_hash(pub_key_hash: &[u8; 20]) -> Vec<u8> {
    let mut script = Vec::with_capacity(25);
    script.extend_from_slice(&[OpDup, OpHash160, OpData20]);
    script.extend_from_slice(pub_key_hash);
    script.extend_from_slice(&[OpEqualVerify, OpCheckSig]);
    script
}

/// Creates a script that pays to the given address.
pub fn pay_to_address_script(address: &Address) -> Vec<u8> {
    pay_to_pub_key_hash(address.payload())
}

/// Creates the unlocking script for a standard pay-to-public-key-hash
/// output: `<sig> <pubkey>`.
pub fn p2pkh_signature_script(signature: &[u8], pub_key: &PublicKey) -> ScriptBuilderResult<Vec<u8>> {
    let mut builder = ScriptBuilder::new();
    builder.add_data(signature)?.add_data(&pub_key.serialize())?;
    Ok(builder.drain())
}
