//! Token script codec for the covenant protocol.
//!
//! A token output's locking script is the covenant template followed by an
//! `OP_RETURN` state section: a 36-byte predecessor outpoint push (all zeros
//! at genesis), the current owner's compressed public key, and an optional
//! payload push. Unlocking scripts supply the witness elements the covenant
//! template consumes, in the order it expects them.

use thiserror::Error;

use superasset_core::{AssetId, PublicKey};

use crate::opcodes::codes::*;
use crate::script_builder::{ScriptBuilder, ScriptBuilderResult};

/// The predecessor outpoint pushed at genesis, before the asset identifier
/// exists.
pub const ZERO_OUTPOINT: [u8; 36] = [0u8; 36];

/// Stand-in covenant template used when the caller does not supply the
/// compiled covenant body. It keeps script layout intact so state parsing
/// and fee sizing behave like the real thing, but enforces nothing.
pub const DEFAULT_COVENANT_TEMPLATE: &[u8] = &[OpNop];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Invalid payload. Even length hex string required.")]
    InvalidHex,
}

/// Parses a user-supplied payload string. An empty string means "no
/// payload"; anything else must be an even-length hex string.
pub fn parse_payload_hex(payload: &str) -> Result<Option<Vec<u8>>, PayloadError> {
    if payload.is_empty() {
        return Ok(None);
    }
    if payload.len() % 2 != 0 || !payload.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(PayloadError::InvalidHex);
    }
    let mut decoded = vec![0u8; payload.len() / 2];
    faster_hex::hex_decode(payload.as_bytes(), &mut decoded).map_err(|_| PayloadError::InvalidHex)?;
    Ok(Some(decoded))
}

// The covenant re-derives the successor locking script and compares it
// byte-for-byte, so state pushes use the plain length-prefixed encoding:
// a one-byte payload must not collapse into a small-int opcode.
fn state_section(builder: &mut ScriptBuilder, outpoint: &[u8; 36], owner: &PublicKey, payload: Option<&[u8]>) -> ScriptBuilderResult<()> {
    builder.add_op(OpReturn)?.add_plain_data(outpoint)?.add_plain_data(&owner.serialize())?;
    if let Some(payload) = payload {
        builder.add_plain_data(payload)?;
    }
    Ok(())
}

/// Builds the genesis locking script: the covenant template followed by the
/// all-zero predecessor outpoint and the initial owner's public key. The
/// genesis output carries no payload.
pub fn genesis_script(template: &[u8], initial_owner: &PublicKey) -> ScriptBuilderResult<Vec<u8>> {
    let mut builder = ScriptBuilder::new();
    builder.add_ops(template)?;
    state_section(&mut builder, &ZERO_OUTPOINT, initial_owner, None)?;
    Ok(builder.drain())
}

/// Builds the locking script of a live (post-genesis) token output. The
/// predecessor outpoint push is the asset identifier in wire form, which
/// pins the output to its lineage.
pub fn live_script(template: &[u8], asset_id: &AssetId, owner: &PublicKey, payload: Option<&[u8]>) -> ScriptBuilderResult<Vec<u8>> {
    let mut builder = ScriptBuilder::new();
    builder.add_ops(template)?;
    state_section(&mut builder, &asset_id.to_wire(), owner, payload)?;
    Ok(builder.drain())
}

/// Builds the unlocking script spending a token output in a transfer. The
/// covenant consumes, in order: the current owner's signature, the next
/// owner's public key, the full sighash preimage, the change recipient's
/// public key hash, the change amount, and the payload (an empty push when
/// the token carries none).
pub fn transfer_signature_script(
    signature: &[u8],
    next_owner: &PublicKey,
    preimage: &[u8],
    change_pub_key_hash: &[u8; 20],
    change_amount: u64,
    payload: Option<&[u8]>,
) -> ScriptBuilderResult<Vec<u8>> {
    let mut builder = ScriptBuilder::new();
    builder
        .add_data(signature)?
        .add_data(&next_owner.serialize())?
        .add_data(preimage)?
        .add_data(change_pub_key_hash)?
        .add_i64(change_amount as i64)?
        .add_data(payload.unwrap_or_default())?;
    Ok(builder.drain())
}

/// Builds the unlocking script spending a token output in a melt. The
/// covenant consumes the owner's signature, the receiver's public key hash,
/// the full sighash preimage, the change recipient's public key hash, and
/// the change amount.
pub fn melt_signature_script(
    signature: &[u8],
    receiver_pub_key_hash: &[u8; 20],
    preimage: &[u8],
    change_pub_key_hash: &[u8; 20],
    change_amount: u64,
) -> ScriptBuilderResult<Vec<u8>> {
    let mut builder = ScriptBuilder::new();
    builder
        .add_data(signature)?
        .add_data(receiver_pub_key_hash)?
        .add_data(preimage)?
        .add_data(change_pub_key_hash)?
        .add_i64(change_amount as i64)?;
    Ok(builder.drain())
}
