use crate::tx::{serialize_output, write_var_bytes, SignableTransaction};

use super::{sha256d, sighash_type::SigHashType};

const ZERO_HASH: [u8; 32] = [0u8; 32];

/// Hashes that stay constant while signing multiple inputs of the same
/// transaction, computed lazily and reused across calls.
#[derive(Default)]
pub struct SigHashReusedValues {
    previous_outputs_hash: Option<[u8; 32]>,
    sequence_hash: Option<[u8; 32]>,
    outputs_hash: Option<[u8; 32]>,
}

impl SigHashReusedValues {
    pub fn new() -> Self {
        Self::default()
    }
}

fn previous_outputs_hash(tx: &SignableTransaction, hash_type: SigHashType, reused_values: &mut SigHashReusedValues) -> [u8; 32] {
    if hash_type.is_sighash_anyone_can_pay() {
        return ZERO_HASH;
    }

    if let Some(previous_outputs_hash) = reused_values.previous_outputs_hash {
        previous_outputs_hash
    } else {
        let mut buf = Vec::with_capacity(tx.tx.inputs.len() * 36);
        for input in tx.tx.inputs.iter() {
            buf.extend_from_slice(input.previous_outpoint.transaction_id.as_bytes());
            buf.extend_from_slice(&input.previous_outpoint.index.to_le_bytes());
        }
        let hash = sha256d(&buf);
        reused_values.previous_outputs_hash = Some(hash);
        hash
    }
}

fn sequence_hash(tx: &SignableTransaction, hash_type: SigHashType, reused_values: &mut SigHashReusedValues) -> [u8; 32] {
    if hash_type.is_sighash_single() || hash_type.is_sighash_anyone_can_pay() || hash_type.is_sighash_none() {
        return ZERO_HASH;
    }

    if let Some(sequence_hash) = reused_values.sequence_hash {
        sequence_hash
    } else {
        let mut buf = Vec::with_capacity(tx.tx.inputs.len() * 4);
        for input in tx.tx.inputs.iter() {
            buf.extend_from_slice(&input.sequence.to_le_bytes());
        }
        let hash = sha256d(&buf);
        reused_values.sequence_hash = Some(hash);
        hash
    }
}

fn outputs_hash(
    tx: &SignableTransaction,
    hash_type: SigHashType,
    reused_values: &mut SigHashReusedValues,
    input_index: usize,
) -> [u8; 32] {
    if hash_type.is_sighash_none() {
        return ZERO_HASH;
    }

    if hash_type.is_sighash_single() {
        // If the relevant output exists - return its hash, otherwise return zero-hash
        if input_index >= tx.tx.outputs.len() {
            return ZERO_HASH;
        }
        let mut buf = Vec::new();
        serialize_output(&mut buf, &tx.tx.outputs[input_index]);
        return sha256d(&buf);
    }

    // Otherwise, hash all outputs. Re-use the hash if available.
    if let Some(outputs_hash) = reused_values.outputs_hash {
        outputs_hash
    } else {
        let mut buf = Vec::new();
        for output in tx.tx.outputs.iter() {
            serialize_output(&mut buf, output);
        }
        let hash = sha256d(&buf);
        reused_values.outputs_hash = Some(hash);
        hash
    }
}

/// Computes the sighash preimage for `input_index`. This is the byte sequence
/// the covenant script inspects, so it is exposed separately from the digest.
///
/// Layout: version | prevouts hash | sequence hash | outpoint | script code |
/// amount | sequence | outputs hash | lock time | hash type.
pub fn calc_signature_hash_preimage(
    tx: &SignableTransaction,
    input_index: usize,
    hash_type: SigHashType,
    reused_values: &mut SigHashReusedValues,
) -> Vec<u8> {
    let input = &tx.tx.inputs[input_index];
    let entry = &tx.entries[input_index];

    let mut preimage = Vec::with_capacity(156 + entry.script_public_key.len());
    preimage.extend_from_slice(&tx.tx.version.to_le_bytes());
    preimage.extend_from_slice(&previous_outputs_hash(tx, hash_type, reused_values));
    preimage.extend_from_slice(&sequence_hash(tx, hash_type, reused_values));
    preimage.extend_from_slice(input.previous_outpoint.transaction_id.as_bytes());
    preimage.extend_from_slice(&input.previous_outpoint.index.to_le_bytes());
    // script code: the locking script of the output being spent
    write_var_bytes(&mut preimage, &entry.script_public_key);
    preimage.extend_from_slice(&entry.amount.to_le_bytes());
    preimage.extend_from_slice(&input.sequence.to_le_bytes());
    preimage.extend_from_slice(&outputs_hash(tx, hash_type, reused_values, input_index));
    preimage.extend_from_slice(&tx.tx.lock_time.to_le_bytes());
    preimage.extend_from_slice(&hash_type.to_u32().to_le_bytes());
    preimage
}

/// The digest a signature over `input_index` commits to: double SHA-256 of
/// the preimage.
pub fn calc_signature_hash(
    tx: &SignableTransaction,
    input_index: usize,
    hash_type: SigHashType,
    reused_values: &mut SigHashReusedValues,
) -> [u8; 32] {
    sha256d(&calc_signature_hash_preimage(tx, input_index, hash_type, reused_values))
}
