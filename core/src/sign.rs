use secp256k1::{Message, SECP256K1};

use crate::hashing::sighash::{calc_signature_hash, SigHashReusedValues};
use crate::hashing::sighash_type::SigHashType;
use crate::keys::PrivateKey;
use crate::tx::SignableTransaction;

/// Signs a 32-byte sighash digest and returns the script-level signature
/// encoding: DER bytes followed by the hash type byte. ECDSA nonces are
/// RFC6979-deterministic, so identical inputs produce identical signatures.
pub fn sign_hash(sighash: [u8; 32], key: &PrivateKey, hash_type: SigHashType) -> Vec<u8> {
    let msg = Message::from_digest(sighash);
    let sig = SECP256K1.sign_ecdsa(&msg, key.secret_key());
    let der = sig.serialize_der();
    let mut encoded = Vec::with_capacity(der.len() + 1);
    encoded.extend_from_slice(&der);
    encoded.push(hash_type.to_u8());
    encoded
}

/// Computes the sighash for `input_index` and signs it.
pub fn sign_input(
    tx: &SignableTransaction,
    input_index: usize,
    key: &PrivateKey,
    hash_type: SigHashType,
    reused_values: &mut SigHashReusedValues,
) -> Vec<u8> {
    sign_hash(calc_signature_hash(tx, input_index, hash_type, reused_values), key, hash_type)
}
