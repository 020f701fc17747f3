//! Script construction for the SuperAsset protocol: opcode constants, a
//! canonical script builder, standard pay-to-public-key-hash scripts, and
//! the covenant token script codec.

pub mod covenant;
pub mod opcodes;
pub mod script_builder;
pub mod standard;

/// Maximum allowed script size. The covenant ledger's post-Genesis rules
/// leave scripts effectively unbounded; this cap only guards against
/// runaway construction.
pub const MAX_SCRIPTS_SIZE: usize = 10_000_000;

/// Maximum size of a single pushed element. Covenant preimages routinely
/// exceed the historical 520-byte limit, so this follows the relaxed rules.
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 100_000;

pub use covenant::{
    genesis_script, live_script, melt_signature_script, parse_payload_hex, transfer_signature_script, PayloadError,
    DEFAULT_COVENANT_TEMPLATE, ZERO_OUTPOINT,
};
pub use script_builder::{ScriptBuilder, ScriptBuilderError, ScriptBuilderResult};
pub use standard::{p2pkh_signature_script, pay_to_address_script, pay_to_pub_key_hash};
