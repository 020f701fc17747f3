pub const SIG_HASH_ALL: SigHashType = SigHashType(0x01);
pub const SIG_HASH_NONE: SigHashType = SigHashType(0x02);
pub const SIG_HASH_SINGLE: SigHashType = SigHashType(0x03);
pub const SIG_HASH_FORKID: SigHashType = SigHashType(0x40);
pub const SIG_HASH_ANY_ONE_CAN_PAY: SigHashType = SigHashType(0x80);

/// SIG_HASH_MASK defines the number of bits of the hash type which are used
/// to identify which outputs are signed.
pub const SIG_HASH_MASK: u8 = 0x1f;

/// Sighash mode for ordinary single-key spends.
pub const SIG_HASH_ALL_FORKID: SigHashType = SigHashType(SIG_HASH_ALL.0 | SIG_HASH_FORKID.0);

/// Sighash mode used for covenant inputs: the signature authorizes this
/// input's value and all outputs, while other inputs may vary freely.
pub const SIG_HASH_COVENANT: SigHashType = SigHashType(SIG_HASH_ALL.0 | SIG_HASH_FORKID.0 | SIG_HASH_ANY_ONE_CAN_PAY.0);

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SigHashType(pub(crate) u8);

impl SigHashType {
    pub fn is_sighash_all(self) -> bool {
        self.0 & SIG_HASH_MASK == SIG_HASH_ALL.0
    }

    pub fn is_sighash_none(self) -> bool {
        self.0 & SIG_HASH_MASK == SIG_HASH_NONE.0
    }

    pub fn is_sighash_single(self) -> bool {
        self.0 & SIG_HASH_MASK == SIG_HASH_SINGLE.0
    }

    pub fn is_sighash_anyone_can_pay(self) -> bool {
        self.0 & SIG_HASH_ANY_ONE_CAN_PAY.0 == SIG_HASH_ANY_ONE_CAN_PAY.0
    }

    pub fn has_forkid(self) -> bool {
        self.0 & SIG_HASH_FORKID.0 == SIG_HASH_FORKID.0
    }

    pub fn to_u8(self) -> u8 {
        self.0
    }

    /// The 4-byte little-endian form appended to sighash preimages.
    pub fn to_u32(self) -> u32 {
        self.0 as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(SIG_HASH_ALL_FORKID.is_sighash_all());
        assert!(SIG_HASH_ALL_FORKID.has_forkid());
        assert!(!SIG_HASH_ALL_FORKID.is_sighash_anyone_can_pay());

        assert!(SIG_HASH_COVENANT.is_sighash_all());
        assert!(SIG_HASH_COVENANT.is_sighash_anyone_can_pay());
        assert!(SIG_HASH_COVENANT.has_forkid());
        assert_eq!(SIG_HASH_COVENANT.to_u8(), 0xc1);

        assert!(SIG_HASH_NONE.is_sighash_none());
        assert!(SIG_HASH_SINGLE.is_sighash_single());
    }
}
