//! Opcode values for the Bitcoin-style script dialect the covenant ledger
//! executes. Only the opcodes this library emits or recognizes are listed.

pub const OP_SMALL_INT_MIN_VAL: u8 = 1;
pub const OP_SMALL_INT_MAX_VAL: u8 = 16;
pub const OP_DATA_MIN_VAL: u8 = self::codes::OpData1;
pub const OP_DATA_MAX_VAL: u8 = self::codes::OpData75;
pub const OP_1_NEGATE_VAL: u8 = 0x81;

#[allow(non_upper_case_globals)]
pub mod codes {
    pub const OpFalse: u8 = 0x00;
    pub const Op0: u8 = 0x00;
    pub const OpData1: u8 = 0x01;
    pub const OpData20: u8 = 0x14;
    pub const OpData32: u8 = 0x20;
    pub const OpData33: u8 = 0x21;
    pub const OpData36: u8 = 0x24;
    pub const OpData75: u8 = 0x4b;
    pub const OpPushData1: u8 = 0x4c;
    pub const OpPushData2: u8 = 0x4d;
    pub const OpPushData4: u8 = 0x4e;
    pub const Op1Negate: u8 = 0x4f;
    pub const OpTrue: u8 = 0x51;
    pub const Op1: u8 = 0x51;
    pub const Op2: u8 = 0x52;
    pub const Op3: u8 = 0x53;
    pub const Op4: u8 = 0x54;
    pub const Op5: u8 = 0x55;
    pub const Op6: u8 = 0x56;
    pub const Op7: u8 = 0x57;
    pub const Op8: u8 = 0x58;
    pub const Op9: u8 = 0x59;
    pub const Op10: u8 = 0x5a;
    pub const Op11: u8 = 0x5b;
    pub const Op12: u8 = 0x5c;
    pub const Op13: u8 = 0x5d;
    pub const Op14: u8 = 0x5e;
    pub const Op15: u8 = 0x5f;
    pub const Op16: u8 = 0x60;
    pub const OpNop: u8 = 0x61;
    pub const OpReturn: u8 = 0x6a;
    pub const OpDup: u8 = 0x76;
    pub const OpEqual: u8 = 0x87;
    pub const OpEqualVerify: u8 = 0x88;
    pub const OpRipemd160: u8 = 0xa6;
    pub const OpSha256: u8 = 0xa8;
    pub const OpHash160: u8 = 0xa9;
    pub const OpHash256: u8 = 0xaa;
    pub const OpCheckSig: u8 = 0xac;
    pub const OpCheckSigVerify: u8 = 0xad;
    pub const OpCheckMultiSig: u8 = 0xae;
}
