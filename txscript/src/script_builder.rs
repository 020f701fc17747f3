use std::iter::once;

use thiserror::Error;

use crate::{
    opcodes::{codes::*, OP_1_NEGATE_VAL, OP_DATA_MAX_VAL, OP_DATA_MIN_VAL, OP_SMALL_INT_MAX_VAL},
    MAX_SCRIPTS_SIZE, MAX_SCRIPT_ELEMENT_SIZE,
};

/// Default size used for the backing array of a script being built. The
/// array grows as needed; covenant locking scripts usually fit within this.
const DEFAULT_SCRIPT_ALLOC: usize = 512;

#[derive(Error, PartialEq, Eq, Debug, Clone, Copy)]
pub enum ScriptBuilderError {
    #[error("adding opcode {0} would exceed the maximum allowed canonical script length of {MAX_SCRIPTS_SIZE}")]
    OpCodeRejected(u8),

    #[error("adding {0} opcodes would exceed the maximum allowed canonical script length of {MAX_SCRIPTS_SIZE}")]
    OpCodesRejected(usize),

    #[error("adding {0} bytes of data would exceed the maximum allowed canonical script length of {MAX_SCRIPTS_SIZE}")]
    DataRejected(usize),

    #[error("adding a data element of {0} bytes exceed the maximum allowed script element size of {MAX_SCRIPT_ELEMENT_SIZE}")]
    ElementExceedsMaxSize(usize),

    #[error("adding integer {0} would exceed the maximum allowed canonical script length of {MAX_SCRIPTS_SIZE}")]
    IntegerRejected(i64),
}
pub type ScriptBuilderResult<T> = std::result::Result<T, ScriptBuilderError>;

/// ScriptBuilder provides a facility for building custom scripts. It allows
/// you to push opcodes, ints, and data while respecting canonical encoding.
/// In general it does not ensure the script will execute correctly, however
/// any data pushes which would exceed the maximum allowed script engine
/// limits are rejected with an error.
pub struct ScriptBuilder {
    script: Vec<u8>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self { script: Vec::with_capacity(DEFAULT_SCRIPT_ALLOC) }
    }

    pub fn script(&self) -> &[u8] {
        &self.script
    }

    pub fn drain(&mut self) -> Vec<u8> {
        // The builder is not supposed to be reused after a call to drain,
        // so the replacement vector gets no predefined capacity.
        std::mem::take(&mut self.script)
    }

    /// Pushes the passed opcode to the end of the script. The script will not
    /// be modified if pushing the opcode would cause the script to exceed the
    /// maximum allowed script engine size.
    pub fn add_op(&mut self, opcode: u8) -> ScriptBuilderResult<&mut Self> {
        if self.script.len() >= MAX_SCRIPTS_SIZE {
            return Err(ScriptBuilderError::OpCodeRejected(opcode));
        }

        self.script.push(opcode);
        Ok(self)
    }

    pub fn add_ops(&mut self, opcodes: &[u8]) -> ScriptBuilderResult<&mut Self> {
        if self.script.len() + opcodes.len() > MAX_SCRIPTS_SIZE {
            return Err(ScriptBuilderError::OpCodesRejected(opcodes.len()));
        }

        self.script.extend_from_slice(opcodes);
        Ok(self)
    }

    /// Returns the number of bytes the canonical encoding of the data will take.
    pub fn canonical_data_size(data: &[u8]) -> usize {
        let data_len = data.len();

        // When the data consists of a single number that can be represented
        // by one of the "small integer" opcodes, that opcode is used instead
        // of a data push opcode followed by the number.
        if data_len == 0 || (data_len == 1 && (data[0] <= OP_SMALL_INT_MAX_VAL || data[0] == OP_1_NEGATE_VAL)) {
            return 1;
        }

        data_len
            + if data_len <= OP_DATA_MAX_VAL as usize {
                1 // length encoded as OpData#
            } else if data_len <= u8::MAX as usize {
                2 // length encoded as OpPushData1 + 1 byte for value
            } else if data_len <= u16::MAX as usize {
                3 // length encoded as OpPushData2 + 2 bytes for value
            } else {
                5 // length encoded as OpPushData4 + 4 bytes for value
            }
    }

    /// Internal function that actually pushes the passed data to the end of
    /// the script. It automatically chooses canonical opcodes depending on
    /// the length of the data. A zero length buffer will lead to a push of
    /// empty data onto the stack (Op0). No data limits are enforced here.
    fn add_raw_data(&mut self, data: &[u8]) -> &mut Self {
        let data_len = data.len();

        if data_len == 0 || (data_len == 1 && data[0] == 0) {
            self.script.push(Op0);
            return self;
        } else if data_len == 1 && data[0] <= OP_SMALL_INT_MAX_VAL {
            self.script.push((Op1 - 1) + data[0]);
            return self;
        } else if data_len == 1 && data[0] == OP_1_NEGATE_VAL {
            self.script.push(Op1Negate);
            return self;
        }

        self.push_length_prefixed(data);
        self
    }

    /// Emits the smallest length-prefixed push instruction (OpData# or
    /// OpPushData#) followed by the data itself.
    fn push_length_prefixed(&mut self, data: &[u8]) {
        let data_len = data.len();
        if data_len <= OP_DATA_MAX_VAL as usize {
            self.script.push((OP_DATA_MIN_VAL - 1) + data_len as u8);
        } else if data_len <= u8::MAX as usize {
            self.script.extend(once(OpPushData1).chain(once(data_len as u8)));
        } else if data_len <= u16::MAX as usize {
            self.script.extend(once(OpPushData2).chain((data_len as u16).to_le_bytes()));
        } else {
            self.script.extend(once(OpPushData4).chain((data_len as u32).to_le_bytes()));
        }
        self.script.extend(data);
    }

    /// Pushes the passed data with the plain length-prefixed encoding even
    /// when a small-integer opcode could represent it. Scripts that are
    /// re-derived and compared byte-for-byte must not let the encoding vary
    /// with the pushed value, so they cannot use the minimal-push rules of
    /// [`add_data`](Self::add_data). An empty buffer still encodes as Op0.
    pub fn add_plain_data(&mut self, data: &[u8]) -> ScriptBuilderResult<&mut Self> {
        let data_len = data.len();
        if data_len > MAX_SCRIPT_ELEMENT_SIZE {
            return Err(ScriptBuilderError::ElementExceedsMaxSize(data_len));
        }
        if self.script.len() + data_len + 5 > MAX_SCRIPTS_SIZE {
            return Err(ScriptBuilderError::DataRejected(data_len));
        }

        if data_len == 0 {
            self.script.push(Op0);
            return Ok(self);
        }
        self.push_length_prefixed(data);
        Ok(self)
    }

    /// Pushes the passed data to the end of the script, choosing canonical
    /// opcodes depending on the length of the data.
    ///
    /// A zero length buffer will lead to a push of empty data onto the stack
    /// (Op0 = OpFalse), and any push of data greater than
    /// [`MAX_SCRIPT_ELEMENT_SIZE`] will not modify the script. The script is
    /// also left unmodified if pushing the data would cause it to exceed
    /// [`MAX_SCRIPTS_SIZE`].
    pub fn add_data(&mut self, data: &[u8]) -> ScriptBuilderResult<&mut Self> {
        let data_size = Self::canonical_data_size(data);

        if self.script.len() + data_size > MAX_SCRIPTS_SIZE {
            return Err(ScriptBuilderError::DataRejected(data_size));
        }

        let data_len = data.len();
        if data_len > MAX_SCRIPT_ELEMENT_SIZE {
            return Err(ScriptBuilderError::ElementExceedsMaxSize(data_len));
        }

        Ok(self.add_raw_data(data))
    }

    /// Pushes a signed integer in the script number encoding (little-endian,
    /// sign-magnitude, minimal length).
    pub fn add_i64(&mut self, val: i64) -> ScriptBuilderResult<&mut Self> {
        if self.script.len() + 1 > MAX_SCRIPTS_SIZE {
            return Err(ScriptBuilderError::IntegerRejected(val));
        }

        // Fast path for small integers and Op1Negate.
        if val == 0 {
            self.script.push(Op0);
            return Ok(self);
        }
        if val == -1 || (1..=16).contains(&val) {
            self.script.push(((Op1 as i64 - 1) + val) as u8);
            return Ok(self);
        }

        let bytes = serialize_script_num(val);
        self.add_data(&bytes)
    }
}

impl Default for ScriptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal script number encoding: little-endian magnitude with the sign in
/// the high bit of the final byte.
fn serialize_script_num(val: i64) -> Vec<u8> {
    if val == 0 {
        return Vec::new();
    }

    let negative = val < 0;
    let mut magnitude = val.unsigned_abs();
    let mut result = Vec::with_capacity(9);
    while magnitude > 0 {
        result.push((magnitude & 0xff) as u8);
        magnitude >>= 8;
    }

    // A set high bit would flip the sign, so an extra byte carries it.
    if result[result.len() - 1] & 0x80 != 0 {
        result.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        let last = result.len() - 1;
        result[last] |= 0x80;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::iter::{once, repeat};

    // Tests that pushing opcodes to a script via the ScriptBuilder API works as expected.
    #[test]
    fn test_add_op() {
        struct Test {
            name: &'static str,
            opcodes: Vec<u8>,
            expected: Vec<u8>,
        }

        let tests = vec![
            Test { name: "push OP_FALSE", opcodes: vec![OpFalse], expected: vec![OpFalse] },
            Test { name: "push OP_TRUE", opcodes: vec![OpTrue], expected: vec![OpTrue] },
            Test { name: "push OP_1 OP_2", opcodes: vec![Op1, Op2], expected: vec![Op1, Op2] },
            Test { name: "push OP_HASH160 OP_EQUAL", opcodes: vec![OpHash160, OpEqual], expected: vec![OpHash160, OpEqual] },
        ];

        for test in tests.iter() {
            let mut builder = ScriptBuilder::new();
            test.opcodes.iter().for_each(|opcode| {
                builder.add_op(*opcode).expect("the script is canonical");
            });
            assert_eq!(builder.script(), &test.expected, "{} wrong result using add_op", test.name);
        }

        for test in tests.iter() {
            let mut builder = ScriptBuilder::new();
            let result = builder.add_ops(&test.opcodes).expect("the script is canonical").script();
            assert_eq!(result, &test.expected, "{} wrong result using add_ops", test.name);
        }
    }

    /// Tests that pushing signed integers to a script via the ScriptBuilder API works as expected.
    #[test]
    fn test_add_i64() {
        struct Test {
            name: &'static str,
            val: i64,
            expected: Vec<u8>,
        }

        let tests = vec![
            Test { name: "push -1", val: -1, expected: vec![Op1Negate] },
            Test { name: "push small int 0", val: 0, expected: vec![Op0] },
            Test { name: "push small int 1", val: 1, expected: vec![Op1] },
            Test { name: "push small int 16", val: 16, expected: vec![Op16] },
            Test { name: "push 17", val: 17, expected: vec![OpData1, 0x11] },
            Test { name: "push 65", val: 65, expected: vec![OpData1, 0x41] },
            Test { name: "push 127", val: 127, expected: vec![OpData1, 0x7f] },
            Test { name: "push 128", val: 128, expected: vec![OpData1 + 1, 0x80, 0] },
            Test { name: "push 255", val: 255, expected: vec![OpData1 + 1, 0xff, 0] },
            Test { name: "push 256", val: 256, expected: vec![OpData1 + 1, 0, 0x01] },
            Test { name: "push 32767", val: 32767, expected: vec![OpData1 + 1, 0xff, 0x7f] },
            Test { name: "push 32768", val: 32768, expected: vec![OpData1 + 2, 0, 0x80, 0] },
            Test { name: "push -2", val: -2, expected: vec![OpData1, 0x82] },
            Test { name: "push -127", val: -127, expected: vec![OpData1, 0xff] },
            Test { name: "push -128", val: -128, expected: vec![OpData1 + 1, 0x80, 0x80] },
            Test { name: "push 1000000", val: 1_000_000, expected: vec![OpData1 + 2, 0x40, 0x42, 0x0f] },
        ];

        for test in tests {
            let mut builder = ScriptBuilder::new();
            let result = builder.add_i64(test.val).expect("the script is canonical").script();
            assert_eq!(result, test.expected, "{} wrong result", test.name);
        }
    }

    /// Tests that pushing data to a script works as expected and conforms to BIP0062.
    #[test]
    fn test_add_data() {
        struct Test {
            name: &'static str,
            data: Vec<u8>,
            expected: ScriptBuilderResult<Vec<u8>>,
        }

        let tests = vec![
            // BIP0062: Pushing an empty byte sequence must use OP_0.
            Test { name: "push empty byte sequence", data: vec![], expected: Ok(vec![Op0]) },
            Test { name: "push 1 byte 0x00", data: vec![0x00], expected: Ok(vec![Op0]) },
            // BIP0062: Pushing a 1-byte sequence of byte 0x01 through 0x10 must use OP_n.
            Test { name: "push 1 byte 0x01", data: vec![0x01], expected: Ok(vec![Op1]) },
            Test { name: "push 1 byte 0x10", data: vec![0x10], expected: Ok(vec![Op16]) },
            // BIP0062: Pushing the byte 0x81 must use OP_1NEGATE.
            Test { name: "push 1 byte 0x81", data: vec![0x81], expected: Ok(vec![Op1Negate]) },
            // BIP0062: Pushing any other byte sequence up to 75 bytes must
            // use the normal data push.
            Test { name: "push 1 byte 0x11", data: vec![0x11], expected: Ok(vec![OpData1, 0x11]) },
            Test { name: "push 1 byte 0xff", data: vec![0xff], expected: Ok(vec![OpData1, 0xff]) },
            Test {
                name: "push data len 36",
                data: vec![0u8; 36],
                expected: Ok(once(OpData36).chain(repeat(0).take(36)).collect()),
            },
            Test {
                name: "push data len 75",
                data: vec![0x49; 75],
                expected: Ok(once(OpData75).chain(repeat(0x49).take(75)).collect()),
            },
            // BIP0062: Pushing 76 to 255 bytes must use OP_PUSHDATA1.
            Test {
                name: "push data len 76",
                data: vec![0x49; 76],
                expected: Ok(once(OpPushData1).chain(once(76)).chain(repeat(0x49).take(76)).collect()),
            },
            // BIP0062: Pushing 256 to 65535 bytes must use OP_PUSHDATA2.
            Test {
                name: "push data len 256",
                data: vec![0x49; 256],
                expected: Ok(once(OpPushData2).chain([0, 1]).chain(repeat(0x49).take(256)).collect()),
            },
            // Preimage-sized pushes beyond the historical 520-byte limit are allowed.
            Test {
                name: "push data len 1500",
                data: vec![0x49; 1500],
                expected: Ok(once(OpPushData2).chain([0xdc, 5]).chain(repeat(0x49).take(1500)).collect()),
            },
            Test {
                name: "push data exceeding element limit",
                data: vec![0x49; MAX_SCRIPT_ELEMENT_SIZE + 1],
                expected: Err(ScriptBuilderError::ElementExceedsMaxSize(MAX_SCRIPT_ELEMENT_SIZE + 1)),
            },
        ];

        for test in tests {
            let mut builder = ScriptBuilder::new();
            let result = builder.add_data(&test.data).map(|x| x.drain());
            assert_eq!(result, test.expected, "{} wrong result", test.name);
        }
    }

    /// Tests that add_plain_data never substitutes small-int opcodes for
    /// the values BIP0062 would fold.
    #[test]
    fn test_add_plain_data() {
        struct Test {
            name: &'static str,
            data: Vec<u8>,
            expected: ScriptBuilderResult<Vec<u8>>,
        }

        let tests = vec![
            Test { name: "push empty byte sequence", data: vec![], expected: Ok(vec![Op0]) },
            Test { name: "push 1 byte 0x00", data: vec![0x00], expected: Ok(vec![OpData1, 0x00]) },
            Test { name: "push 1 byte 0x01", data: vec![0x01], expected: Ok(vec![OpData1, 0x01]) },
            Test { name: "push 1 byte 0x10", data: vec![0x10], expected: Ok(vec![OpData1, 0x10]) },
            Test { name: "push 1 byte 0x81", data: vec![0x81], expected: Ok(vec![OpData1, 0x81]) },
            Test {
                name: "push data len 76",
                data: vec![0x49; 76],
                expected: Ok(once(OpPushData1).chain(once(76)).chain(repeat(0x49).take(76)).collect()),
            },
            Test {
                name: "push data exceeding element limit",
                data: vec![0x49; MAX_SCRIPT_ELEMENT_SIZE + 1],
                expected: Err(ScriptBuilderError::ElementExceedsMaxSize(MAX_SCRIPT_ELEMENT_SIZE + 1)),
            },
        ];

        for test in tests {
            let mut builder = ScriptBuilder::new();
            let result = builder.add_plain_data(&test.data).map(|x| x.drain());
            assert_eq!(result, test.expected, "{} wrong result", test.name);
        }
    }

    #[test]
    fn test_canonical_data_size() {
        assert_eq!(ScriptBuilder::canonical_data_size(&[]), 1);
        assert_eq!(ScriptBuilder::canonical_data_size(&[0x05]), 1);
        assert_eq!(ScriptBuilder::canonical_data_size(&[0x81]), 1);
        assert_eq!(ScriptBuilder::canonical_data_size(&[0x49; 36]), 37);
        assert_eq!(ScriptBuilder::canonical_data_size(&[0x49; 76]), 78);
        assert_eq!(ScriptBuilder::canonical_data_size(&[0x49; 256]), 259);
    }
}
