//! Protocol buffer wire format encoding.
//!
//! Each field is a key (`field_number << 3 | wire_type`) followed by its
//! payload. Varints use 7 data bits per byte, least significant group first,
//! with bit 7 set on every byte but the last.

/// Continuation bit of a varint byte.
const CONTINUATION_BIT: u8 = 0x80;

/// Data bits of a varint byte.
const DATA_MASK: u64 = 0x7F;

/// How a field's payload is laid out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WireType {
    /// Variable-length integer.
    Varint = 0,
    /// Eight little-endian bytes.
    Fixed64 = 1,
    /// Varint length followed by that many bytes.
    LengthDelimited = 2,
    /// Deprecated group start.
    StartGroup = 3,
    /// Deprecated group end.
    EndGroup = 4,
    /// Four little-endian bytes.
    Fixed32 = 5,
}

impl WireType {
    /// Decodes the low three bits of a field key.
    #[must_use]
    pub fn from_key(key: u64) -> Option<Self> {
        match key & 0x7 {
            0 => Some(Self::Varint),
            1 => Some(Self::Fixed64),
            2 => Some(Self::LengthDelimited),
            3 => Some(Self::StartGroup),
            4 => Some(Self::EndGroup),
            5 => Some(Self::Fixed32),
            _ => None,
        }
    }
}

/// Zig-zag encodes a signed 32-bit value.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub const fn zigzag32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

/// Zig-zag encodes a signed 64-bit value.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub const fn zigzag64(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// An append-only buffer of encoded fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProtoWriter {
    buf: Vec<u8>,
}

impl ProtoWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the writer, returning its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Returns the number of bytes written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes a raw varint.
    #[allow(clippy::cast_possible_truncation)]
    pub fn write_varint(&mut self, mut value: u64) {
        loop {
            let byte = (value & DATA_MASK) as u8;
            value >>= 7;
            if value == 0 {
                self.buf.push(byte);
                return;
            }
            self.buf.push(byte | CONTINUATION_BIT);
        }
    }

    /// Writes a field key.
    pub fn write_key(&mut self, field: u32, wire_type: WireType) {
        self.write_varint(u64::from(field) << 3 | wire_type as u64);
    }

    /// Writes an unsigned varint field (`uint32`, `uint64`).
    pub fn uint64(&mut self, field: u32, value: u64) {
        self.write_key(field, WireType::Varint);
        self.write_varint(value);
    }

    /// Writes an `int32` or enum field; negative values take ten bytes.
    #[allow(clippy::cast_sign_loss)]
    pub fn int32(&mut self, field: u32, value: i32) {
        self.uint64(field, i64::from(value) as u64);
    }

    /// Writes an `int64` field.
    #[allow(clippy::cast_sign_loss)]
    pub fn int64(&mut self, field: u32, value: i64) {
        self.uint64(field, value as u64);
    }

    /// Writes a `sint32` field.
    pub fn sint32(&mut self, field: u32, value: i32) {
        self.uint64(field, u64::from(zigzag32(value)));
    }

    /// Writes a `sint64` field.
    pub fn sint64(&mut self, field: u32, value: i64) {
        self.uint64(field, zigzag64(value));
    }

    /// Writes a `bool` field.
    pub fn bool(&mut self, field: u32, value: bool) {
        self.uint64(field, u64::from(value));
    }

    /// Writes a `fixed32`, `sfixed32`, or `float` payload.
    pub fn fixed32(&mut self, field: u32, value: u32) {
        self.write_key(field, WireType::Fixed32);
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a `fixed64`, `sfixed64`, or `double` payload.
    pub fn fixed64(&mut self, field: u32, value: u64) {
        self.write_key(field, WireType::Fixed64);
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a `float` field.
    pub fn float(&mut self, field: u32, value: f32) {
        self.fixed32(field, value.to_bits());
    }

    /// Writes a `double` field.
    pub fn double(&mut self, field: u32, value: f64) {
        self.fixed64(field, value.to_bits());
    }

    /// Writes a length-delimited field.
    pub fn bytes(&mut self, field: u32, value: &[u8]) {
        self.write_key(field, WireType::LengthDelimited);
        self.write_varint(value.len() as u64);
        self.buf.extend_from_slice(value);
    }

    /// Writes a `string` field.
    pub fn string(&mut self, field: u32, value: &str) {
        self.bytes(field, value.as_bytes());
    }

    /// Writes an embedded message field from another writer.
    pub fn message(&mut self, field: u32, message: &ProtoWriter) {
        self.bytes(field, message.as_bytes());
    }
}
