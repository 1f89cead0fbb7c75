//! Protocol buffer wire format decoding.
//!
//! The reader walks a buffer field by field without knowing the message
//! schema. It exists to inspect encoded descriptors, so it borrows payloads
//! instead of copying them.

use schemata_foundation::{Error, ErrorKind, Result};

use crate::writer::WireType;

/// Maximum encoded length of a 64-bit varint.
const MAX_VARINT_LEN: usize = 10;

/// A decoded field payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// A varint.
    Varint(u64),
    /// Eight fixed bytes, little-endian.
    Fixed64(u64),
    /// A length-delimited payload.
    Bytes(&'a [u8]),
    /// Four fixed bytes, little-endian.
    Fixed32(u32),
}

impl<'a> FieldValue<'a> {
    /// Returns the varint, if this is one.
    #[must_use]
    pub fn as_varint(&self) -> Option<u64> {
        match self {
            Self::Varint(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the payload, if length-delimited.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the payload as UTF-8, if length-delimited and valid.
    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }
}

fn malformed(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::Serialization(message.into()))
}

/// A cursor over encoded fields.
#[derive(Clone, Debug)]
pub struct ProtoReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ProtoReader<'a> {
    /// Creates a reader over `buf`.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Returns true once every byte has been consumed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Reads a varint.
    ///
    /// # Errors
    ///
    /// Fails on truncated input or a varint longer than ten bytes.
    pub fn read_varint(&mut self) -> Result<u64> {
        let mut value = 0u64;
        for i in 0..MAX_VARINT_LEN {
            let Some(&byte) = self.buf.get(self.pos) else {
                return Err(malformed("truncated varint"));
            };
            self.pos += 1;
            let bits = u64::from(byte & 0x7F);
            if i == MAX_VARINT_LEN - 1 && bits > 1 {
                return Err(malformed("varint overflows 64 bits"));
            }
            value |= bits << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(malformed("varint longer than 10 bytes"))
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| malformed(format!("field of {len} bytes runs past end of input")))?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Reads the next field, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Fails on truncated input, field number zero, and group or unknown
    /// wire types.
    pub fn next_field(&mut self) -> Result<Option<(u32, FieldValue<'a>)>> {
        if self.is_done() {
            return Ok(None);
        }
        let key = self.read_varint()?;
        let number = u32::try_from(key >> 3).map_err(|_| malformed(format!("field number in key {key} is too large")))?;
        if number == 0 {
            return Err(malformed("field number 0 is not allowed"));
        }
        let value = match WireType::from_key(key) {
            Some(WireType::Varint) => FieldValue::Varint(self.read_varint()?),
            Some(WireType::Fixed64) => {
                let mut bytes = [0u8; 8];
                bytes.copy_from_slice(self.take(8)?);
                FieldValue::Fixed64(u64::from_le_bytes(bytes))
            }
            Some(WireType::LengthDelimited) => {
                let len = usize::try_from(self.read_varint()?)
                    .map_err(|_| malformed("length does not fit in memory"))?;
                FieldValue::Bytes(self.take(len)?)
            }
            Some(WireType::Fixed32) => {
                let mut bytes = [0u8; 4];
                bytes.copy_from_slice(self.take(4)?);
                FieldValue::Fixed32(u32::from_le_bytes(bytes))
            }
            Some(WireType::StartGroup | WireType::EndGroup) => {
                return Err(malformed(format!("field {number} uses unsupported group encoding")));
            }
            None => return Err(malformed(format!("field {number} has unknown wire type {}", key & 0x7))),
        };
        Ok(Some((number, value)))
    }
}

impl<'a> Iterator for ProtoReader<'a> {
    type Item = Result<(u32, FieldValue<'a>)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_field() {
            Ok(Some(field)) => Some(Ok(field)),
            Ok(None) => None,
            Err(e) => {
                self.pos = self.buf.len();
                Some(Err(e))
            }
        }
    }
}
