use super::super::error::RippleError;
use super::field::Field;

const MAX_SINGLE_BYTE_LENGTH: usize = 192;
const MAX_DOUBLE_BYTE_LENGTH: usize = 12_480;
const MAX_LENGTH_VALUE: usize = 918_744;

/// Append-only writer for the ledger's canonical binary format. Callers are
/// responsible for writing fields in canonical order.
#[derive(Debug, Default)]
pub struct BinarySerializer {
    bytes: Vec<u8>,
}

impl BinarySerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn write_field(&mut self, field: &Field) {
        self.bytes.extend_from_slice(&field.header());
    }

    pub fn write_u16(&mut self, field: &Field, value: u16) {
        self.write_field(field);
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u32(&mut self, field: &Field, value: u32) {
        self.write_field(field);
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    /// Variable-length field: header, length prefix, bytes.
    pub fn write_vl(&mut self, field: &Field, value: &[u8]) -> Result<(), RippleError> {
        self.write_field(field);
        self.bytes.extend_from_slice(&encode_length_prefix(value.len())?);
        self.bytes.extend_from_slice(value);
        Ok(())
    }
}

/// One to three byte length prefix of variable-length fields.
pub fn encode_length_prefix(length: usize) -> Result<Vec<u8>, RippleError> {
    if length <= MAX_SINGLE_BYTE_LENGTH {
        Ok(vec![length as u8])
    } else if length <= MAX_DOUBLE_BYTE_LENGTH {
        let length = length - (MAX_SINGLE_BYTE_LENGTH + 1);
        Ok(vec![193 + (length >> 8) as u8, (length & 0xff) as u8])
    } else if length <= MAX_LENGTH_VALUE {
        let length = length - (MAX_DOUBLE_BYTE_LENGTH + 1);
        Ok(vec![241 + (length >> 16) as u8, ((length >> 8) & 0xff) as u8, (length & 0xff) as u8])
    } else {
        Err(RippleError::EncodingError(format!("variable length {} exceeds {}", length, MAX_LENGTH_VALUE)))
    }
}
