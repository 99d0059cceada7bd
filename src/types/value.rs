use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::error::{DecodeError, Result};

// Wire tags, fixed by the on-disk format
pub const TAG_INTEGER: u8 = 0;
pub const TAG_TEXT: u8 = 1;
pub const TAG_FLOAT: u8 = 2;
pub const TAG_BOOLEAN: u8 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    Text(String),
    Float(f64),
    Boolean(bool),
}

impl Value {
    /// Decode one tagged scalar starting at `offset`. Returns the value and
    /// the advanced offset.
    ///
    /// A boolean byte equal to 1 is true; any other byte value (including 0)
    /// is false.
    pub fn from_bytes(bytes: &[u8], offset: usize) -> Result<(Self, usize)> {
        if offset + 1 > bytes.len() {
            return Err(DecodeError::TruncatedBuffer {
                offset,
                needed: 1,
                remaining: bytes.len().saturating_sub(offset),
            });
        }
        let tag = bytes[offset];
        let mut offset = offset + 1;

        let value = match tag {
            TAG_INTEGER => {
                if offset + 8 > bytes.len() {
                    return Err(DecodeError::TruncatedBuffer {
                        offset,
                        needed: 8,
                        remaining: bytes.len() - offset,
                    });
                }
                let value = i64::from_be_bytes([
                    bytes[offset],
                    bytes[offset + 1],
                    bytes[offset + 2],
                    bytes[offset + 3],
                    bytes[offset + 4],
                    bytes[offset + 5],
                    bytes[offset + 6],
                    bytes[offset + 7],
                ]);
                offset += 8;
                Value::Integer(value)
            }
            TAG_TEXT => {
                if offset + 4 > bytes.len() {
                    return Err(DecodeError::TruncatedBuffer {
                        offset,
                        needed: 4,
                        remaining: bytes.len() - offset,
                    });
                }
                let length = u32::from_be_bytes([
                    bytes[offset],
                    bytes[offset + 1],
                    bytes[offset + 2],
                    bytes[offset + 3],
                ]) as usize;
                offset += 4;
                if offset + length > bytes.len() {
                    return Err(DecodeError::TruncatedBuffer {
                        offset,
                        needed: length,
                        remaining: bytes.len() - offset,
                    });
                }
                let text = String::from_utf8(bytes[offset..offset + length].to_vec())
                    .map_err(|_| DecodeError::InvalidText { offset })?;
                offset += length;
                Value::Text(text)
            }
            TAG_FLOAT => {
                if offset + 8 > bytes.len() {
                    return Err(DecodeError::TruncatedBuffer {
                        offset,
                        needed: 8,
                        remaining: bytes.len() - offset,
                    });
                }
                let value = f64::from_be_bytes([
                    bytes[offset],
                    bytes[offset + 1],
                    bytes[offset + 2],
                    bytes[offset + 3],
                    bytes[offset + 4],
                    bytes[offset + 5],
                    bytes[offset + 6],
                    bytes[offset + 7],
                ]);
                offset += 8;
                Value::Float(value)
            }
            TAG_BOOLEAN => {
                if offset + 1 > bytes.len() {
                    return Err(DecodeError::TruncatedBuffer {
                        offset,
                        needed: 1,
                        remaining: bytes.len() - offset,
                    });
                }
                let value = bytes[offset] == 1;
                offset += 1;
                Value::Boolean(value)
            }
            _ => return Err(DecodeError::UnknownTag(tag)),
        };

        Ok((value, offset))
    }

    /// Serialize the value in the wire layout `from_bytes` expects.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        match self {
            Value::Integer(i) => {
                buffer.push(TAG_INTEGER);
                buffer.extend_from_slice(&i.to_be_bytes());
            }
            Value::Text(s) => {
                buffer.push(TAG_TEXT);
                buffer.extend_from_slice(&(s.len() as u32).to_be_bytes());
                buffer.extend_from_slice(s.as_bytes());
            }
            Value::Float(f) => {
                buffer.push(TAG_FLOAT);
                buffer.extend_from_slice(&f.to_be_bytes());
            }
            Value::Boolean(b) => {
                buffer.push(TAG_BOOLEAN);
                buffer.push(if *b { 1 } else { 0 });
            }
        }
        buffer
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Text(s) => write!(f, "{}", s),
            Value::Float(v) => write!(f, "{}", v),
            Value::Boolean(true) => write!(f, "TRUE"),
            Value::Boolean(false) => write!(f, "FALSE"),
        }
    }
}
