use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::error::{DecodeError, Result};
use crate::types::value::Value;

/// An ordered tuple of typed scalars used as a B+Tree key. The order of the
/// values defines the key comparison order the writer used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeKey {
    pub values: Vec<Value>,
}

/// An ordered tuple of typed scalars holding one stored row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub columns: Vec<Value>,
}

/// Decode a u32-count-prefixed sequence of values. Any value failure aborts
/// the whole sequence; no partial result is returned.
fn read_value_seq(bytes: &[u8], offset: usize) -> Result<(Vec<Value>, usize)> {
    if offset + 4 > bytes.len() {
        return Err(DecodeError::TruncatedBuffer {
            offset,
            needed: 4,
            remaining: bytes.len().saturating_sub(offset),
        });
    }
    let count = u32::from_be_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ]) as usize;
    let mut offset = offset + 4;

    let mut values = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        let (value, next) = Value::from_bytes(bytes, offset)?;
        values.push(value);
        offset = next;
    }
    Ok((values, offset))
}

impl CompositeKey {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn from_bytes(bytes: &[u8], offset: usize) -> Result<(Self, usize)> {
        let (values, offset) = read_value_seq(bytes, offset)?;
        Ok((Self { values }, offset))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        buffer.extend_from_slice(&(self.values.len() as u32).to_be_bytes());
        for value in &self.values {
            buffer.extend_from_slice(&value.to_bytes());
        }
        buffer
    }
}

impl Record {
    pub fn new(columns: Vec<Value>) -> Self {
        Self { columns }
    }

    pub fn from_bytes(bytes: &[u8], offset: usize) -> Result<(Self, usize)> {
        let (columns, offset) = read_value_seq(bytes, offset)?;
        Ok((Self { columns }, offset))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        buffer.extend_from_slice(&(self.columns.len() as u32).to_be_bytes());
        for column in &self.columns {
            buffer.extend_from_slice(&column.to_bytes());
        }
        buffer
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", column)?;
        }
        write!(f, "}}")
    }
}
