use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{RelayError, Result};

/// A trace identifier in its decoded binary form. B3-style headers carry
/// either a 64-bit (16 hex characters) or 128-bit (32 hex characters) value;
/// the width is preserved so re-encoding is lossless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceId {
    Short([u8; 8]),
    Long([u8; 16]),
}

/// A 64-bit span identifier. The all-zero value stands in for an absent or
/// undecodable parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SpanId([u8; 8]);

impl TraceId {
    pub fn parse(input: &str) -> Result<Self> {
        match input.len() {
            16 => Ok(Self::Short(decode_hex(input)?)),
            32 => Ok(Self::Long(decode_hex(input)?)),
            _ => Err(RelayError::Parse(format!("invalid trace id: {input:?}"))),
        }
    }

    pub fn to_hex(&self) -> String {
        match self {
            Self::Short(bytes) => encode_hex(bytes),
            Self::Long(bytes) => encode_hex(bytes),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Short(bytes) => bytes,
            Self::Long(bytes) => bytes,
        }
    }
}

impl SpanId {
    pub const ZERO: SpanId = SpanId([0; 8]);

    pub fn parse(input: &str) -> Result<Self> {
        if input.len() != 16 {
            return Err(RelayError::Parse(format!("invalid span id: {input:?}")));
        }
        Ok(Self(decode_hex(input)?))
    }

    pub fn to_hex(&self) -> String {
        encode_hex(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

fn decode_hex<const N: usize>(input: &str) -> Result<[u8; N]> {
    debug_assert_eq!(input.len(), N * 2);
    if !input.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(RelayError::Parse(format!("non-hex identifier: {input:?}")));
    }
    let mut out = [0u8; N];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&input[i * 2..i * 2 + 2], 16)
            .map_err(|e| RelayError::Parse(format!("non-hex identifier: {e}")))?;
    }
    Ok(out)
}

fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for TraceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TraceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TraceId::parse(&raw).map_err(D::Error::custom)
    }
}

impl Serialize for SpanId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SpanId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        SpanId::parse(&raw).map_err(D::Error::custom)
    }
}
