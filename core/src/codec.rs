//! Parameter value decoding.
//!
//! `decode_value` is total and pure: any tag with enough bytes decodes
//! deterministically, anything else produces an explicit sentinel string.
//! Multi-byte integers are little-endian on the wire. Bit masks are
//! rendered most-significant-bit-first as zero-padded binary after the
//! little-endian bytes are reassembled.

use paramvault_common::model::UNKNOWN_VALUE;

/// Rendered when a family maps a wire tag to no known semantic.
pub const UNKNOWN_TYPE: &str = "<unknown type>";

/// Semantic value types a family dialect can map its wire tags onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticType {
    Bool,
    Unsigned8,
    Unsigned16,
    Unsigned32,
    Signed8,
    Signed16,
    Signed32,
    Float32,
    /// Bit mask rendered as an 8-digit binary string.
    Mask8,
    /// Bit mask rendered as a 16-digit binary string.
    Mask16,
    /// Bit mask rendered as a 32-digit binary string.
    Mask32,
    Unknown,
}

impl SemanticType {
    /// Bytes the type needs off the wire.
    pub fn size(self) -> usize {
        match self {
            SemanticType::Bool | SemanticType::Unsigned8 | SemanticType::Signed8 => 1,
            SemanticType::Unsigned16 | SemanticType::Signed16 | SemanticType::Mask16 => 2,
            SemanticType::Mask8 => 1,
            SemanticType::Unsigned32
            | SemanticType::Signed32
            | SemanticType::Float32
            | SemanticType::Mask32 => 4,
            SemanticType::Unknown => 0,
        }
    }
}

/// Decodes raw value bytes under `ty` into a display string.
pub fn decode_value(bytes: &[u8], ty: SemanticType) -> String {
    if ty == SemanticType::Unknown {
        return UNKNOWN_TYPE.to_string();
    }
    if bytes.len() < ty.size() {
        return UNKNOWN_VALUE.to_string();
    }

    match ty {
        SemanticType::Bool => if bytes[0] != 0 { "1" } else { "0" }.to_string(),
        SemanticType::Unsigned8 => bytes[0].to_string(),
        SemanticType::Unsigned16 => le16(bytes).to_string(),
        SemanticType::Unsigned32 => le32(bytes).to_string(),
        SemanticType::Signed8 => (bytes[0] as i8).to_string(),
        SemanticType::Signed16 => (le16(bytes) as i16).to_string(),
        SemanticType::Signed32 => (le32(bytes) as i32).to_string(),
        SemanticType::Float32 => f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
            .to_string(),
        SemanticType::Mask8 => format!("{:08b}", bytes[0]),
        SemanticType::Mask16 => format!("{:016b}", le16(bytes)),
        SemanticType::Mask32 => format!("{:032b}", le32(bytes)),
        SemanticType::Unknown => unreachable!(),
    }
}

fn le16(bytes: &[u8]) -> u16 {
    u16::from_le_bytes([bytes[0], bytes[1]])
}

fn le32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
