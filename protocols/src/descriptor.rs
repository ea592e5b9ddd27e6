//! Descriptor word at the head of a full parameter record.
//!
//! The 32 bits encode, among other things, the value's data type and
//! whether the parameter is writable. Bit 0 is the least significant bit of
//! byte 0.

use tracing::warn;

/// Data type selector resolved from descriptor bits (2,1,0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorType {
    /// 1-byte array of bool (bit mask, width 8).
    BoolArray1,
    /// 2-byte array of bool (bit mask, width 16).
    BoolArray2,
    Unsigned8,
    Unsigned16,
    Unsigned32,
    /// Text parameters are not implemented by any decode strategy here.
    Text,
    Float32,
    /// 4-byte array of bool (bit mask, width 32), selected via bit 16.
    BoolArray4,
    /// Bit pattern 111 without the bit-16 extension set.
    Reserved,
}

impl DescriptorType {
    /// Wire tag byte this type is carried as in the linked-record dialect.
    pub fn tag(self) -> u8 {
        match self {
            DescriptorType::BoolArray1 => 0x00,
            DescriptorType::BoolArray2 => 0x01,
            DescriptorType::Unsigned8 => 0x02,
            DescriptorType::Unsigned16 => 0x03,
            DescriptorType::Unsigned32 => 0x04,
            DescriptorType::Text => 0x05,
            DescriptorType::Float32 => 0x06,
            DescriptorType::BoolArray4 => 0x07,
            DescriptorType::Reserved => 0xFF,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub data_type: DescriptorType,
    pub writable: bool,
}

/// Decodes the packed descriptor. Total: every 32-bit input maps to a
/// defined type or an explicit sentinel, never a fault.
pub fn decode(bits: u32) -> Descriptor {
    let data_type = match bits & 0b111 {
        0b000 => DescriptorType::BoolArray1,
        0b001 => DescriptorType::BoolArray2,
        0b010 => DescriptorType::Unsigned8,
        0b011 => DescriptorType::Unsigned16,
        0b100 => DescriptorType::Unsigned32,
        0b101 => {
            warn!("text parameter descriptor ({bits:#010x}): not implemented, skipping decode");
            DescriptorType::Text
        }
        0b110 => DescriptorType::Float32,
        _ => {
            if bits & (1 << 16) != 0 {
                DescriptorType::BoolArray4
            } else {
                DescriptorType::Reserved
            }
        }
    };

    Descriptor {
        data_type,
        writable: bits & (1 << 8) != 0,
    }
}
