//! Identity response layout.
//!
//! Fixed offsets: vendor(2) device type(2) product code(2) revision(2:
//! major, minor) status(2) serial(4), then a length-prefixed ASCII product
//! name. All integers little-endian.

use paramvault_common::error::WireError;
use paramvault_common::model::identity::{IdentityObject, Revision};

const FIXED_LEN: usize = 15;

pub fn parse_identity(bytes: &[u8]) -> Result<IdentityObject, WireError> {
    if bytes.len() < FIXED_LEN {
        return Err(WireError::ShortIdentity {
            expected: FIXED_LEN,
            got: bytes.len(),
        });
    }

    let name_len = bytes[14] as usize;
    let name_bytes = &bytes[15..];
    if name_bytes.len() < name_len {
        return Err(WireError::BadProductName {
            len: name_len,
            got: name_bytes.len(),
        });
    }

    Ok(IdentityObject {
        vendor_id: le_u16(bytes, 0),
        device_type: le_u16(bytes, 2),
        product_code: le_u16(bytes, 4),
        revision: Revision {
            major: bytes[6],
            minor: bytes[7],
        },
        status: le_u16(bytes, 8),
        serial_number: u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]),
        product_name: String::from_utf8_lossy(&name_bytes[..name_len])
            .trim_end_matches(['\0', ' '])
            .to_string(),
    })
}

fn le_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

pub mod build {
    /// Frames an identity response the way a device would. Used by test
    /// fixtures and replay-capture tooling.
    pub fn encode_identity(
        vendor: u16,
        device_type: u16,
        product_code: u16,
        revision: (u8, u8),
        serial: u32,
        name: &str,
    ) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&vendor.to_le_bytes());
        out.extend_from_slice(&device_type.to_le_bytes());
        out.extend_from_slice(&product_code.to_le_bytes());
        out.push(revision.0);
        out.push(revision.1);
        out.extend_from_slice(&0u16.to_le_bytes()); // status
        out.extend_from_slice(&serial.to_le_bytes());
        out.push(name.len() as u8);
        out.extend_from_slice(name.as_bytes());
        out
    }
}
