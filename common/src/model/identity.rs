use serde::Serialize;
use std::fmt;

/// Identity of one probed device or port peripheral.
///
/// Built once from the identity response and never mutated afterwards; it is
/// both the dispatch key for family resolution and the metadata block at the
/// head of a snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityObject {
    pub vendor_id: u16,
    pub device_type: u16,
    pub product_code: u16,
    pub revision: Revision,
    pub status: u16,
    pub serial_number: u32,
    pub product_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Revision {
    pub major: u8,
    pub minor: u8,
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.major, self.minor)
    }
}

impl fmt::Display for IdentityObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (type {}, code {}, rev {}, s/n {:08X})",
            self.product_name, self.device_type, self.product_code, self.revision, self.serial_number
        )
    }
}
