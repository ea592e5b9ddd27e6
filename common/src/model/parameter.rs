use serde::Serialize;

/// Sentinel stored when a value could not be decoded.
///
/// A failed decode never leaves a half-initialized value behind; the
/// parameter either carries a real display string or exactly this marker.
pub const UNKNOWN_VALUE: &str = "<unknown>";

/// One tunable setting discovered on a device.
#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    pub number: u16,
    pub name: String,
    /// Decoded display string of the live value, or [`UNKNOWN_VALUE`].
    pub current_value: String,
    pub default_value: String,
    /// Family-specific wire tag byte the value was decoded under.
    pub raw_type_tag: u8,
    pub raw_size: u8,
    pub writable: bool,
    /// Only record-flagged parameters survive snapshot finalization.
    pub record: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u8>,
}

impl Parameter {
    pub fn is_unknown(&self) -> bool {
        self.current_value == UNKNOWN_VALUE
    }

    /// True when the live value differs from the factory default.
    pub fn is_modified(&self) -> bool {
        self.current_value != self.default_value
    }
}
