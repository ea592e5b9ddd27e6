//! Device family registry.
//!
//! One closed set of families, each carrying its own decode strategy and
//! tag dialect. The registration table is plain data built into the binary;
//! resolution is a pure lookup with a generic fallback that still produces
//! an identity-only record.

use paramvault_protocols::{DPI_PARAMETER_CLASS, PARAMETER_CLASS};

use crate::codec::SemanticType;
use crate::tables::{self, ParamSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceFamily {
    /// Compact drives (523/525): per-attribute reads against the parameter
    /// object, parameter list from a generated table.
    PowerFlex525,
    /// 750-series drives: linked 72-byte records, backplane port peripherals.
    PowerFlex750,
    /// Anything unregistered: identity-only backup, no parameter walk.
    Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryStrategy {
    PerAttribute,
    LinkedRecord,
    IdentityOnly,
}

/// Supported (device type, product code) pairs per family. First match wins.
static REGISTRY: &[((u16, u16), DeviceFamily)] = &[
    ((150, 5), DeviceFamily::PowerFlex525),  // PowerFlex 523
    ((150, 9), DeviceFamily::PowerFlex525),  // PowerFlex 525, frame B
    ((150, 11), DeviceFamily::PowerFlex525), // PowerFlex 525, frame C
    ((143, 2050), DeviceFamily::PowerFlex750), // PowerFlex 753
    ((143, 2100), DeviceFamily::PowerFlex750), // PowerFlex 755
    ((143, 2101), DeviceFamily::PowerFlex750), // PowerFlex 755T
];

/// Maps a discovered identity to its family handler; unregistered pairs
/// fall back to [`DeviceFamily::Generic`].
pub fn resolve(device_type: u16, product_code: u16) -> DeviceFamily {
    REGISTRY
        .iter()
        .find(|((dt, pc), _)| *dt == device_type && *pc == product_code)
        .map(|(_, family)| *family)
        .unwrap_or(DeviceFamily::Generic)
}

/// True when the pair would resolve to a real handler. The route builder
/// uses this to mark unsupported topology modules ineligible.
pub fn is_registered(device_type: u16, product_code: u16) -> bool {
    resolve(device_type, product_code) != DeviceFamily::Generic
}

impl DeviceFamily {
    pub fn strategy(self) -> DiscoveryStrategy {
        match self {
            DeviceFamily::PowerFlex525 => DiscoveryStrategy::PerAttribute,
            DeviceFamily::PowerFlex750 => DiscoveryStrategy::LinkedRecord,
            DeviceFamily::Generic => DiscoveryStrategy::IdentityOnly,
        }
    }

    /// Object class parameter reads are issued against.
    pub fn parameter_class(self) -> u16 {
        match self {
            DeviceFamily::PowerFlex525 => PARAMETER_CLASS,
            DeviceFamily::PowerFlex750 | DeviceFamily::Generic => DPI_PARAMETER_CLASS,
        }
    }

    /// Generated parameter table for per-attribute families.
    pub fn parameter_table(self) -> &'static [ParamSpec] {
        match self {
            DeviceFamily::PowerFlex525 => tables::POWERFLEX_525,
            _ => &[],
        }
    }

    /// The family's wire-tag dialect. The same byte can mean different
    /// things in different dialects (0x02 is a signed byte on the compact
    /// drives but unsigned on the 750 series), so this is a per-family
    /// capability rather than one global table.
    pub fn semantic_of(self, tag: u8) -> SemanticType {
        match self {
            DeviceFamily::PowerFlex525 => match tag {
                0x01 => SemanticType::Bool,
                0x02 => SemanticType::Signed8,
                0x03 => SemanticType::Signed16,
                0x04 => SemanticType::Signed32,
                0x05 => SemanticType::Unsigned8,
                0x06 => SemanticType::Unsigned16,
                0x07 => SemanticType::Float32,
                0x08 => SemanticType::Mask8,
                0x09 => SemanticType::Mask16,
                0x0A => SemanticType::Mask32,
                _ => SemanticType::Unknown,
            },
            DeviceFamily::PowerFlex750 => match tag {
                0x00 => SemanticType::Mask8,
                0x01 => SemanticType::Mask16,
                0x02 => SemanticType::Unsigned8,
                0x03 => SemanticType::Unsigned16,
                0x04 => SemanticType::Unsigned32,
                0x06 => SemanticType::Float32,
                0x07 => SemanticType::Mask32,
                _ => SemanticType::Unknown,
            },
            DeviceFamily::Generic => SemanticType::Unknown,
        }
    }
}
