//! Full parameter record, one fixed 72-byte block per parameter index.
//!
//! Layout: descriptor(4) value(4) min(4) max(4) default(4) next(2)
//! previous(2) units(4 ASCII) multiplier(2) divisor(2) base(2)
//! offset(2 signed) link(3) reserved(1) name(32 ASCII). Integers are
//! little-endian; the two index links chain records forward and backward.

use paramvault_common::error::WireError;

pub const PARAM_RECORD_LEN: usize = 72;

#[derive(Debug, Clone, PartialEq)]
pub struct ParamRecord {
    pub descriptor: u32,
    pub value: [u8; 4],
    pub min: [u8; 4],
    pub max: [u8; 4],
    pub default: [u8; 4],
    pub next: u16,
    pub previous: u16,
    pub units: String,
    pub multiplier: u16,
    pub divisor: u16,
    pub base: u16,
    pub offset: i16,
    pub link: [u8; 3],
    pub name: String,
}

/// Decodes one record. A short buffer is a hard error: accepting it would
/// desynchronize every later field, including the next-index link the chain
/// walk depends on.
pub fn parse_record(bytes: &[u8]) -> Result<ParamRecord, WireError> {
    if bytes.len() < PARAM_RECORD_LEN {
        return Err(WireError::ShortRecord {
            expected: PARAM_RECORD_LEN,
            got: bytes.len(),
        });
    }

    Ok(ParamRecord {
        descriptor: u32::from_le_bytes(take4(bytes, 0)),
        value: take4(bytes, 4),
        min: take4(bytes, 8),
        max: take4(bytes, 12),
        default: take4(bytes, 16),
        next: le_u16(bytes, 20),
        previous: le_u16(bytes, 22),
        units: ascii_trimmed(&bytes[24..28]),
        multiplier: le_u16(bytes, 28),
        divisor: le_u16(bytes, 30),
        base: le_u16(bytes, 32),
        offset: i16::from_le_bytes([bytes[34], bytes[35]]),
        link: [bytes[36], bytes[37], bytes[38]],
        name: ascii_trimmed(&bytes[40..72]),
    })
}

fn take4(bytes: &[u8], at: usize) -> [u8; 4] {
    [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]
}

fn le_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn ascii_trimmed(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(['\0', ' '])
        .trim_start()
        .to_string()
}

pub mod build {
    use super::PARAM_RECORD_LEN;

    /// Assembles a wire record byte-for-byte; unspecified fields are zero.
    /// Used by test fixtures and replay-capture tooling.
    pub struct RecordBuilder {
        buf: [u8; PARAM_RECORD_LEN],
    }

    impl Default for RecordBuilder {
        fn default() -> Self {
            Self::new()
        }
    }

    impl RecordBuilder {
        pub fn new() -> Self {
            Self {
                buf: [0; PARAM_RECORD_LEN],
            }
        }

        pub fn descriptor(mut self, bits: u32) -> Self {
            self.buf[0..4].copy_from_slice(&bits.to_le_bytes());
            self
        }

        pub fn value(mut self, v: [u8; 4]) -> Self {
            self.buf[4..8].copy_from_slice(&v);
            self
        }

        pub fn default(mut self, v: [u8; 4]) -> Self {
            self.buf[16..20].copy_from_slice(&v);
            self
        }

        pub fn links(mut self, next: u16, previous: u16) -> Self {
            self.buf[20..22].copy_from_slice(&next.to_le_bytes());
            self.buf[22..24].copy_from_slice(&previous.to_le_bytes());
            self
        }

        pub fn units(mut self, units: &str) -> Self {
            let bytes = units.as_bytes();
            self.buf[24..24 + bytes.len().min(4)].copy_from_slice(&bytes[..bytes.len().min(4)]);
            self
        }

        pub fn scaling(mut self, multiplier: u16, divisor: u16, base: u16, offset: i16) -> Self {
            self.buf[28..30].copy_from_slice(&multiplier.to_le_bytes());
            self.buf[30..32].copy_from_slice(&divisor.to_le_bytes());
            self.buf[32..34].copy_from_slice(&base.to_le_bytes());
            self.buf[34..36].copy_from_slice(&offset.to_le_bytes());
            self
        }

        pub fn name(mut self, name: &str) -> Self {
            let bytes = name.as_bytes();
            let len = bytes.len().min(32);
            self.buf[40..40 + len].copy_from_slice(&bytes[..len]);
            self
        }

        pub fn build(self) -> Vec<u8> {
            self.buf.to_vec()
        }
    }
}
