use thiserror::Error;

/// Violations of a fixed wire layout.
///
/// A record shorter than its declared layout is reported loudly instead of
/// being truncated: a truncated chain record would corrupt the next-index
/// link and send the chain walk to a bogus instance.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("identity response too short: need {expected} bytes, got {got}")]
    ShortIdentity { expected: usize, got: usize },

    #[error("parameter record too short: need {expected} bytes, got {got}")]
    ShortRecord { expected: usize, got: usize },

    #[error("product name length {len} exceeds response ({got} bytes remain)")]
    BadProductName { len: usize, got: usize },
}

/// Problems with the topology input document itself.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("topology document is not valid JSON: {0}")]
    Document(String),

    #[error("duplicate module name in topology: {0}")]
    DuplicateModule(String),
}
