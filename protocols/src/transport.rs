//! The seam to the fieldbus session layer.
//!
//! Everything the engine reads off a device goes through the four calls
//! below. The session state machine itself (framing, retransmission,
//! keep-alive) lives behind an implementation of these traits and is not
//! part of this workspace.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("session registration with '{route}' failed: {reason}")]
    Session { route: String, reason: String },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("request rejected by device: {0}")]
    Rejected(String),

    #[error("connection lost: {0}")]
    Io(String),
}

/// One registered, connection-oriented session against a single device.
///
/// Sessions do not tolerate overlapping in-flight requests; callers issue
/// one request, await the response, then issue the next.
#[async_trait]
pub trait ExplicitSession: Send {
    async fn get_attribute_single(
        &mut self,
        class: u16,
        instance: u16,
        attribute: u8,
    ) -> Result<Vec<u8>, TransportError>;

    async fn get_attribute_all(
        &mut self,
        class: u16,
        instance: u16,
    ) -> Result<Vec<u8>, TransportError>;

    async fn unregister_session(&mut self) -> Result<(), TransportError>;
}

/// Opens sessions, one per bridging route.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// `route` is the comma-joined `port,address` hop sequence from the
    /// scanning host to the target device.
    async fn register_session(
        &self,
        route: &str,
    ) -> Result<Box<dyn ExplicitSession>, TransportError>;
}
