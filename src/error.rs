use std::io;

use thiserror::Error;

/// Session-scoped failures. None of these escalate past the task handling
/// the session; each one simply ends it.
#[derive(Debug, Error)]
pub enum Error {
    /// Handshake or request bytes that do not form a valid frame.
    #[error("malformed frame: {0}")]
    MalformedFrame(&'static str),

    /// The request declared an address type other than IPv4.
    #[error("unsupported address type {0:#04x}")]
    UnsupportedAddressType(u8),

    /// The requested destination could not be reached.
    #[error("upstream connect failed: {0}")]
    UpstreamConnect(#[source] io::Error),

    /// The peer closed the stream in the middle of a frame.
    #[error("stream closed mid-frame")]
    PrematureClose,

    #[error(transparent)]
    Io(#[from] io::Error),
}
