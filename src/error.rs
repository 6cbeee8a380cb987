use std::io;

use thiserror::Error;

use crate::openflow0x01::MsgCode;

/// Errors surfaced by the codec and the controller event loop.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error on switch connection: {0}")]
    Io(#[from] io::Error),

    /// A flow rule was requested for an IP protocol the application does not
    /// classify. No rule is installed; the packet-in handler fails.
    #[error("unsupported IP protocol: {0}")]
    UnsupportedProtocol(u8),

    /// The OpenFlow header carried a type code outside the 1.0 range.
    #[error("unknown OpenFlow message type code: {0}")]
    UnknownMessageCode(u8),

    /// A well-formed message the controller has no handler for.
    #[error("no handler for OpenFlow message: {0:?}")]
    UnhandledMessage(MsgCode),

    /// A TCP or UDP packet too short to carry the source port its flow rule
    /// must key on. No rule is installed; the packet-in handler fails.
    #[error("truncated transport header for IP protocol {0}")]
    TruncatedTransport(u8),

    /// The header's length field promised more bytes than the body holds.
    #[error("truncated OpenFlow message body: expected {expected} bytes, got {got}")]
    TruncatedMessage { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
