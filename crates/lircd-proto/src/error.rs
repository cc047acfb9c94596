//! Protocol error types.

use thiserror::Error;

/// Convenience alias for results carrying a [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Errors raised while framing or decoding a connection's byte stream.
///
/// Every variant is fatal to the connection that produced it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error on the underlying transport.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A line (or an unterminated partial line) exceeded the ceiling.
    #[error("message too long: {actual} bytes (limit: {limit})")]
    MessageTooLong {
        /// Bytes buffered so far.
        actual: usize,
        /// Configured ceiling.
        limit: usize,
    },

    /// The line was not valid UTF-8.
    #[error("invalid UTF-8 in message at byte {byte_pos}")]
    InvalidUtf8 {
        /// Offset of the first invalid byte.
        byte_pos: usize,
    },

    /// The line carried a character that may never appear on the wire.
    #[error("illegal control character: {0:?}")]
    IllegalControlChar(char),

    /// The line could not be parsed.
    #[error("invalid message {string:?}: {cause}")]
    InvalidMessage {
        /// The offending line.
        string: String,
        /// Why it was rejected.
        #[source]
        cause: MessageParseError,
    },
}

/// Errors from parsing a single protocol line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Nothing but whitespace (or a bare source prefix).
    #[error("empty message")]
    EmptyMessage,

    /// The command token was missing or not a word/numeric.
    #[error("invalid command")]
    InvalidCommand,
}
