//! Command/message codec for tokio.
//!
//! Decodes client lines into [`Command`]s and encodes server [`Message`]s.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::command::Command;
use crate::error::{self, MessageParseError, ProtocolError};
use crate::line::LineCodec;
use crate::message::Message;

/// Tokio codec for the daemon's connections.
///
/// Wraps [`LineCodec`]; blank lines are skipped rather than surfaced.
#[derive(Debug, Default)]
pub struct IrcCodec {
    inner: LineCodec,
}

impl IrcCodec {
    /// Codec with the default line ceiling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec with a custom line ceiling.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            inner: LineCodec::with_max_len(max_len),
        }
    }
}

impl Decoder for IrcCodec {
    type Item = Command;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<Command>> {
        while let Some(line) = self.inner.decode(src)? {
            match line.parse::<Command>() {
                Ok(cmd) => return Ok(Some(cmd)),
                Err(MessageParseError::EmptyMessage) => continue,
                Err(cause) => {
                    return Err(ProtocolError::InvalidMessage {
                        string: line,
                        cause,
                    })
                }
            }
        }
        Ok(None)
    }
}

impl Encoder<Message> for IrcCodec {
    type Error = ProtocolError;

    fn encode(&mut self, msg: Message, dst: &mut BytesMut) -> error::Result<()> {
        self.inner.encode(msg.to_string(), dst)
    }
}
