//! Bounded newline framing for tokio.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{self, ProtocolError};

/// Default ceiling for one inbound line, terminator included.
pub const DEFAULT_MAX_LINE_LEN: usize = 1024;

/// Codec reading `\n`-terminated UTF-8 lines and writing `\r\n`-terminated ones.
///
/// Decoded lines have their trailing CR/LF removed. A line (or an
/// unterminated partial line) longer than the ceiling is an error, so a
/// client can never make the read buffer grow without bound.
#[derive(Debug)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    max_len: usize,
}

impl LineCodec {
    /// Codec with [`DEFAULT_MAX_LINE_LEN`].
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LINE_LEN)
    }

    /// Codec with a custom ceiling.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
        }
    }

    /// The configured ceiling.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    fn validate_line(s: &str) -> error::Result<()> {
        match s.chars().find(|&c| c == '\0') {
            Some(ch) => Err(ProtocolError::IllegalControlChar(ch)),
            None => Ok(()),
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
            self.next_index = src.len();
            if src.len() > self.max_len {
                return Err(ProtocolError::MessageTooLong {
                    actual: src.len(),
                    limit: self.max_len,
                });
            }
            return Ok(None);
        };

        let line = src.split_to(self.next_index + offset + 1);
        self.next_index = 0;

        if line.len() > self.max_len {
            return Err(ProtocolError::MessageTooLong {
                actual: line.len(),
                limit: self.max_len,
            });
        }

        let data = std::str::from_utf8(&line).map_err(|e| ProtocolError::InvalidUtf8 {
            byte_pos: e.valid_up_to(),
        })?;
        let data = data.trim_end_matches(&['\r', '\n'][..]);
        Self::validate_line(data)?;

        Ok(Some(data.to_owned()))
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, msg: String, dst: &mut BytesMut) -> error::Result<()> {
        // One queued entry is one wire line, whatever it carries.
        let line = match msg.find(&['\r', '\n'][..]) {
            Some(pos) => &msg[..pos],
            None => msg.as_str(),
        };
        dst.reserve(line.len() + 2);
        dst.extend_from_slice(line.as_bytes());
        dst.extend_from_slice(b"\r\n");
        Ok(())
    }
}
