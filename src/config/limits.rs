//! Per-connection limits configuration.

use serde::Deserialize;

/// Per-connection limits.
///
/// These bound how much memory a single client can pin: the inbound line
/// buffer and the outbound queue.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Longest accepted inbound line in bytes, terminator included (default: 1024).
    /// Longer lines (or unterminated partial lines) drop the connection.
    pub max_line_length: usize,
    /// Outbound queue capacity in messages (default: 512).
    /// Producers wait when a slow client lets its queue fill up.
    pub sendq: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_line_length: default_max_line_length(),
            sendq: default_sendq(),
        }
    }
}

fn default_max_line_length() -> usize {
    lircd_proto::line::DEFAULT_MAX_LINE_LEN
}

fn default_sendq() -> usize {
    512
}
