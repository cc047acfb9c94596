//! Telemetry utilities for command timing and span construction.

use std::time::Instant;

/// Guard for timing command execution and recording metrics.
///
/// Records command latency when dropped.
pub struct CommandTimer {
    command: String,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_command(&self.command, duration);
    }
}

/// Standardized span constructors.
pub mod spans {
    use crate::state::SessionId;
    use std::net::SocketAddr;
    use tracing::{Level, Span, info_span, span};

    /// Span covering one client connection.
    pub fn connection(uid: SessionId, addr: SocketAddr) -> Span {
        info_span!("connection", uid = %uid, addr = %addr)
    }

    /// Span covering one dispatched command.
    pub fn command(name: &str, uid: SessionId, nick: &str) -> Span {
        span!(Level::DEBUG, "irc.command", command = %name, uid = %uid, nick = %nick)
    }
}
