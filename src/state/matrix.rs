//! The Matrix - shared server state.
//!
//! One `Arc<Matrix>` is built at startup and handed to the gateway, which
//! hands it to every connection. Nothing here is global.

use crate::config::Config;
use crate::state::{Directory, SessionIdGenerator};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Daemon version reported in RPL_YOURHOST / RPL_MYINFO.
pub const VERSION: &str = concat!("lircd-", env!("CARGO_PKG_VERSION"));

/// This server's identity.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub network: String,
    pub version: &'static str,
    pub created: DateTime<Utc>,
}

/// The parts of [`Config`] handlers consult at runtime.
#[derive(Debug, Clone)]
pub struct MatrixConfig {
    /// MOTD body; empty means ERR_NOMOTD.
    pub motd: Vec<String>,
    /// Mode string applied at the end of the welcome burst.
    pub default_user_modes: String,
    /// Pause inside the welcome burst.
    pub lookup_delay: Duration,
    /// Inbound line ceiling for new connections.
    pub max_line_length: usize,
    /// Outbound queue capacity for new connections. Never zero.
    pub sendq: usize,
}

/// Central shared state container.
#[derive(Debug)]
pub struct Matrix {
    pub server_info: ServerInfo,
    /// Every live session, registered or not.
    pub directory: Directory,
    pub id_gen: SessionIdGenerator,
    pub config: MatrixConfig,
}

impl Matrix {
    /// Build the shared state from a (validated) configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            server_info: ServerInfo {
                name: config.server.name.clone(),
                network: config.server.network.clone(),
                version: VERSION,
                created: Utc::now(),
            },
            directory: Directory::new(),
            id_gen: SessionIdGenerator::new(),
            config: MatrixConfig {
                motd: config.motd.load_lines(),
                default_user_modes: config.registration.default_user_modes.clone(),
                lookup_delay: config.registration.lookup_delay(),
                max_line_length: config.limits.max_line_length,
                // mpsc::channel panics on a zero capacity.
                sendq: config.limits.sendq.max(1),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_runtime_settings_from_config() {
        let mut config = Config::default();
        config.server.name = "irc.test".into();
        config.motd.lines = vec!["hello".into()];
        config.registration.lookup_delay_ms = 5;

        let matrix = Matrix::new(&config);
        assert_eq!(matrix.server_info.name, "irc.test");
        assert!(matrix.server_info.version.starts_with("lircd-"));
        assert_eq!(matrix.config.motd, vec!["hello"]);
        assert_eq!(matrix.config.lookup_delay, Duration::from_millis(5));
        assert_eq!(matrix.config.default_user_modes, "+i");
        assert_eq!(matrix.directory.registered_count(), 0);
    }

    #[test]
    fn zero_sendq_is_raised_to_one() {
        let mut config = Config::default();
        config.limits.sendq = 0;
        assert_eq!(Matrix::new(&config).config.sendq, 1);
    }
}
