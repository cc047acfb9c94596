//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::limits::LimitsConfig;
use super::listen::ListenConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Server configuration.
///
/// Every section is optional; a missing section takes its defaults, so an
/// empty file is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server identity.
    pub server: ServerConfig,
    /// Network listen configuration.
    pub listen: ListenConfig,
    /// Per-connection limits.
    pub limits: LimitsConfig,
    /// Registration behaviour.
    pub registration: RegistrationConfig,
    /// Message of the Day configuration.
    pub motd: MotdConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server name, used as the prefix of every server-originated line.
    pub name: String,
    /// Network name (RPL_WELCOME, ISUPPORT `NETWORK=`).
    pub network: String,
    /// Server description.
    pub description: String,
    /// Prometheus metrics HTTP port. 0 disables the endpoint.
    pub metrics_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "irc.lircd.local".to_string(),
            network: "LircdNet".to_string(),
            description: "lircd IRC server".to_string(),
            metrics_port: 0,
        }
    }
}

/// Registration handshake configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Modes applied once the welcome burst has been sent (e.g. "+i").
    pub default_user_modes: String,
    /// Pause inside the welcome burst standing in for hostname/ident lookups.
    pub lookup_delay_ms: u64,
}

impl RegistrationConfig {
    /// The lookup pause as a [`Duration`].
    pub fn lookup_delay(&self) -> Duration {
        Duration::from_millis(self.lookup_delay_ms)
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            default_user_modes: "+i".to_string(),
            lookup_delay_ms: 0,
        }
    }
}

/// Message of the Day (MOTD) configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct MotdConfig {
    /// Path to MOTD file (one line per MOTD line).
    pub file: Option<String>,
    /// Inline MOTD lines (used when `file` is not set or unreadable).
    pub lines: Vec<String>,
}

impl MotdConfig {
    /// Load MOTD lines from file, falling back to the inline lines.
    ///
    /// An empty result means the server has no MOTD (ERR_NOMOTD).
    pub fn load_lines(&self) -> Vec<String> {
        if let Some(ref path) = self.file {
            match std::fs::read_to_string(path) {
                Ok(content) => {
                    return content.lines().map(str::to_string).collect();
                }
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "Failed to read MOTD file");
                }
            }
        }
        self.lines.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.name, "irc.lircd.local");
        assert_eq!(config.server.network, "LircdNet");
        assert_eq!(config.server.metrics_port, 0);
        assert_eq!(config.listen.address.port(), 6667);
        assert_eq!(config.limits.max_line_length, 1024);
        assert_eq!(config.limits.sendq, 512);
        assert_eq!(config.registration.default_user_modes, "+i");
        assert_eq!(config.registration.lookup_delay(), Duration::ZERO);
        assert!(config.motd.lines.is_empty());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = Config::parse(
            r#"
[server]
name = "irc.example.org"

[registration]
lookup_delay_ms = 250
"#,
        )
        .unwrap();
        assert_eq!(config.server.name, "irc.example.org");
        assert_eq!(config.server.network, "LircdNet");
        assert_eq!(config.registration.lookup_delay(), Duration::from_millis(250));
        assert_eq!(config.registration.default_user_modes, "+i");
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[listen]
address = "127.0.0.1:7000"

[limits]
max_line_length = 512

[motd]
lines = ["one", "two"]
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.listen.address.to_string(), "127.0.0.1:7000");
        assert_eq!(config.limits.max_line_length, 512);
        assert_eq!(config.motd.load_lines(), vec!["one", "two"]);
    }

    #[test]
    fn load_reports_missing_file_and_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io(_))));

        assert!(matches!(
            Config::parse("[server\nname = 1"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::parse("[listen]\naddress = \"not an address\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn motd_file_takes_precedence() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "from file\nsecond").unwrap();
        let motd = MotdConfig {
            file: Some(file.path().display().to_string()),
            lines: vec!["inline".to_string()],
        };
        assert_eq!(motd.load_lines(), vec!["from file", "second"]);
    }

    #[test]
    fn unreadable_motd_file_falls_back_to_inline_lines() {
        let motd = MotdConfig {
            file: Some("/nonexistent/path/motd.txt".to_string()),
            lines: vec!["Fallback line".to_string()],
        };
        assert_eq!(motd.load_lines(), vec!["Fallback line"]);
    }
}
