//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use crate::state::USABLE_USER_MODES;
use lircd_proto::parse_user_modes;
use thiserror::Error;

/// Shortest line ceiling that still fits a full-length USER command.
pub const MIN_LINE_LENGTH: usize = 64;

/// Validation errors for configuration.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("server.name must not contain spaces: '{0}'")]
    InvalidServerName(String),
    #[error("server.network is required")]
    MissingNetworkName,
    #[error("server.network must not contain spaces: '{0}'")]
    InvalidNetworkName(String),
    #[error("limits.max_line_length must be at least 64, got {0}")]
    LineLengthTooSmall(usize),
    #[error("limits.sendq must be greater than zero")]
    ZeroSendq,
    #[error("registration.default_user_modes contains unsupported mode '{0}'")]
    UnsupportedDefaultMode(char),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let name = &config.server.name;
    if name.is_empty() {
        errors.push(ValidationError::MissingServerName);
    } else if name.contains(char::is_whitespace) {
        errors.push(ValidationError::InvalidServerName(name.clone()));
    }
    let network = &config.server.network;
    if network.is_empty() {
        errors.push(ValidationError::MissingNetworkName);
    } else if network.contains(char::is_whitespace) {
        errors.push(ValidationError::InvalidNetworkName(network.clone()));
    }

    if config.limits.max_line_length < MIN_LINE_LENGTH {
        errors.push(ValidationError::LineLengthTooSmall(config.limits.max_line_length));
    }
    if config.limits.sendq == 0 {
        errors.push(ValidationError::ZeroSendq);
    }

    for change in parse_user_modes(&config.registration.default_user_modes) {
        if !USABLE_USER_MODES.contains(change.flag) {
            errors.push(ValidationError::UnsupportedDefaultMode(change.flag));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
