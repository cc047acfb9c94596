//! Unified error handling for lircd.
//!
//! Handler failures split in two: protocol errors become exactly one reply
//! line and leave the client connected; everything else ends the connection
//! without a reply.

use crate::state::DirectoryError;
use lircd_proto::{Message, Response, middle_token};
use thiserror::Error;
use tokio::sync::mpsc;

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur during command handling.
#[derive(Debug, Error)]
#[allow(clippy::large_enum_variant)] // Send variant is large but rarely constructed
pub enum HandlerError {
    #[error("not enough parameters")]
    NeedMoreParams,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("erroneous nickname: {0}")]
    ErroneousNickname(String),

    #[error("nickname in use: {0}")]
    NicknameInUse(String),

    #[error("already registered")]
    AlreadyRegistered,

    #[error("not registered")]
    NotRegistered,

    #[error("cannot change mode for other users")]
    UsersDontMatch,

    #[error("client quit: {0:?}")]
    Quit(Option<String>),

    /// USER arrived without a usable nickname or with empty fields.
    #[error("registration failed: {0}")]
    RegistrationFailed(String),

    #[error("send error: {0}")]
    Send(#[from] mpsc::error::SendError<Message>),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams => "need_more_params",
            Self::UnknownCommand(_) => "unknown_command",
            Self::ErroneousNickname(_) => "erroneous_nickname",
            Self::NicknameInUse(_) => "nickname_in_use",
            Self::AlreadyRegistered => "already_registered",
            Self::NotRegistered => "not_registered",
            Self::UsersDontMatch => "users_dont_match",
            Self::Quit(_) => "quit",
            Self::RegistrationFailed(_) => "registration_failed",
            Self::Send(_) => "send_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Whether this error ends the connection.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Quit(_) | Self::RegistrationFailed(_) | Self::Send(_) | Self::Internal(_)
        )
    }

    /// Convert to an IRC error reply message.
    ///
    /// Returns `None` for errors that don't warrant a client-visible reply
    /// (fatal errors: quit, failed registration, send failures, internal).
    pub fn to_irc_reply(&self, server_name: &str, nick: &str, cmd_name: &str) -> Option<Message> {
        let (response, params) = match self {
            Self::NeedMoreParams => (
                Response::ERR_NEEDMOREPARAMS,
                vec![nick, cmd_name, "Not enough parameters"],
            ),
            Self::UnknownCommand(cmd) => (
                Response::ERR_UNKNOWNCOMMAND,
                vec![nick, middle_token(cmd), "Unknown command"],
            ),
            Self::ErroneousNickname(bad_nick) => (
                Response::ERR_ERRONEUSNICKNAME,
                vec![nick, middle_token(bad_nick), "Erroneous nickname"],
            ),
            Self::NicknameInUse(bad_nick) => (
                Response::ERR_NICKNAMEINUSE,
                vec![nick, bad_nick.as_str(), "Nickname is already in use"],
            ),
            Self::AlreadyRegistered => (
                Response::ERR_ALREADYREGISTERED,
                vec![nick, "You may not reregister"],
            ),
            Self::NotRegistered => (
                Response::ERR_NOTREGISTERED,
                vec![nick, "You have not registered"],
            ),
            Self::UsersDontMatch => (
                Response::ERR_USERSDONTMATCH,
                vec![nick, "Cannot change mode for other users"],
            ),

            // These errors don't get client-visible replies
            Self::Quit(_) => return None,
            Self::RegistrationFailed(_) => return None,
            Self::Send(_) => return None,
            Self::Internal(_) => return None,
        };

        let params = params.into_iter().map(str::to_string).collect();
        Some(Message::response(server_name, response, params))
    }
}

impl From<DirectoryError> for HandlerError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NicknameInUse(nick) => Self::NicknameInUse(nick),
            DirectoryError::AlreadyRegistered => Self::AlreadyRegistered,
            DirectoryError::NotReady => Self::RegistrationFailed(err.to_string()),
            DirectoryError::Detached => Self::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error_codes() {
        assert_eq!(HandlerError::NeedMoreParams.error_code(), "need_more_params");
        assert_eq!(HandlerError::UsersDontMatch.error_code(), "users_dont_match");
        assert_eq!(HandlerError::Internal("test".into()).error_code(), "internal_error");
    }

    #[test]
    fn test_handler_error_to_irc_reply() {
        let reply = HandlerError::NeedMoreParams
            .to_irc_reply("irc.test", "nick", "USER")
            .unwrap();
        assert_eq!(reply.to_string(), ":irc.test 461 nick USER :Not enough parameters");

        let reply = HandlerError::NicknameInUse("Same".into())
            .to_irc_reply("irc.test", "AUTH", "NICK")
            .unwrap();
        assert_eq!(reply.to_string(), ":irc.test 433 AUTH Same :Nickname is already in use");

        // Fatal errors don't generate replies
        let reply = HandlerError::Quit(None).to_irc_reply("irc.test", "nick", "QUIT");
        assert!(reply.is_none());
    }

    #[test]
    fn client_text_is_echoed_as_one_word() {
        let reply = HandlerError::ErroneousNickname("bad nick".into())
            .to_irc_reply("irc.test", "AUTH", "NICK")
            .unwrap();
        let parsed: Message = reply.to_string().parse().unwrap();
        assert_eq!(parsed.params, vec!["AUTH", "bad", "Erroneous nickname"]);

        let reply = HandlerError::UnknownCommand(":X".into())
            .to_irc_reply("irc.test", "AUTH", ":X")
            .unwrap();
        assert_eq!(reply.to_string(), ":irc.test 421 AUTH X :Unknown command");
    }

    #[test]
    fn test_fatal_split() {
        assert!(HandlerError::RegistrationFailed("x".into()).is_fatal());
        assert!(HandlerError::Quit(Some("bye".into())).is_fatal());
        assert!(!HandlerError::AlreadyRegistered.is_fatal());
        assert!(!HandlerError::UnknownCommand("FOO".into()).is_fatal());
    }

    #[test]
    fn test_directory_error_conversion() {
        let err: HandlerError = DirectoryError::NicknameInUse("x".into()).into();
        assert!(matches!(err, HandlerError::NicknameInUse(n) if n == "x"));
        let err: HandlerError = DirectoryError::NotReady.into();
        assert!(err.is_fatal());
    }
}
